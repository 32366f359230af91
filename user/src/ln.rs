#![no_std]
#![feature(start)]

use ulib::printf;
use ulib::stubs::{exit, link};

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc != 3 {
            printf!("usage: ln old new\n");
            exit(1);
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        if link(args[1], args[2]) < 0 {
            printf!("ln: failed to link\n");
            exit(1);
        }
    }

    0
}
