#![no_std]
#![feature(start)]

use ulib::printf;
use ulib::stubs::{exit, unlink};

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc < 2 {
            printf!("usage: rm files...\n");
            exit(1);
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        for i in 1..argc {
            if unlink(args[i as usize]) < 0 {
                printf!("rm: failed to remove\n");
                break;
            }
        }
    }

    0
}
