#![no_std]
#![feature(start)]

use ulib::printf;
use ulib::stubs::{exit, mkdir};

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc < 2 {
            printf!("usage: mkdir files...\n");
            exit(1);
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        for i in 1..argc {
            if mkdir(args[i as usize]) < 0 {
                printf!("mkdir: failed to create\n");
                break;
            }
        }
    }

    0
}
