#![no_std]
#![feature(start)]

use ulib::atoi;
use ulib::printf;
use ulib::stubs::{exit, kill};

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc < 2 {
            printf!("usage: kill pid...\n");
            exit(1);
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        for i in 1..argc {
            let pid = atoi(args[i as usize]);
            kill(pid);
        }
    }

    0
}
