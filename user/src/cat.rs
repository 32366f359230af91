#![no_std]
#![feature(start)]

use kernel::file::fcntl::O_RDONLY;
use ulib::printf;
use ulib::stubs::{close, exit, open, read, write};

fn cat(fd: i32) {
    let mut buf: [u8; 512] = [0; 512];
    loop {
        let n = unsafe { read(fd, buf.as_mut_ptr(), buf.len() as i32) };
        if n <= 0 {
            break;
        }
        unsafe {
            write(1, buf.as_ptr(), n);
        }
    }
}

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc <= 1 {
            cat(0);
            return 0;
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        for i in 1..argc {
            let fd = open(args[i as usize], O_RDONLY);
            if fd < 0 {
                printf!("cat: cannot open file\n");
                exit(1);
            }
            cat(fd);
            close(fd);
        }
    }

    0
}
