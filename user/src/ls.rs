#![no_std]
#![feature(start)]

use core::mem::size_of;

use kernel::file::fcntl::O_RDONLY;
use kernel::stat::{FileType, Stat};
use kernel::string::strlen;
use ulib::printf;
use ulib::stubs::{close, fstat, open, read};

const DIRSIZ: usize = 14;

#[repr(C)]
struct Dirent {
    inum: u16,
    name: [u8; DIRSIZ],
}

unsafe fn ls(path: *const u8) {
    let fd = open(path, O_RDONLY);
    if fd < 0 {
        printf!("ls: cannot open {}\n", strpath(path));
        return;
    }

    let mut st = Stat::create();
    if fstat(fd, &mut st as *mut Stat as *mut u8) < 0 {
        printf!("ls: cannot stat\n");
        close(fd);
        return;
    }

    match st.file_type {
        FileType::T_DIR => {
            let mut de = Dirent {
                inum: 0,
                name: [0; DIRSIZ],
            };
            loop {
                let n = read(
                    fd,
                    &mut de as *mut Dirent as *mut u8,
                    size_of::<Dirent>() as i32,
                );
                if n as usize != size_of::<Dirent>() {
                    break;
                }
                if de.inum == 0 {
                    continue;
                }
                printf!("{} {}\n", de.inum, strname(&de.name));
            }
        }
        _ => {
            printf!("{} {} {}\n", strpath(path), st.ino, st.size);
        }
    }

    close(fd);
}

fn strpath(path: *const u8) -> &'static str {
    unsafe {
        let n = strlen(path);
        core::str::from_utf8(core::slice::from_raw_parts(path, n)).unwrap_or("?")
    }
}

fn strname(name: &[u8; DIRSIZ]) -> &str {
    let n = name.iter().position(|&c| c == 0).unwrap_or(DIRSIZ);
    core::str::from_utf8(&name[..n]).unwrap_or("?")
}

#[start]
fn main(argc: isize, argv: *const *const u8) -> isize {
    unsafe {
        if argc <= 1 {
            ls(".\0".as_ptr());
            return 0;
        }

        let args = core::slice::from_raw_parts(argv, argc as usize);
        for i in 1..argc {
            ls(args[i as usize]);
        }
    }

    0
}
