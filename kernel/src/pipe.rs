use crate::file::file::{fileclose, filealloc};
use crate::file::{File, FDType};
use crate::kalloc::KMEM;
use crate::proc::{myproc, sleep, wakeup};
use crate::spinlock::Spinlock;
use crate::vm::{copyin, copyout};

const PIPESIZE: usize = 512;
pub struct Pipe {
    lock: Spinlock,
    data: [u8; PIPESIZE],
    nread: u32, // number of bytes read
    nwrite: u32, // number of bytes written
    readopen: bool, // read fd is still open
    writeopen: bool, // write fd is still open
}

impl Pipe {
    const fn create() -> Self {
        Self {
            lock: Spinlock::init_lock("pipe"),
            data: [0; PIPESIZE],
            nread: 0,
            nwrite: 0,
            readopen: true,
            writeopen: true,
        }
    }

    pub(crate) fn close(self: &mut Self, writable: bool) {
        self.lock.acquire();
        if writable {
            self.writeopen = false;
            wakeup(&self.nread as *const u32 as *const u8);
        } else {
            self.readopen = false;
            wakeup(&self.nwrite as *const u32 as *const u8);
        }
        if !self.readopen && !self.writeopen {
            self.lock.release();
            unsafe { KMEM.kfree(self as *mut Pipe); }
        } else {
            self.lock.release();
        }
    }

    pub(crate) fn read(self: &mut Self, addr: usize, n: usize) -> i32 {
        let p = myproc();
        let pagetable = unsafe { p.pagetable.unwrap().as_mut().unwrap() };

        self.lock.acquire();
        while self.nread == self.nwrite && self.writeopen {
            if p.killed() != 0 {
                self.lock.release();
                return -1;
            }
            sleep(&self.nread as *const u32 as *const u8, &mut self.lock);
        }

        let mut i = 0;
        while i < n {
            if self.nread == self.nwrite {
                break;
            }
            let ch = self.data[ring_slot(self.nread)];
            self.nread += 1;
            if copyout(pagetable, addr + i, &ch as *const u8, 1) == -1 {
                break;
            }
            i += 1;
        }

        wakeup(&self.nwrite as *const u32 as *const u8);
        self.lock.release();
        return i as i32;
    }

    pub(crate) fn write(self: &mut Self, addr: usize, n: usize) -> i32 {
        let p = myproc();
        let pagetable = unsafe { p.pagetable.unwrap().as_mut().unwrap() };

        self.lock.acquire();
        let mut i = 0;
        while i < n {
            if !self.readopen || p.killed() != 0 {
                self.lock.release();
                return -1;
            }
            if is_full(self.nwrite, self.nread) {
                wakeup(&self.nread as *const u32 as *const u8);
                sleep(&self.nwrite as *const u32 as *const u8, &mut self.lock);
            } else {
                let mut ch = 0u8;
                if copyin(pagetable, &mut ch as *mut u8, addr + i, 1) == -1 {
                    break;
                }
                self.data[ring_slot(self.nwrite)] = ch;
                self.nwrite += 1;
                i += 1;
            }
        }

        wakeup(&self.nread as *const u32 as *const u8);
        self.lock.release();
        return i as i32;
    }
}

// Allocate a pipe, setting *f0 and *f1 to the read and write ends.
pub fn pipealloc() -> Option<(&'static mut File, &'static mut File)> {
    let f0 = filealloc();
    if f0.is_none() {
        return None;
    }
    let f0 = f0.unwrap();

    let f1 = filealloc();
    if f1.is_none() {
        fileclose(f0);
        return None;
    }
    let f1 = f1.unwrap();

    let pi: *mut Pipe = unsafe { KMEM.kalloc() };
    if pi.is_null() {
        fileclose(f0);
        fileclose(f1);
        return None;
    }
    unsafe { *pi = Pipe::create(); }

    f0.file_type = FDType::FD_PIPE;
    f0.readable = true;
    f0.writable = false;
    f0.pipe = Some(pi);

    f1.file_type = FDType::FD_PIPE;
    f1.readable = false;
    f1.writable = true;
    f1.pipe = Some(pi);

    return Some((f0, f1));
}

// Byte offset into the ring buffer for the nread/nwrite counter's current
// position. The counters are monotonically increasing byte counts, not
// indices, so they must be wrapped mod PIPESIZE before indexing `data`.
fn ring_slot(counter: u32) -> usize {
    counter as usize % PIPESIZE
}

// The ring is full once the writer has gotten a full buffer's worth ahead
// of the reader; a writer must then wait for the reader to free space.
fn is_full(nwrite: u32, nread: u32) -> bool {
    nwrite == nread + PIPESIZE as u32
}

#[cfg(test)]
mod tests {
    use super::{is_full, ring_slot, PIPESIZE};

    #[test]
    fn ring_slot_wraps_at_pipesize() {
        assert_eq!(ring_slot(0), 0);
        assert_eq!(ring_slot(PIPESIZE as u32 - 1), PIPESIZE - 1);
        assert_eq!(ring_slot(PIPESIZE as u32), 0);
        assert_eq!(ring_slot(PIPESIZE as u32 + 5), 5);
    }

    #[test]
    fn not_full_when_reader_has_caught_up() {
        assert!(!is_full(0, 0));
        assert!(!is_full(10, 3));
    }

    #[test]
    fn full_exactly_one_buffer_ahead_of_reader() {
        assert!(is_full(PIPESIZE as u32, 0));
        assert!(is_full(100 + PIPESIZE as u32, 100));
        assert!(!is_full(PIPESIZE as u32 - 1, 0));
    }
}