// Process related system calls.

use crate::proc::{exit, fork, growproc, kill, myproc, sleep, wait};
use crate::syscall::syscall::{argaddr, argint};
use crate::trap::{TICKS, TICKS_LOCK};

pub(crate) fn sys_fork() -> u64 {
    match fork() {
        Some(pid) => pid as u64,
        None => u64::MAX,
    }
}

pub(crate) fn sys_exit() -> u64 {
    let status = argint(0);
    exit(status);
}

pub(crate) fn sys_wait() -> u64 {
    let addr = argaddr(0);
    wait(addr) as i64 as u64
}

pub(crate) fn sys_kill() -> u64 {
    let pid = argint(0) as u32;
    kill(pid) as i64 as u64
}

pub(crate) fn sys_getpid() -> u64 {
    myproc().pid as u64
}

pub(crate) fn sys_sbrk() -> u64 {
    let n = argint(0);
    let addr = myproc().sz;
    if growproc(n) < 0 {
        return u64::MAX;
    }
    addr as u64
}

pub(crate) fn sys_sleep() -> u64 {
    let n = argint(0);
    if n < 0 {
        return u64::MAX;
    }

    let p = myproc();
    unsafe {
        TICKS_LOCK.acquire();
        let ticks0 = TICKS;
        while TICKS.wrapping_sub(ticks0) < n as u32 {
            if p.killed() != 0 {
                TICKS_LOCK.release();
                return u64::MAX;
            }
            sleep(&TICKS as *const u32 as *const u8, &mut TICKS_LOCK);
        }
        TICKS_LOCK.release();
    }

    0
}

pub(crate) fn sys_uptime() -> u64 {
    unsafe {
        TICKS_LOCK.acquire();
        let t = TICKS;
        TICKS_LOCK.release();
        t as u64
    }
}
