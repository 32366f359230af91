use core::mem;
use core::ptr;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::file::file::{fileclose, filedup};
use crate::file::{File, INode};
use crate::fs::fs::{iput, namei};
use crate::kalloc::KMEM;
use crate::memlayout::{TRAMPOLINE, TRAPFRAME};
use crate::param::{NCPU, NOFILE, NPROC, ROOTDEV};
use crate::proc::Procstate::{RUNNABLE, RUNNING, SLEEPING, UNUSED, USED, ZOMBIE};
use crate::riscv::{r_tp, PageTable, PGSIZE, PTE_R, PTE_W, PTE_X};
use crate::spinlock::{pop_off, push_off, Spinlock};
use crate::vm::{
    copyin, copyout, kvmmap, mappages, trampoline, uvmalloc, uvmcopy, uvmcreate, uvmdealloc,
    uvmfirst, uvmfree, uvmunmap,
};

extern "C" {
    fn swtch(old: *mut Context, new: *mut Context);
}

// Saved registers for kernel context switches.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Context {
    ra: u64,
    sp: u64,

    // callee-saved
    s0: u64,
    s1: u64,
    s2: u64,
    s3: u64,
    s4: u64,
    s5: u64,
    s6: u64,
    s7: u64,
    s8: u64,
    s9: u64,
    s10: u64,
    s11: u64,
}

impl Context {
    const fn zeroed() -> Self {
        Context {
            ra: 0,
            sp: 0,
            s0: 0,
            s1: 0,
            s2: 0,
            s3: 0,
            s4: 0,
            s5: 0,
            s6: 0,
            s7: 0,
            s8: 0,
            s9: 0,
            s10: 0,
            s11: 0,
        }
    }
}

// Per-CPU state.
#[derive(Copy, Clone)]
pub struct Cpu {
    proc: Option<usize>, // index into PROCS of the process running on this cpu, or None.
    context: Context,    // swtch() here to enter scheduler().
    pub noff: u8,        // Depth of push_off() nesting.
    pub intena: bool,    // Were interrupts enabled before push_off()?
}

impl Cpu {
    const fn default() -> Self {
        Cpu {
            proc: None,
            context: Context::zeroed(),
            noff: 0,
            intena: false,
        }
    }
}

static mut CPUS: [Cpu; NCPU] = [Cpu::default(); NCPU];
static mut PROCS: [Proc; NPROC] = [Proc::default(); NPROC];

static mut INIT_PROC: Option<usize> = None;

extern "C" {
    static trampoline: u8; // trampoline.S
}

// per-process data for the trap handling code in trampoline.S.
// sits in a page by itself just under the trampoline page in the
// user page table. not specially mapped in the kernel page table.
// uservec in trampoline.S saves user registers in the trapframe,
// then initializes registers from the trapframe's
// kernel_sp, kernel_hartid, kernel_satp, and jumps to kernel_trap.
// usertrapret() and userret in trampoline.S set up
// the trapframe's kernel_*, restore user registers from the
// trapframe, switch to the user page table, and enter user space.
// the trapframe includes callee-saved user registers like s0-s11 because the
// return-to-user path via usertrapret() doesn't return through
// the entire kernel call stack.
#[repr(C)]
pub struct Trapframe {
    /*   0 */ pub kernel_satp: u64, // kernel page table
    /*   8 */ pub kernel_sp: u64, // top of process's kernel stack
    /*  16 */ pub kernel_trap: u64, // usertrap()
    /*  24 */ pub epc: u64, // saved user program counter
    /*  32 */ pub kernel_hartid: u64, // saved kernel tp
    /*  40 */ pub ra: u64,
    /*  48 */ pub sp: u64,
    /*  56 */ pub gp: u64,
    /*  64 */ pub tp: u64,
    /*  72 */ pub t0: u64,
    /*  80 */ pub t1: u64,
    /*  88 */ pub t2: u64,
    /*  96 */ pub s0: u64,
    /* 104 */ pub s1: u64,
    /* 112 */ pub a0: u64,
    /* 120 */ pub a1: u64,
    /* 128 */ pub a2: u64,
    /* 136 */ pub a3: u64,
    /* 144 */ pub a4: u64,
    /* 152 */ pub a5: u64,
    /* 160 */ pub a6: u64,
    /* 168 */ pub a7: u64,
    /* 176 */ pub s2: u64,
    /* 184 */ pub s3: u64,
    /* 192 */ pub s4: u64,
    /* 200 */ pub s5: u64,
    /* 208 */ pub s6: u64,
    /* 216 */ pub s7: u64,
    /* 224 */ pub s8: u64,
    /* 232 */ pub s9: u64,
    /* 240 */ pub s10: u64,
    /* 248 */ pub s11: u64,
    /* 256 */ pub t3: u64,
    /* 264 */ pub t4: u64,
    /* 272 */ pub t5: u64,
    /* 280 */ pub t6: u64,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Procstate {
    UNUSED,
    USED,
    SLEEPING,
    RUNNABLE,
    RUNNING,
    ZOMBIE,
}

// A reference to another process table slot that must survive the
// referenced process's exit and the slot's eventual reuse: paired with the
// slot's generation counter so a stale reference can be detected instead of
// silently resolving to an unrelated process. Used for the parent link,
// which outlives the child across fork/exit/wait and must never be trusted
// across a slot recycling.
#[derive(Copy, Clone)]
struct ProcRef {
    idx: usize,
    generation: u32,
}

fn proc_ref_live(pr: ProcRef) -> bool {
    unsafe { PROCS[pr.idx].generation == pr.generation }
}

// Per-process state
#[derive(Copy, Clone)]
pub struct Proc {
    lock: Spinlock,

    // p->lock must be held when using these:
    state: Procstate,        // Process state
    chan: Option<*const u8>, // If non-zero, sleeping on chan
    killed: u8,              // If non-zero, have been killed
    xstate: i32,             // Exit status to be returned to parent's wait
    pub pid: u32,            // Process ID
    generation: u32,         // bumped every time this slot is (re)allocated

    // wait_lock must be held when using this:
    parent: Option<ProcRef>, // Parent process

    // these are private to the process, so p->lock need not be held.
    kstack: usize,                                   // Virtual address of kernel stack
    pub sz: usize,                                   // Size of process memory (bytes)
    pub pagetable: Option<*mut PageTable>,            // User page table
    pub trapframe: Option<*mut Trapframe>,            // data page for trampoline.S
    context: Context,                                 // swtch() here to run process
    pub ofile: [Option<*mut File>; NOFILE],  // Open files
    pub cwd: Option<*mut INode>,                      // Current directory
    pub name: [u8; 16],                                // Process name (debugging)
}

impl Proc {
    const fn default() -> Self {
        Proc {
            lock: Spinlock::init_lock("proc"),
            state: UNUSED,
            chan: None,
            killed: 0,
            xstate: 0,
            pid: 0,
            generation: 0,
            parent: None,
            kstack: 0,
            sz: 0,
            pagetable: None,
            trapframe: None,
            context: Context::zeroed(),
            ofile: [None; NOFILE],
            cwd: None,
            name: [0; 16],
        }
    }

    pub fn killed(&self) -> u8 {
        self.killed
    }

    pub fn setkilled(&mut self) {
        self.lock.acquire();
        self.killed = 1;
        self.lock.release();
    }

    pub fn pagetable_mut(&mut self) -> &mut PageTable {
        unsafe { &mut *self.pagetable.expect("process has no page table") }
    }
}

static NEXT_PID: AtomicU32 = AtomicU32::new(1);
// helps ensure that wakeups of wait()ing
// parents are not lost. helps obey the
// memory model when using p->parent.
// must be acquired before any p->lock.
static mut WAIT_LOCK: Spinlock = Spinlock::init_lock("wait_lock");

// Must be called with interrupts disabled,
// to prevent race with process being moved
// to a different CPU.
pub fn cpuid() -> usize {
    r_tp() as usize
}

// Return this CPU's cpu struct.
// Interrupts must be disabled.
pub fn mycpu() -> &'static mut Cpu {
    unsafe { &mut CPUS[cpuid()] }
}

// Whether this hart currently has a process running on it, i.e. whether
// myproc() is safe to call. Used by kerneltrap() to decide whether a timer
// interrupt should yield, without touching myproc() when there is none.
pub fn hart_has_running_proc() -> bool {
    push_off();
    let has_proc = mycpu().proc.is_some();
    pop_off();
    has_proc
}

// Return the current struct proc, panicking if there is none.
pub fn myproc() -> &'static mut Proc {
    push_off();
    let idx = mycpu().proc;
    pop_off();
    unsafe { &mut PROCS[idx.expect("myproc called with no current process")] }
}

fn allocpid() -> u32 {
    NEXT_PID.fetch_add(1, Ordering::Relaxed)
}

// Allocate a page for each process's kernel stack.
// Map it high in memory, followed by an invalid
// guard page.
pub fn proc_mapstacks(kpgtbl: &mut PageTable) {
    for idx in 0..NPROC {
        unsafe {
            let pa: *mut u8 = KMEM.kalloc();
            if pa.is_null() {
                panic!("kalloc");
            }
            let va = KSTACK!(idx);
            kvmmap(kpgtbl, va, pa as usize, PGSIZE, PTE_R | PTE_W);
            PROCS[idx].kstack = va;
        }
    }
}

// initialize the proc table.
pub fn procinit() {
    // empty; CPUS/PROCS/WAIT_LOCK are all initialized as statics.
}

// a user program that calls exec("/init")
// assembled from ../user/initcode.S
// od -t xC ../user/initcode
const INITCODE: [u8; 52] = [
    0x17, 0x05, 0x00, 0x00, 0x13, 0x05, 0x45, 0x02, 0x97, 0x05, 0x00, 0x00, 0x93, 0x85, 0x35, 0x02,
    0x93, 0x08, 0x70, 0x00, 0x73, 0x00, 0x00, 0x00, 0x93, 0x08, 0x20, 0x00, 0x73, 0x00, 0x00, 0x00,
    0xef, 0xf0, 0x9f, 0xff, 0x2f, 0x69, 0x6e, 0x69, 0x74, 0x00, 0x00, 0x24, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

// Set up first user process.
pub fn userinit() {
    let idx = allocproc().expect("userinit: allocproc failed");

    let p = unsafe { &mut PROCS[idx] };
    // allocate one user page and copy initcode's instructions
    // and data into it.
    uvmfirst(p.pagetable_mut(), &INITCODE as *const u8, mem::size_of_val(&INITCODE));
    p.sz = PGSIZE;

    // prepare for the very first "return" from kernel to user.
    let tf = unsafe { &mut *p.trapframe.unwrap() };
    tf.epc = 0; // user program counter
    tf.sp = PGSIZE as u64; // user stack pointer

    let name = b"initcode\0";
    p.name[..name.len()].copy_from_slice(name);
    p.cwd = namei(b"/\0").map(|ip| ip as *mut INode);

    p.state = RUNNABLE;
    unsafe { INIT_PROC = Some(idx) };

    p.lock.release();
}

// A fork child's very first scheduling by scheduler()
// will swtch to forkret.
extern "C" fn forkret() {
    static mut FIRST: bool = true;

    // Still holding p->lock from scheduler.
    myproc().lock.release();

    unsafe {
        if FIRST {
            // File system initialization must be run in the context of a
            // regular process (e.g., because it calls sleep), and thus cannot
            // be run from main().
            FIRST = false;
            crate::fs::fs::fsinit(ROOTDEV);
        }
    }

    crate::trap::usertrapret();
}

// Look in the process table for an UNUSED proc.
// If found, initialize state required to run in the kernel,
// and return its index with p->lock held.
// If there are no free procs, or a memory allocation fails, return None.
fn allocproc() -> Option<usize> {
    let mut found = None;
    for i in 0..NPROC {
        let p = unsafe { &mut PROCS[i] };
        p.lock.acquire();

        if p.state == UNUSED {
            found = Some(i);
            break;
        }

        p.lock.release();
    }

    let i = found?;
    let p = unsafe { &mut PROCS[i] };
    p.pid = allocpid();
    p.generation = p.generation.wrapping_add(1);
    p.state = USED;

    // Allocate a trapframe page.
    let trapframe_ptr: *mut Trapframe = unsafe { KMEM.kalloc() };
    if trapframe_ptr.is_null() {
        freeproc(p);
        p.lock.release();
        return None;
    }
    p.trapframe = Some(trapframe_ptr);

    // An empty user page table.
    p.pagetable = proc_pagetable(p);
    if p.pagetable.is_none() {
        freeproc(p);
        p.lock.release();
        return None;
    }

    // Set up new context to start executing at forkret,
    // which returns to user space.
    p.context = Context::zeroed();
    p.context.ra = forkret as u64;
    p.context.sp = (p.kstack + 3 * PGSIZE) as u64;

    Some(i)
}

// free a proc structure and the data hanging from it,
// including user pages.
// p->lock must be held.
fn freeproc(p: &mut Proc) {
    if let Some(tf) = p.trapframe.take() {
        unsafe { KMEM.kfree(tf) };
    }

    if let Some(pagetable) = p.pagetable.take() {
        proc_freepagetable(unsafe { &mut *pagetable }, p.sz);
    }

    p.sz = 0;
    p.pid = 0;
    p.parent = None;
    p.name = [0; 16];
    p.chan = None;
    p.killed = 0;
    p.xstate = 0;
    p.state = UNUSED;
}

// Create a user page table for a given process, with no user memory,
// but with trampoline and trapframe pages.
fn proc_pagetable(p: &Proc) -> Option<*mut PageTable> {
    // An empty page table.
    let pagetable = uvmcreate()?;
    let pt = unsafe { &mut *pagetable };

    // map the trampoline code (for system call return)
    // at the highest user virtual address.
    // only the supervisor uses it, on the way
    // to/from user space, so not PTE_U.
    let trampoline_addr = (unsafe { &trampoline } as *const u8).expose_addr();
    if mappages(pt, TRAMPOLINE, trampoline_addr, PGSIZE, PTE_R | PTE_X) != 0 {
        uvmfree(pt, 0);
        return None;
    }

    // map the trapframe page just below the trampoline page, for
    // trampoline.S.
    let trapframe_addr = p.trapframe.unwrap().expose_addr();
    if mappages(pt, TRAPFRAME, trapframe_addr, PGSIZE, PTE_R | PTE_W) != 0 {
        uvmunmap(pt, TRAMPOLINE, 1, false);
        uvmfree(pt, 0);
        return None;
    }

    Some(pagetable)
}

// Free a process's page table, and free the
// physical memory it refers to.
fn proc_freepagetable(pagetable: &mut PageTable, sz: usize) {
    uvmunmap(pagetable, TRAMPOLINE, 1, false);
    uvmunmap(pagetable, TRAPFRAME, 1, false);
    uvmfree(pagetable, sz);
}

// Grow or shrink user memory by n bytes.
// Returns 0 on success, -1 on failure.
pub fn growproc(n: i32) -> i32 {
    let p = myproc();
    let mut sz = p.sz;

    if n > 0 {
        let newsz = uvmalloc(p.pagetable_mut(), sz, sz + n as usize, PTE_W | PTE_X);
        if newsz == 0 {
            return -1;
        }
        sz = newsz;
    } else if n < 0 {
        sz = uvmdealloc(p.pagetable_mut(), sz, (sz as isize + n as isize) as usize);
    }
    p.sz = sz;
    0
}

// Create a new process, copying the parent.
// Sets up child kernel stack to return as if from fork() system call.
pub fn fork() -> Option<u32> {
    let my_idx = mycpu().proc.expect("fork called with no current process");
    let p = unsafe { &mut PROCS[my_idx] };

    // Allocate process.
    let ci = allocproc()?;
    let np = unsafe { &mut PROCS[ci] };

    // Copy user memory from parent to child.
    if uvmcopy(p.pagetable_mut(), np.pagetable_mut(), p.sz) != 0 {
        freeproc(np);
        np.lock.release();
        return None;
    }
    np.sz = p.sz;

    // copy saved user registers.
    unsafe {
        ptr::copy_nonoverlapping(p.trapframe.unwrap(), np.trapframe.unwrap(), 1);
        // Cause fork to return 0 in the child.
        (*np.trapframe.unwrap()).a0 = 0;
    }

    // increment reference counts on open file descriptors.
    for i in 0..NOFILE {
        if let Some(f) = p.ofile[i] {
            filedup(f);
            np.ofile[i] = Some(f);
        }
    }
    np.cwd = p.cwd.map(|ip| unsafe { (*ip).idup() as *mut INode });

    np.name = p.name;

    let pid = np.pid;
    np.lock.release();

    unsafe {
        WAIT_LOCK.acquire();
        PROCS[ci].parent = Some(ProcRef { idx: my_idx, generation: PROCS[my_idx].generation });
        WAIT_LOCK.release();
    }

    let np = unsafe { &mut PROCS[ci] };
    np.lock.acquire();
    np.state = RUNNABLE;
    np.lock.release();

    Some(pid)
}

// Pass p's abandoned children to init.
// Caller must hold wait_lock.
fn reparent(idx: usize) {
    for i in 0..NPROC {
        let pp = unsafe { &mut PROCS[i] };
        if let Some(pr) = pp.parent {
            if pr.idx == idx && proc_ref_live(pr) {
                pp.parent = unsafe {
                    INIT_PROC.map(|init_idx| ProcRef {
                        idx: init_idx,
                        generation: PROCS[init_idx].generation,
                    })
                };
                if let Some(init_idx) = unsafe { INIT_PROC } {
                    wakeup(unsafe { &PROCS[init_idx] as *const Proc as *const u8 });
                }
            }
        }
    }
}

// Exit the current process. Does not return.
// An exited process remains in the zombie state
// until its parent calls wait().
pub fn exit(status: i32) -> ! {
    let idx = mycpu().proc.expect("exit called with no current process");
    let p = unsafe { &mut PROCS[idx] };

    if Some(idx) == unsafe { INIT_PROC } {
        panic!("init exiting");
    }

    // Close all open files.
    for i in 0..NOFILE {
        if let Some(f) = p.ofile[i].take() {
            fileclose(unsafe { &mut *f });
        }
    }

    if let Some(cwd) = p.cwd.take() {
        crate::log::begin_op();
        unsafe { iput(&mut *cwd) };
        crate::log::end_op();
    }

    unsafe {
        WAIT_LOCK.acquire();

        reparent(idx);

        // Parent might be sleeping in wait().
        if let Some(pr) = p.parent {
            if proc_ref_live(pr) {
                wakeup(&PROCS[pr.idx] as *const Proc as *const u8);
            }
        }

        p.lock.acquire();

        p.xstate = status;
        p.state = ZOMBIE;

        WAIT_LOCK.release();

        sched();
    }
    unreachable!("zombie exit");
}

// Wait for a child process to exit and return its pid.
// Return -1 if this process has no children.
pub fn wait(addr: usize) -> i32 {
    let myidx = mycpu().proc.expect("wait called with no current process");

    unsafe {
        WAIT_LOCK.acquire();

        loop {
            let mut havekids = false;
            for i in 0..NPROC {
                let np = &mut PROCS[i];
                if let Some(pr) = np.parent {
                    if pr.idx == myidx && proc_ref_live(pr) {
                        havekids = true;

                        np.lock.acquire();
                        if np.state == ZOMBIE {
                            let pid = np.pid;
                            if addr != 0 {
                                let p = &mut PROCS[myidx];
                                if copyout(
                                    p.pagetable_mut(),
                                    addr,
                                    &np.xstate as *const i32 as *const u8,
                                    mem::size_of::<i32>(),
                                ) != 0
                                {
                                    np.lock.release();
                                    WAIT_LOCK.release();
                                    return -1;
                                }
                            }
                            freeproc(np);
                            np.lock.release();
                            WAIT_LOCK.release();
                            return pid as i32;
                        }
                        np.lock.release();
                    }
                }
            }

            if !havekids || PROCS[myidx].killed != 0 {
                WAIT_LOCK.release();
                return -1;
            }

            sleep(&PROCS[myidx] as *const Proc as *const u8, &mut WAIT_LOCK);
        }
    }
}

// Switch to scheduler. Must hold only p->lock
// and have changed proc->state. Saves and restores
// intena because intena is a property of this
// kernel thread, not this CPU. It should
// be proc->intena and proc->noff, but that would
// break in the few places where a lock is held but
// there's no process.
unsafe fn sched() {
    let idx = mycpu().proc.unwrap();
    let p = &mut PROCS[idx];

    if !p.lock.holding_unchecked() {
        panic!("sched p->lock");
    }
    if mycpu().noff != 1 {
        panic!("sched locks");
    }
    if p.state == RUNNING {
        panic!("sched running");
    }
    if crate::riscv::intr_get() {
        panic!("sched interruptible");
    }

    let intena = mycpu().intena;
    swtch(&mut p.context as *mut Context, &mut mycpu().context as *mut Context);
    mycpu().intena = intena;
}

// Give up the CPU for one scheduling round.
pub fn proc_yield() {
    let p = myproc();
    p.lock.acquire();
    p.state = RUNNABLE;
    unsafe { sched() };
    p.lock.release();
}

// Per-CPU process scheduler.
// Each CPU calls scheduler() after setting itself up.
// Scheduler never returns. It loops, doing:
//  - choose a process to run.
//  - swtch to start running that process.
//  - eventually that process transfers control
//    via swtch back to the scheduler.
pub fn scheduler() -> ! {
    let c = mycpu();
    c.proc = None;

    loop {
        // avoid deadlock by ensuring that devices can interrupt.
        crate::riscv::intr_on();

        let mut found = false;
        for i in 0..NPROC {
            let p = unsafe { &mut PROCS[i] };
            p.lock.acquire();
            if p.state == RUNNABLE {
                // Switch to chosen process. It is the process's job
                // to release its lock and then reacquire it
                // before jumping back to us.
                p.state = RUNNING;
                c.proc = Some(i);

                unsafe {
                    swtch(&mut c.context as *mut Context, &mut p.context as *mut Context);
                }

                // Process is done running for now.
                // It should have changed its p->state before coming back.
                c.proc = None;
                found = true;
            }
            p.lock.release();
        }

        if !found {
            // nothing to run; wait for an interrupt.
            unsafe { core::arch::asm!("wfi") }
        }
    }
}

// Atomically release lock and sleep on chan.
// Reacquires lock when awakened.
pub fn sleep(chan: *const u8, lk: &mut Spinlock) {
    let p = myproc();

    // Must acquire p->lock in order to
    // change p->state and then call sched.
    // Once we hold p->lock, we can be
    // guaranteed that we won't miss any wakeup
    // (wakeup locks p->lock),
    // so it's okay to release lk.
    if !ptr::eq(lk, &p.lock) {
        p.lock.acquire();
        lk.release();
    }

    // Go to sleep.
    p.chan = Some(chan);
    p.state = SLEEPING;

    unsafe { sched() };

    // Tidy up.
    p.chan = None;

    // Reacquire original lock.
    if !ptr::eq(lk, &p.lock) {
        p.lock.release();
        lk.acquire();
    }
}

// Wake up all processes sleeping on chan.
// Must be called without any p->lock.
pub fn wakeup(chan: *const u8) {
    let me = mycpu().proc;
    for i in 0..NPROC {
        if Some(i) == me {
            continue;
        }
        let p = unsafe { &mut PROCS[i] };
        p.lock.acquire();
        if p.state == SLEEPING && p.chan == Some(chan) {
            p.state = RUNNABLE;
        }
        p.lock.release();
    }
}

// Kill the process with the given pid.
// The victim won't exit until it tries to return
// to user space (see usertrap() in trap.rs).
pub fn kill(pid: u32) -> i32 {
    for i in 0..NPROC {
        let p = unsafe { &mut PROCS[i] };
        p.lock.acquire();
        if p.pid == pid {
            p.killed = 1;
            if p.state == SLEEPING {
                // Wake process from sleep().
                p.state = RUNNABLE;
            }
            p.lock.release();
            return 0;
        }
        p.lock.release();
    }
    -1
}

// Copy to either a user address, or kernel address,
// depending on usr_dst.
// Returns 0 on success, -1 on error.
pub fn either_copyout(user_dst: bool, dst: *mut u8, src: *const u8, len: usize) -> i32 {
    let p = myproc();
    if user_dst {
        if copyout(p.pagetable_mut(), dst.expose_addr(), src, len) != 0 {
            return -1;
        }
        0
    } else {
        unsafe { ptr::copy_nonoverlapping(src, dst, len) };
        0
    }
}

// Copy from either a user address, or kernel address,
// depending on usr_src.
// Returns 0 on success, -1 on error.
pub fn either_copyin(dst: *mut u8, user_src: bool, src: *const u8, len: usize) -> i32 {
    let p = myproc();
    if user_src {
        if copyin(p.pagetable_mut(), dst, src.expose_addr(), len) != 0 {
            return -1;
        }
        0
    } else {
        unsafe { ptr::copy_nonoverlapping(src, dst, len) };
        0
    }
}

const fn procstate_name(s: Procstate) -> &'static str {
    match s {
        UNUSED => "unused",
        USED => "used",
        SLEEPING => "sleep ",
        RUNNABLE => "runble",
        RUNNING => "run   ",
        ZOMBIE => "zombie",
    }
}

// Print a process listing to console. For debugging.
// Runs when user types ^P on console.
// No lock to avoid wedging a stuck machine further.
pub fn procdump() {
    crate::printf!("\n");
    for i in 0..NPROC {
        let p = unsafe { &PROCS[i] };
        if p.state == UNUSED {
            continue;
        }
        let name = core::str::from_utf8(&p.name).unwrap_or("").trim_end_matches('\0');
        crate::printf!("{} {} {}\n", p.pid, procstate_name(p.state), name);
    }
}
