use core::fmt::{Arguments, Write};
use crate::console::{Console, CONSOLE_INSTANCE};
use crate::spinlock::Spinlock;
use crate::uart::Uart;

pub static mut PRINTER: Printer = Printer {
    lock: Spinlock::init_lock("pr"),
    locking: true,
};

#[macro_export]
macro_rules! printf
{
	($($arg:tt)*) => {
        unsafe {
            crate::printf::PRINTER.printf(core::format_args!($($arg)*))
        }
    };
}

/// lock to avoid interleaving concurrent printf's.
pub struct Printer {
    lock: Spinlock,
    locking: bool,
}

impl Printer {
    // Bring up the uart hardware and wire the console device,
    // so that printf() works as early as possible during boot.
    pub fn init() {
        Uart::init();
        Console::init();
    }

    // Print to the console. only understands %d, %x, %p, %s.
    pub fn printf(self: &mut Self, args: Arguments<'_>) {
        let locking = self.locking;
        if locking {
            self.lock.acquire();
        }

        let _ = unsafe { CONSOLE_INSTANCE.write_fmt(args).unwrap() };

        if locking {
            self.lock.release()
        }
    }
}

// Compatibility shim: older call sites still say debug_log!, routed through
// the log crate's logger (see klog.rs) instead of printing unconditionally.
#[macro_export]
macro_rules! debug_log {
	($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}