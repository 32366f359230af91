// Wires the `log` crate onto the console, so callers can use
// log::{info,warn,error,debug,trace}! instead of hand-rolled printf calls.

use ::log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::printf::PRINTER;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        unsafe {
            PRINTER.printf(core::format_args!(
                "[{}] {}\n",
                record.level(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

pub fn init() -> Result<(), SetLoggerError> {
    ::log::set_logger(&LOGGER)?;
    ::log::set_max_level(LevelFilter::Debug);
    Ok(())
}
