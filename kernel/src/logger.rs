//! `log` backend
//!
//! Kernel diagnostics go to their own sink, never through the console, so a
//! message logged while the console lock is held cannot deadlock. On hardware
//! the sink is the second serial port.

use alloc::boxed::Box;
use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Destination for formatted log lines.
pub trait LogSink: Send {
    fn write_str(&mut self, s: &str);
}

struct SinkWriter<'a>(&'a mut dyn LogSink);

impl Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

pub struct SinkLogger {
    sink: Mutex<Option<Box<dyn LogSink>>>,
}

impl SinkLogger {
    pub const fn new() -> Self {
        Self {
            sink: Mutex::new(None),
        }
    }

    /// Replace the sink. Records logged with no sink attached are dropped.
    pub fn attach(&self, sink: Box<dyn LogSink>) {
        *self.sink.lock() = Some(sink);
    }
}

impl Default for SinkLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Use try_lock: a record logged from an interrupt that landed while
        // this CPU was already writing is dropped instead of spinning forever.
        let Some(mut sink) = self.sink.try_lock() else {
            return;
        };
        if let Some(sink) = sink.as_deref_mut() {
            let _ = writeln!(
                SinkWriter(sink),
                "[{:>5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

pub static LOGGER: SinkLogger = SinkLogger::new();

/// Install the global logger, writing to `sink`.
pub fn init(sink: Box<dyn LogSink>, level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.attach(sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
