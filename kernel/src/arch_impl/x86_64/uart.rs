//! COM1 mirror for console output, COM2 for kernel logs.

use uart_16550::SerialPort;

use crate::logger::LogSink;
use crate::tty::output::SerialSink;

const COM1_PORT: u16 = 0x3F8;
const COM2_PORT: u16 = 0x2F8;

pub struct ComMirror {
    port: SerialPort,
}

impl ComMirror {
    /// # Safety
    /// COM1 must not be driven by anything else.
    pub unsafe fn com1() -> Self {
        let mut port = SerialPort::new(COM1_PORT);
        port.init();
        Self { port }
    }
}

impl SerialSink for ComMirror {
    fn put_byte(&mut self, byte: u8) {
        // send() would expand backspace again; the echo path already did.
        self.port.send_raw(byte);
    }
}

/// Kernel log output on COM2, kept apart from console traffic on COM1.
pub struct LogPort {
    port: SerialPort,
}

impl LogPort {
    /// # Safety
    /// COM2 must not be driven by anything else.
    pub unsafe fn com2() -> Self {
        let mut port = SerialPort::new(COM2_PORT);
        port.init();
        Self { port }
    }
}

impl LogSink for LogPort {
    fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.port.send(byte);
        }
    }
}
