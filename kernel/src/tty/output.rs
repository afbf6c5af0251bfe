//! Console output path
//!
//! Every character the console emits, whether echoed input, `write()` data or
//! kernel messages, goes through [`Echo`]. It mirrors each glyph to the serial
//! line, renders it on the display, and freezes the CPU instead if a fatal
//! halt is already in progress.

use core::fmt;

use crate::arch_impl::Cpu;
use crate::halt::FatalHalt;

use super::text_screen::ScreenError;

/// One unit of console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Byte(u8),
    /// Move back one cell and erase it
    Backspace,
}

/// Rendering attribute for a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Normal,
    /// Text replayed from the command history
    Recalled,
}

/// Display surface the console renders onto.
pub trait Display {
    fn put(&mut self, glyph: Glyph, attr: Attr) -> Result<(), ScreenError>;
}

/// Secondary byte-oriented sink that mirrors everything shown on the display.
pub trait SerialSink {
    fn put_byte(&mut self, byte: u8);
}

/// Anything the line discipline can echo into.
pub trait EchoSink {
    fn echo(&mut self, glyph: Glyph, attr: Attr);
}

/// The display and serial mirror, owned by the console state.
pub struct Output<D, S> {
    display: D,
    serial: S,
}

impl<D: Display, S: SerialSink> Output<D, S> {
    pub const fn new(display: D, serial: S) -> Self {
        Self { display, serial }
    }

    /// Emit a glyph on both sinks. Backspace goes to serial as `BS SP BS`.
    pub fn put(&mut self, glyph: Glyph, attr: Attr) -> Result<(), ScreenError> {
        match glyph {
            Glyph::Backspace => {
                self.serial.put_byte(0x08);
                self.serial.put_byte(b' ');
                self.serial.put_byte(0x08);
            }
            Glyph::Byte(c) => self.serial.put_byte(c),
        }
        self.display.put(glyph, attr)
    }
}

/// Echo path bound to the CPU and halt latch for the duration of one lock hold.
pub struct Echo<'a, D, S, C: ?Sized> {
    output: &'a mut Output<D, S>,
    cpu: &'a C,
    halt: &'a FatalHalt,
}

impl<'a, D, S, C> Echo<'a, D, S, C>
where
    D: Display,
    S: SerialSink,
    C: Cpu + ?Sized,
{
    pub fn new(output: &'a mut Output<D, S>, cpu: &'a C, halt: &'a FatalHalt) -> Self {
        Self { output, cpu, halt }
    }
}

impl<D, S, C> EchoSink for Echo<'_, D, S, C>
where
    D: Display,
    S: SerialSink,
    C: Cpu + ?Sized,
{
    fn echo(&mut self, glyph: Glyph, attr: Attr) {
        // Another CPU is halting; leave the screen as it is.
        self.halt.trap_if_raised(self.cpu);

        if let Err(err) = self.output.put(glyph, attr) {
            self.cpu.disable_interrupts();
            let mut raw = RawWriter(&mut *self.output);
            self.halt.raise(&mut raw, self.cpu, format_args!("{}", err));
        }
    }
}

impl<D, S, C> fmt::Write for Echo<'_, D, S, C>
where
    D: Display,
    S: SerialSink,
    C: Cpu + ?Sized,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.echo(Glyph::Byte(byte), Attr::Normal);
        }
        Ok(())
    }
}

/// Unchecked writer used while a halt message is printed. Display errors are
/// ignored so a broken screen cannot recurse into another halt.
pub struct RawWriter<'a, D, S>(pub &'a mut Output<D, S>);

impl<D: Display, S: SerialSink> fmt::Write for RawWriter<'_, D, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            let _ = self.0.put(Glyph::Byte(byte), Attr::Normal);
        }
        Ok(())
    }
}
