//! Console TTY Device Driver
//!
//! Binds the line discipline to the rest of the kernel:
//!
//! - [`Console::interrupt`] drains pending key codes at interrupt time
//! - [`Console::read`] blocks process-context readers until a line is committed
//! - [`Console::write`] sends process output through the echo path
//! - [`Console::print`] / [`Console::panic`] back the kernel printer
//!
//! One spinlock covers the input ring, history, navigation state and the echo
//! path. It is only ever held with interrupts disabled on the holding CPU, so
//! a keyboard interrupt cannot land on a CPU that already owns it. The
//! interrupt path holds it for a whole batch of keys and never sleeps; `read`
//! drops it around every sleep.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, Ordering};

use crossbeam_queue::ArrayQueue;
use spin::{Mutex, MutexGuard};

use super::key::{Key, KeySource, EOF_CHAR};
use super::line_discipline::LineDiscipline;
use super::output::{Attr, Display, Echo, EchoSink, Glyph, Output, RawWriter, SerialSink};
use super::TtyError;
use crate::arch_impl::Cpu;
use crate::config::KEY_QUEUE_SIZE;
use crate::fs::devsw::{CharDevice, DeviceError, FileLock, Unlocked};
use crate::halt::FatalHalt;
use crate::print::KernelConsole;
use crate::task::{Platform, WaitChannel, WaitTicket, Wakeup};

/// Channel readers sleep on while no committed line is available.
pub const INPUT_CHANNEL: WaitChannel = WaitChannel(0xC0_5013);

/// Everything protected by the console lock.
pub struct ConsoleState<D, S> {
    ldisc: LineDiscipline,
    output: Output<D, S>,
}

impl<D, S> ConsoleState<D, S> {
    pub fn ldisc(&self) -> &LineDiscipline {
        &self.ldisc
    }
}

/// How far one lock hold of [`Console::read`] got.
enum ReadStep {
    Done,
    Killed,
    Wait(WaitTicket),
}

pub struct Console<D, S, P> {
    state: Mutex<ConsoleState<D, S>>,
    platform: P,
    halt: FatalHalt,
    /// Set by [`Console::panic`]; from then on the printer stops honouring
    /// the lock
    panicking: AtomicBool,
}

impl<D, S, P> Console<D, S, P>
where
    D: Display,
    S: SerialSink,
    P: Platform,
{
    pub fn new(display: D, serial: S, platform: P) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                ldisc: LineDiscipline::new(),
                output: Output::new(display, serial),
            }),
            platform,
            halt: FatalHalt::new(),
            panicking: AtomicBool::new(false),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn halted(&self) -> bool {
        self.halt.is_raised()
    }

    /// Run `f` with the console state locked.
    pub fn with_state<R>(&self, f: impl FnOnce(&ConsoleState<D, S>) -> R) -> R {
        self.platform.without_interrupts(|| f(&self.state.lock()))
    }

    /// Drain every available code from `source`.
    ///
    /// Called from the keyboard and UART interrupt handlers. The process
    /// listing requested by Ctrl-P runs only after the lock is released,
    /// since it prints through this console itself.
    pub fn interrupt(&self, source: &mut dyn KeySource) {
        let dump = self.platform.without_interrupts(|| {
            let mut state = self.state.lock();
            drain_keys(&mut state, source, &self.platform, &self.halt)
        });

        if dump {
            self.platform.dump_processes();
        }
    }

    /// Copy up to one line of committed input into `dst`.
    ///
    /// Sleeps while nothing is committed. A read that meets `^D` after taking
    /// some bytes leaves the `^D` in place, so the next read returns 0.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, TtyError> {
        let mut n = 0;
        loop {
            match self.platform.without_interrupts(|| self.read_step(dst, &mut n)) {
                ReadStep::Done => return Ok(n),
                ReadStep::Killed => {
                    log::debug!("console: reader killed while waiting for input");
                    return Err(TtyError::Killed);
                }
                // Interrupts are back on here, so the committing key can arrive.
                ReadStep::Wait(ticket) => self.platform.wait(ticket),
            }
        }
    }

    /// Copy committed bytes into `dst[*n..]` under one lock hold.
    fn read_step(&self, dst: &mut [u8], n: &mut usize) -> ReadStep {
        let mut state = self.state.lock();
        let ring = state.ldisc.ring_mut();

        while *n < dst.len() {
            if !ring.has_committed() {
                if self.platform.current_killed() {
                    return ReadStep::Killed;
                }
                return ReadStep::Wait(self.platform.prepare_to_wait(INPUT_CHANNEL));
            }

            let Some(c) = ring.take() else {
                continue;
            };

            if c == EOF_CHAR {
                if *n > 0 {
                    // Save ^D for next time so the caller gets a 0-byte read.
                    ring.untake();
                }
                return ReadStep::Done;
            }

            dst[*n] = c;
            *n += 1;
            if c == b'\n' {
                return ReadStep::Done;
            }
        }

        ReadStep::Done
    }

    /// Echo `src` to the display and serial mirror.
    pub fn write(&self, src: &[u8]) -> usize {
        self.platform.without_interrupts(|| {
            let mut state = self.state.lock();
            let ConsoleState { output, .. } = &mut *state;
            let mut echo = Echo::new(output, &self.platform, &self.halt);
            for &c in src {
                echo.echo(Glyph::Byte(c), Attr::Normal);
            }
        });
        src.len()
    }

    /// Formatted output through the echo path.
    pub fn print(&self, args: fmt::Arguments<'_>) {
        self.platform.without_interrupts(|| {
            let mut state = self.lock_for_print();
            let ConsoleState { output, .. } = &mut *state;
            let mut echo = Echo::new(output, &self.platform, &self.halt);
            let _ = echo.write_fmt(args);
        });
    }

    /// Report an unrecoverable error and halt this CPU for good.
    pub fn panic(&self, args: fmt::Arguments<'_>) -> ! {
        self.platform.disable_interrupts();
        self.panicking.store(true, Ordering::Release);

        let mut state = self.lock_for_print();
        let ConsoleState { output, .. } = &mut *state;
        let mut raw = RawWriter(output);
        self.halt.raise(&mut raw, &self.platform, args)
    }

    fn lock_for_print(&self) -> MutexGuard<'_, ConsoleState<D, S>> {
        if !self.panicking.load(Ordering::Acquire) && !self.halt.is_raised() {
            return self.state.lock();
        }
        loop {
            if let Some(guard) = self.state.try_lock() {
                return guard;
            }
            // SAFETY: only reached once a fatal halt is under way. The holder
            // is either this CPU, stopped mid-echo, or another CPU that freezes
            // at its next output; neither touches the state again.
            unsafe { self.state.force_unlock() };
        }
    }
}

/// The interrupt-time half. It only gets a [`Wakeup`], never the ability to
/// sleep.
fn drain_keys<D, S, W>(
    state: &mut ConsoleState<D, S>,
    source: &mut dyn KeySource,
    platform: &W,
    halt: &FatalHalt,
) -> bool
where
    D: Display,
    S: SerialSink,
    W: Wakeup + Cpu,
{
    let ConsoleState { ldisc, output } = state;
    let mut echo = Echo::new(output, platform, halt);
    let mut dump = false;

    while let Some(code) = source.next_code() {
        let outcome = ldisc.handle_key(Key::from_code(code), &mut echo);
        if outcome.committed {
            platform.wakeup(INPUT_CHANNEL);
        }
        dump |= outcome.dump_requested;
    }

    dump
}

impl<D, S, P> CharDevice for Console<D, S, P>
where
    D: Display + Send,
    S: SerialSink + Send,
    P: Platform,
{
    fn read(&self, file: &dyn FileLock, dst: &mut [u8]) -> Result<usize, DeviceError> {
        let _unlocked = Unlocked::new(file);
        Ok(Console::read(self, dst)?)
    }

    fn write(&self, file: &dyn FileLock, src: &[u8]) -> Result<usize, DeviceError> {
        let _unlocked = Unlocked::new(file);
        Ok(Console::write(self, src))
    }
}

impl<D, S, P> KernelConsole for Console<D, S, P>
where
    D: Display + Send,
    S: SerialSink + Send,
    P: Platform,
{
    fn print(&self, args: fmt::Arguments<'_>) {
        Console::print(self, args);
    }

    fn panic(&self, args: fmt::Arguments<'_>) -> ! {
        Console::panic(self, args)
    }
}

/// Lock-free hand-off from keyboard/UART interrupt handlers to the drain loop.
pub struct KeyQueue {
    codes: ArrayQueue<u16>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self {
            codes: ArrayQueue::new(KEY_QUEUE_SIZE),
        }
    }

    /// Queue a code. Must not block or allocate.
    pub fn push(&self, code: u16) {
        if self.codes.push(code).is_err() {
            log::warn!("console: key queue full; dropping input");
        }
    }

}

impl Default for KeyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for &KeyQueue {
    fn next_code(&mut self) -> Option<u16> {
        self.codes.pop()
    }
}
