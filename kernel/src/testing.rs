//! Host-side doubles for the console's collaborators.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::boxed::Box;
use std::sync::{Arc, Condvar, Mutex};
use std::vec::Vec;

use crate::arch_impl::Cpu;
use crate::config::PANIC_PCS;
use crate::task::{ProcDump, ProcessContext, WaitChannel, WaitTicket, Wakeup};
use crate::tty::output::{Attr, Display, EchoSink, Glyph, SerialSink};
use crate::tty::text_screen::ScreenError;

impl EchoSink for Vec<(Glyph, Attr)> {
    fn echo(&mut self, glyph: Glyph, attr: Attr) {
        self.push((glyph, attr));
    }
}

type Handler = Box<dyn FnOnce() + Send>;

/// Display that records every glyph. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    glyphs: Arc<Mutex<Vec<(Glyph, Attr)>>>,
    fail_after: Option<usize>,
    on_put: Arc<Mutex<Option<Handler>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` glyphs, then report every further one as out of range.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Run `f` once, right after the next glyph is recorded. Lets a test
    /// act from inside the console's output section.
    pub fn after_next_put(&self, f: impl FnOnce() + Send + 'static) {
        *self.on_put.lock().unwrap() = Some(Box::new(f));
    }

    pub fn glyphs(&self) -> Vec<(Glyph, Attr)> {
        self.glyphs.lock().unwrap().clone()
    }

    pub fn text(&self) -> Vec<u8> {
        self.glyphs()
            .into_iter()
            .filter_map(|(g, _)| match g {
                Glyph::Byte(c) => Some(c),
                Glyph::Backspace => None,
            })
            .collect()
    }
}

impl Display for RecordingDisplay {
    fn put(&mut self, glyph: Glyph, attr: Attr) -> Result<(), ScreenError> {
        {
            let mut glyphs = self.glyphs.lock().unwrap();
            if let Some(limit) = self.fail_after {
                if glyphs.len() >= limit {
                    return Err(ScreenError::PositionOutOfRange(2001));
                }
            }
            glyphs.push((glyph, attr));
        }
        let hook = self.on_put.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        Ok(())
    }
}

/// Serial mirror that records every byte. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingSerial {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl RecordingSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }
}

impl SerialSink for RecordingSerial {
    fn put_byte(&mut self, byte: u8) {
        self.bytes.lock().unwrap().push(byte);
    }
}

/// CPU whose `freeze` unwinds with "cpu frozen" so halts can be observed.
///
/// Interrupts raised with [`TestCpu::irq`] while interrupts are disabled stay
/// pending until they are enabled again, as on hardware.
pub struct TestCpu {
    id: u32,
    interrupts_off: AtomicBool,
    pending: Mutex<Vec<Handler>>,
}

impl TestCpu {
    pub fn new() -> Self {
        Self::with_id(0)
    }

    pub fn with_id(id: u32) -> Self {
        Self {
            id,
            interrupts_off: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn interrupts_disabled(&self) -> bool {
        self.interrupts_off.load(Ordering::SeqCst)
    }

    /// Deliver an interrupt: run `handler` now, or once interrupts are enabled.
    pub fn irq(&self, handler: impl FnOnce() + Send + 'static) {
        if self.interrupts_disabled() {
            self.pending.lock().unwrap().push(Box::new(handler));
        } else {
            handler();
        }
    }
}

impl Cpu for TestCpu {
    fn id(&self) -> u32 {
        self.id
    }

    fn disable_interrupts(&self) {
        self.interrupts_off.store(true, Ordering::SeqCst);
    }

    fn enable_interrupts(&self) {
        self.interrupts_off.store(false, Ordering::SeqCst);
        let pending = std::mem::take(&mut *self.pending.lock().unwrap());
        for handler in pending {
            handler();
        }
    }

    fn interrupts_enabled(&self) -> bool {
        !self.interrupts_disabled()
    }

    fn caller_pcs(&self, pcs: &mut [usize]) {
        for (i, pc) in pcs.iter_mut().enumerate().take(PANIC_PCS) {
            *pc = 0x1000 + i;
        }
    }

    fn freeze(&self) -> ! {
        panic!("cpu frozen");
    }
}

/// Scheduler double: a generation counter under a std mutex, with a condvar
/// standing in for sleep/wakeup.
pub struct TestPlatform {
    cpu: TestCpu,
    generation: Mutex<u64>,
    woken: Condvar,
    killed: AtomicBool,
    wakeups: AtomicUsize,
    waits: AtomicUsize,
    dumps: AtomicUsize,
}

impl TestPlatform {
    pub fn new() -> Self {
        Self {
            cpu: TestCpu::new(),
            generation: Mutex::new(0),
            woken: Condvar::new(),
            killed: AtomicBool::new(false),
            wakeups: AtomicUsize::new(0),
            waits: AtomicUsize::new(0),
            dumps: AtomicUsize::new(0),
        }
    }

    /// Mark the calling process killed and kick any sleeper.
    pub fn kill(&self) {
        self.killed.store(true, Ordering::SeqCst);
        let _generation = self.generation.lock().unwrap();
        self.woken.notify_all();
    }

    pub fn wakeups(&self) -> usize {
        self.wakeups.load(Ordering::SeqCst)
    }

    /// Number of times a reader has gone to sleep.
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }

    pub fn dumps(&self) -> usize {
        self.dumps.load(Ordering::SeqCst)
    }

    pub fn cpu(&self) -> &TestCpu {
        &self.cpu
    }
}

impl Wakeup for TestPlatform {
    fn wakeup(&self, _channel: WaitChannel) {
        let mut generation = self.generation.lock().unwrap();
        *generation += 1;
        self.wakeups.fetch_add(1, Ordering::SeqCst);
        self.woken.notify_all();
    }
}

impl ProcessContext for TestPlatform {
    fn current_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    fn prepare_to_wait(&self, channel: WaitChannel) -> WaitTicket {
        WaitTicket {
            channel,
            generation: *self.generation.lock().unwrap(),
        }
    }

    fn wait(&self, ticket: WaitTicket) {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let mut generation = self.generation.lock().unwrap();
        while *generation == ticket.generation && !self.current_killed() {
            generation = self.woken.wait(generation).unwrap();
        }
    }
}

impl ProcDump for TestPlatform {
    fn dump_processes(&self) {
        self.dumps.fetch_add(1, Ordering::SeqCst);
    }
}

impl Cpu for TestPlatform {
    fn id(&self) -> u32 {
        self.cpu.id()
    }

    fn disable_interrupts(&self) {
        self.cpu.disable_interrupts();
    }

    fn enable_interrupts(&self) {
        self.cpu.enable_interrupts();
    }

    fn interrupts_enabled(&self) -> bool {
        self.cpu.interrupts_enabled()
    }

    fn caller_pcs(&self, pcs: &mut [usize]) {
        self.cpu.caller_pcs(pcs);
    }

    fn freeze(&self) -> ! {
        self.cpu.freeze()
    }
}
