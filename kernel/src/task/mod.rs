//! Scheduler primitives the console consumes.
//!
//! The console never owns processes. It needs to know whether the calling
//! process has been killed, to put it to sleep on a channel, to wake sleepers
//! and to request a process listing. The kernel provides these through the
//! traits below.
//!
//! Sleeping is split into two steps so no wakeup can be lost: the caller takes
//! a [`WaitTicket`] while still holding the lock that protects its condition,
//! releases that lock, then waits on the ticket. A wakeup delivered in between
//! makes the wait return at once.

/// Identity of something a process can sleep on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitChannel(pub usize);

/// Proof that a process registered interest in a channel before releasing
/// its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTicket {
    pub channel: WaitChannel,
    pub generation: u64,
}

/// Wake sleepers. Safe to call from interrupt context.
pub trait Wakeup {
    fn wakeup(&self, channel: WaitChannel);
}

/// Process-context operations. Only blocking entry points may use these.
pub trait ProcessContext: Wakeup {
    /// Whether the calling process has been marked for termination.
    fn current_killed(&self) -> bool;

    /// Register the caller on `channel`. Must be called with the condition's
    /// lock held.
    fn prepare_to_wait(&self, channel: WaitChannel) -> WaitTicket;

    /// Sleep until the ticket's channel is woken after it was issued, or the
    /// caller is killed. Must be called with no spinlock held.
    fn wait(&self, ticket: WaitTicket);
}

/// Diagnostic process listing.
pub trait ProcDump {
    fn dump_processes(&self);
}

/// Everything the console needs from the rest of the kernel.
pub trait Platform: ProcessContext + ProcDump + crate::arch_impl::Cpu + Sync {}

impl<T> Platform for T where T: ProcessContext + ProcDump + crate::arch_impl::Cpu + Sync {}
