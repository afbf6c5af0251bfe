//! Architecture-agnostic CPU operations used by the console.

/// CPU control needed by the fatal halt and echo paths.
///
/// None of these may block or take locks: they run with the console lock
/// held and, during a halt, with the rest of the machine in an unknown state.
pub trait Cpu {
    /// Identifier of the executing CPU (the local APIC id on x86_64).
    fn id(&self) -> u32;

    /// Disable interrupt delivery on the executing CPU.
    fn disable_interrupts(&self);

    fn enable_interrupts(&self);

    fn interrupts_enabled(&self) -> bool;

    /// Run `f` with interrupts disabled, restoring the previous state after.
    ///
    /// Any lock an interrupt handler may take must be held only inside this,
    /// or a handler landing on the same CPU spins on it forever.
    fn without_interrupts<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
        Self: Sized,
    {
        let saved = self.interrupts_enabled();
        if saved {
            self.disable_interrupts();
        }
        let ret = f();
        if saved {
            self.enable_interrupts();
        }
        ret
    }

    /// Fill `pcs` with the return addresses of the caller's frames, zeroing
    /// any slots past the end of the chain.
    fn caller_pcs(&self, pcs: &mut [usize]);

    /// Spin forever. Used once the machine is being halted.
    fn freeze(&self) -> !;
}
