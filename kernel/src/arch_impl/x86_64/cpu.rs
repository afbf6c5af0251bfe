//! x86_64 CPU operations.

use crate::arch_impl::traits::Cpu;

/// x86_64 CPU operations implementation.
pub struct X86Cpu;

impl Cpu for X86Cpu {
    fn id(&self) -> u32 {
        // CPUID.01H:EBX[31:24] is the initial local APIC id.
        #[allow(unused_unsafe)]
        let leaf = unsafe { core::arch::x86_64::__cpuid(1) };
        leaf.ebx >> 24
    }

    #[inline(always)]
    fn disable_interrupts(&self) {
        x86_64::instructions::interrupts::disable();
    }

    #[inline(always)]
    fn enable_interrupts(&self) {
        x86_64::instructions::interrupts::enable();
    }

    #[inline(always)]
    fn interrupts_enabled(&self) -> bool {
        x86_64::instructions::interrupts::are_enabled()
    }

    fn without_interrupts<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
        Self: Sized,
    {
        x86_64::instructions::interrupts::without_interrupts(f)
    }

    fn caller_pcs(&self, pcs: &mut [usize]) {
        let mut fp: usize;
        unsafe {
            core::arch::asm!("mov {}, rbp", out(reg) fp, options(nomem, nostack, preserves_flags));
        }

        let mut filled = 0;
        while filled < pcs.len() {
            if fp == 0 || fp % core::mem::align_of::<usize>() != 0 {
                break;
            }
            // SAFETY: kernel frames are built with frame pointers; each frame
            // holds the saved rbp followed by the return address.
            let (next, ret) = unsafe {
                let frame = fp as *const usize;
                (frame.read(), frame.add(1).read())
            };
            pcs[filled] = ret;
            filled += 1;
            if next <= fp {
                break;
            }
            fp = next;
        }
        pcs[filled..].fill(0);
    }

    fn freeze(&self) -> ! {
        x86_64::instructions::interrupts::disable();
        loop {
            x86_64::instructions::hlt();
        }
    }
}
