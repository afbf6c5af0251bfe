#![cfg_attr(not(test), no_std)]

//! Line-edited kernel console.
//!
//! Keyboard and UART interrupts feed key codes into a line discipline with
//! erase, kill-line and a three-line history; readers block until a line is
//! committed. Echo goes to a text-mode screen and a serial mirror. The same
//! path carries kernel `kprint!` output and the fatal `kpanic!` report.

extern crate alloc;

#[macro_use]
pub mod macros;

pub mod arch_impl;
pub mod config;
pub mod fs;
pub mod halt;
pub mod logger;
pub mod print;
pub mod task;
pub mod tty;

#[cfg(test)]
mod testing;
