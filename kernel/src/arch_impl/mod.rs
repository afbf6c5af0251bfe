//! Architecture abstraction layer.
//!
//! The console only needs a handful of CPU operations, defined by [`Cpu`].
//! The x86_64 implementation drives real hardware and is built with the
//! `hw` feature; host builds and tests supply their own `Cpu`.

#[cfg(all(feature = "hw", target_arch = "x86_64"))]
pub mod x86_64;

pub mod traits;
pub use traits::*;
