//! Filesystem glue
//!
//! Only the character-device switch lives here: the console is reached
//! through it by major number.

pub mod devsw;
