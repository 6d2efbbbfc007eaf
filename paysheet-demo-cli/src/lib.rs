//! Paysheet Demo CLI library
//!
//! Exposes the command implementations and the terminal host so integration
//! tests can drive them without spawning the binary.

pub mod commands;
pub mod terminal;
pub mod ui;
