//! Command implementations for the apidelta CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod compare;
