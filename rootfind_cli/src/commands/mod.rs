//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod cases;
pub mod compare;
pub mod sample;
pub mod solve;
