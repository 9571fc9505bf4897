//! PSIL command-line driver.
//!
//! The binary (`psil`) is a thin argument dispatcher over the command
//! handlers in [`commands`]. Errors are rendered by [`diagnostic`] against
//! the source they came from.

pub mod commands;
pub mod diagnostic;
mod tracing_setup;

pub use tracing_setup::init_tracing;
