//! Expose the mdocs command implementations for integration tests.
pub mod cli;
pub mod commands;
pub mod output;
