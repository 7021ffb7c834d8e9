//! Shared utilities

pub mod config;
pub mod process;

pub use config::KeelConfig;
pub use process::{ProcessRunner, SystemRunner};
