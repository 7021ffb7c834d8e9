//! Keel - C/C++ compiler toolchain resolution
//!
//! This crate finds the compilers installed on a machine, classifies them
//! by family and version, and builds fully resolved toolchain descriptors
//! for native and cross builds.

pub mod core;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for Keel unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock process runner with a fake search
/// path.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    catalog::CompilerCatalog,
    compiler::{CompilerChoice, CompilerFamily, CompilerId, Resolution, DEFAULT},
    host::Host,
};

pub use toolchain::{Resolver, Toolchain, ToolchainError, ToolchainSpec};
pub use util::config::KeelConfig;
