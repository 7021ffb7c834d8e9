//! Core data structures for Keel.
//!
//! - Compiler families and resolved compiler identities
//! - The catalog of known compiler versions
//! - Host platform facts and OS/arch normalization

pub mod catalog;
pub mod compiler;
pub mod host;

pub use catalog::CompilerCatalog;
pub use compiler::{CompilerChoice, CompilerFamily, CompilerId, Resolution};
pub use host::Host;
