//! Compiler toolchain resolution.
//!
//! This module answers "which C/C++ compiler should this build use, and
//! where is it?" for GCC, Clang, Apple clang and MSVC.
//!
//! Resolution order for the host default compiler:
//! 1. Windows: the newest Visual Studio found through vswhere
//! 2. `$CC`, then `cc`, classified by their `--version` banner
//! 3. The newest installed clang
//! 4. The newest installed GCC
//!
//! Cross-compiles skip probing and use the configured fallback compiler.

mod banner;
mod clang;
mod cross;
mod descriptor;
mod detect;
mod errors;
mod gcc;
mod locate;
mod msvc;
mod resolver;

pub use banner::parse_banner;
pub use clang::{CLANG, CLANGXX};
pub use cross::is_cross_compile;
pub use descriptor::{Toolchain, ToolchainSpec};
pub use detect::DefaultCompilerCache;
pub use errors::ToolchainError;
pub use gcc::{GCC, GXX};
pub use resolver::Resolver;
