//! LLVM and Apple clang lookups.

use crate::core::compiler::{CompilerFamily, Resolution};
use crate::toolchain::Resolver;

/// The clang C driver.
pub const CLANG: &str = "clang";

/// The clang C++ driver.
pub const CLANGXX: &str = "clang++";

/// Drivers that Apple ships and versions itself. Other LLVM tools on a
/// Mac (`llvm-ar`, `clang-format`, ...) come from upstream LLVM.
fn is_apple_driver(name: &str) -> bool {
    name == CLANG || name == CLANGXX
}

impl Resolver {
    /// Find an LLVM tool (`clang`, `clang++`, `llvm-ar`, ...) at `version`,
    /// or at the newest known clang version when `version` is `None`.
    pub fn find_llvm_tool(&self, name: &str, version: Option<&str>) -> Option<Resolution> {
        let versions = self.candidate_versions(CompilerFamily::Clang, version);
        self.locate_tool(name, &versions)
    }

    /// Find an Apple clang driver, probing Apple clang versions.
    pub fn find_apple_llvm_compiler(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Option<Resolution> {
        let versions = self.candidate_versions(CompilerFamily::AppleClang, version);
        self.locate_tool(name, &versions)
    }

    /// Find a tool in an Apple clang toolchain.
    ///
    /// The drivers use Apple versions; everything else falls back to the
    /// upstream LLVM version list.
    pub fn find_apple_llvm_tool(&self, name: &str, version: Option<&str>) -> Option<Resolution> {
        if is_apple_driver(name) {
            self.find_apple_llvm_compiler(name, version)
        } else {
            self.find_llvm_tool(name, version)
        }
    }
}
