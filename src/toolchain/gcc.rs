//! GCC lookups.

use crate::core::compiler::{CompilerFamily, Resolution};
use crate::toolchain::Resolver;

/// The GCC C driver.
pub const GCC: &str = "gcc";

/// The GCC C++ driver.
pub const GXX: &str = "g++";

impl Resolver {
    /// Find a GCC tool (`gcc`, `g++`, `gcc-ar`, ...) at `version`, or at the
    /// newest known GCC version when `version` is `None`.
    pub fn find_gcc_tool(&self, name: &str, version: Option<&str>) -> Option<Resolution> {
        let versions = self.candidate_versions(CompilerFamily::Gcc, version);
        self.locate_tool(name, &versions)
    }
}
