//! Versioned executable lookup shared by every family.

use tracing::{debug, trace};

use crate::core::compiler::Resolution;
use crate::toolchain::Resolver;

impl Resolver {
    /// Find `name` at one of `versions` (ordered newest first).
    ///
    /// The unversioned executable wins if its banner reports a listed
    /// version. Otherwise each version is tried as `name-V` and then
    /// `name-V.0`, and the first hit is trusted without running it.
    pub fn locate_tool(&self, name: &str, versions: &[String]) -> Option<Resolution> {
        if let Some(path) = self.runner.find_executable(name, false) {
            match self.compiler_version(&path) {
                Some(id) if versions.contains(&id.version) => {
                    debug!("Found {} {} at {}", name, id.version, path.display());
                    return Some(Resolution::new(path, id.version));
                }
                Some(id) => debug!(
                    "{} at {} is version {}, not one of {:?}",
                    name,
                    path.display(),
                    id.version,
                    versions
                ),
                None => trace!("{} at {} reported no usable version", name, path.display()),
            }
        }

        for version in versions {
            for candidate in [format!("{name}-{version}"), format!("{name}-{version}.0")] {
                if let Some(path) = self.runner.find_executable(&candidate, false) {
                    debug!("Found {} {} at {}", name, version, path.display());
                    return Some(Resolution::new(path, version.clone()));
                }
            }
        }

        None
    }
}
