//! MSVC discovery through the Visual Studio enumeration helper (vswhere).
//!
//! MSVC has no version banner in the `--version` sense, so installations
//! are enumerated by asking the helper for the installation path of each
//! Visual Studio major version. When the helper is missing, it can be
//! installed through a package manager. That install is attempted at most
//! once per resolver.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::compiler::{CompilerFamily, Resolution};
use crate::toolchain::Resolver;
use crate::util::config::DEFAULT_MSVC_HELPER;

impl Resolver {
    /// Find a Visual Studio installation at `version`, or the newest known
    /// one when `version` is `None`.
    ///
    /// The returned path is the installation directory reported by the
    /// helper.
    pub fn find_msvc(&self, version: Option<&str>) -> Option<Resolution> {
        let helper = self.msvc_helper()?;

        self.candidate_versions(CompilerFamily::Msvc, version)
            .into_iter()
            .find_map(|v| {
                self.query_msvc_installation(&helper, &v)
                    .map(|path| Resolution::new(path, v))
            })
    }

    /// Locate the helper, installing it first if allowed and not yet tried.
    fn msvc_helper(&self) -> Option<PathBuf> {
        if let Some(path) = self.locate_msvc_helper() {
            return Some(path);
        }

        if !self.msvc.auto_install() {
            debug!("{} not found and auto-install is disabled", self.msvc.helper());
            return None;
        }

        let installed = *self.msvc_install.get_or_init(|| self.install_msvc_helper());
        if !installed {
            return None;
        }

        let path = self.locate_msvc_helper();
        if path.is_none() {
            warn!("{} is still not on PATH after installing it", self.msvc.helper());
        }
        path
    }

    fn locate_msvc_helper(&self) -> Option<PathBuf> {
        let helper = self.msvc.helper();
        if let Some(path) = self.runner.find_executable(helper, true) {
            return Some(path);
        }

        // The Visual Studio installer drops vswhere here without touching PATH
        if helper == DEFAULT_MSVC_HELPER && self.host.is_windows() {
            let standard = self.vs_installer_dir.join("vswhere.exe");
            return self
                .runner
                .find_executable(&standard.to_string_lossy(), true);
        }

        None
    }

    fn install_msvc_helper(&self) -> bool {
        let command = self.msvc.install_command();
        let Some((program, args)) = command.split_first() else {
            warn!("No install command configured for {}", self.msvc.helper());
            return false;
        };

        info!("Installing {} with `{}`", self.msvc.helper(), command.join(" "));

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match self.runner.run(Path::new(program), &args) {
            Ok(output) if output.success() => true,
            Ok(output) => {
                warn!(
                    "Failed to install {}: {}",
                    self.msvc.helper(),
                    output.stderr.trim()
                );
                false
            }
            Err(e) => {
                warn!("Failed to install {}: {:#}", self.msvc.helper(), e);
                false
            }
        }
    }

    fn query_msvc_installation(&self, helper: &Path, version: &str) -> Option<PathBuf> {
        let args = [
            "-legacy",
            "-version",
            version,
            "-property",
            "installationPath",
            "-sort",
        ];

        let output = match self.runner.run(helper, &args) {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to run {}: {:#}", helper.display(), e);
                return None;
            }
        };

        if !output.success() {
            debug!(
                "{} failed for version {}: {}",
                helper.display(),
                version,
                output.stderr.trim()
            );
            return None;
        }

        let path = output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from);

        match &path {
            Some(p) => debug!("Found Visual Studio {} at {}", version, p.display()),
            None => debug!("No Visual Studio {} installation", version),
        }
        path
    }
}
