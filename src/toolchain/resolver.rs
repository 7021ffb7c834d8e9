//! The resolver: owns the host facts, catalog and process seam that every
//! lookup consults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::core::catalog::CompilerCatalog;
use crate::core::compiler::{CompilerFamily, CompilerId, Resolution, DEFAULT};
use crate::core::host::Host;
use crate::toolchain::banner::parse_banner;
use crate::toolchain::clang::CLANG;
use crate::toolchain::detect::DefaultCompilerCache;
use crate::toolchain::errors::ToolchainError;
use crate::toolchain::gcc::GCC;
use crate::util::config::{KeelConfig, MsvcSettings};
use crate::util::process::{ProcessRunner, SystemRunner};

/// Where the Visual Studio installer puts vswhere on a stock install.
const DEFAULT_VS_INSTALLER_DIR: &str = "C:\\Program Files (x86)\\Microsoft Visual Studio\\Installer";

/// Resolves compilers and companion tools on a host.
///
/// A resolver is cheap to share behind an `Arc`; lookups take `&self` and
/// the only mutable state (the default-compiler memo and the one-shot MSVC
/// helper install) is internally synchronized.
pub struct Resolver {
    pub(crate) host: Host,
    pub(crate) catalog: CompilerCatalog,
    pub(crate) runner: Arc<dyn ProcessRunner>,
    pub(crate) cc_override: Option<String>,
    pub(crate) cross_fallback: CompilerId,
    pub(crate) msvc: MsvcSettings,
    pub(crate) msvc_install: OnceLock<bool>,
    pub(crate) vs_installer_dir: PathBuf,
    pub(crate) default_compiler: DefaultCompilerCache,
}

impl Resolver {
    /// Create a resolver with the stock cross fallback (gcc 4.8) and no
    /// `CC` override.
    pub fn new(host: Host, catalog: CompilerCatalog, runner: Arc<dyn ProcessRunner>) -> Self {
        Resolver {
            host,
            catalog,
            runner,
            cc_override: None,
            cross_fallback: CompilerId::new(CompilerFamily::Gcc, "4.8"),
            msvc: MsvcSettings::default(),
            msvc_install: OnceLock::new(),
            vs_installer_dir: PathBuf::from(DEFAULT_VS_INSTALLER_DIR),
            default_compiler: DefaultCompilerCache::default(),
        }
    }

    /// Create a resolver for the current machine from loaded configuration.
    ///
    /// Reads `CC` from the environment.
    pub fn from_config(config: &KeelConfig) -> Result<Self, ToolchainError> {
        let cross_family: CompilerFamily = config.cross.compiler().parse()?;
        let cc = std::env::var("CC").ok().filter(|cc| !cc.trim().is_empty());
        let installer_dir = std::env::var("ProgramFiles(x86)")
            .ok()
            .map(|dir| {
                Path::new(&dir)
                    .join("Microsoft Visual Studio")
                    .join("Installer")
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VS_INSTALLER_DIR));

        Ok(Resolver::new(
            Host::current(),
            CompilerCatalog::from_settings(&config.catalog),
            Arc::new(SystemRunner),
        )
        .with_cc_override(cc)
        .with_cross_fallback(CompilerId::new(cross_family, config.cross.version()))
        .with_msvc_settings(config.msvc.clone())
        .with_vs_installer_dir(installer_dir))
    }

    /// Set the compiler probed first when detecting the default.
    pub fn with_cc_override(mut self, cc: Option<String>) -> Self {
        self.cc_override = cc;
        self
    }

    /// Set the compiler forced onto cross-compile descriptors.
    pub fn with_cross_fallback(mut self, fallback: CompilerId) -> Self {
        self.cross_fallback = fallback;
        self
    }

    pub fn with_msvc_settings(mut self, settings: MsvcSettings) -> Self {
        self.msvc = settings;
        self
    }

    /// Set the directory the Visual Studio installer keeps vswhere in.
    pub fn with_vs_installer_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.vs_installer_dir = dir.into();
        self
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn catalog(&self) -> &CompilerCatalog {
        &self.catalog
    }

    pub fn cross_fallback(&self) -> &CompilerId {
        &self.cross_fallback
    }

    pub fn default_compiler_cache(&self) -> &DefaultCompilerCache {
        &self.default_compiler
    }

    /// Classify the executable at `path` by running it with `--version`.
    ///
    /// Always `None` on a Windows host, where MSVC has no version banner in
    /// this format.
    pub fn compiler_version(&self, path: &Path) -> Option<CompilerId> {
        if self.host.is_windows() {
            return None;
        }

        match self.runner.run(path, &["--version"]) {
            Ok(output) => {
                let combined = format!("{}\n{}", output.stdout, output.stderr);
                let id = parse_banner(&combined);
                if id.is_none() {
                    debug!("Unrecognized version banner from {}", path.display());
                }
                id
            }
            Err(e) => {
                debug!("Failed to run {} --version: {:#}", path.display(), e);
                None
            }
        }
    }

    /// Find a family's compiler driver.
    ///
    /// `None` for `version` means "newest known version". On macOS, `clang`
    /// is Apple's distribution, so it is probed against Apple versions.
    pub fn find_compiler(
        &self,
        family: CompilerFamily,
        version: Option<&str>,
    ) -> Option<Resolution> {
        match family {
            CompilerFamily::Gcc => self.find_gcc_tool(GCC, version),
            CompilerFamily::Clang if self.host.is_macos() => {
                self.find_apple_llvm_compiler(CLANG, version)
            }
            CompilerFamily::Clang => self.find_llvm_tool(CLANG, version),
            CompilerFamily::AppleClang => self.find_apple_llvm_compiler(CLANG, version),
            CompilerFamily::Msvc => self.find_msvc(version),
        }
    }

    /// Find a companion tool (`g++`, `gcc-ar`, `llvm-ar`, ...) for a family.
    ///
    /// MSVC has no separately versioned companions, so it always yields `None`.
    pub fn find_compiler_tool(
        &self,
        family: CompilerFamily,
        tool: &str,
        version: Option<&str>,
    ) -> Option<Resolution> {
        match family {
            CompilerFamily::Gcc => self.find_gcc_tool(tool, version),
            CompilerFamily::Clang => self.find_llvm_tool(tool, version),
            CompilerFamily::AppleClang => self.find_apple_llvm_tool(tool, version),
            CompilerFamily::Msvc => None,
        }
    }

    /// Every installed compiler at every known version.
    ///
    /// GCC comes first, then clang (labelled `appleclang` on macOS), then
    /// MSVC on Windows hosts.
    pub fn all_compilers(&self) -> Vec<CompilerId> {
        let mut found = Vec::new();

        for version in self.catalog.versions(CompilerFamily::Gcc) {
            if self.find_gcc_tool(GCC, Some(&version)).is_some() {
                found.push(CompilerId::new(CompilerFamily::Gcc, version));
            }
        }

        let clang_family = if self.host.is_macos() {
            CompilerFamily::AppleClang
        } else {
            CompilerFamily::Clang
        };
        for version in self.catalog.versions(clang_family) {
            if self.find_compiler(clang_family, Some(&version)).is_some() {
                found.push(CompilerId::new(clang_family, version));
            }
        }

        if self.host.is_windows() {
            for version in self.catalog.versions(CompilerFamily::Msvc) {
                if self.find_msvc(Some(&version)).is_some() {
                    found.push(CompilerId::new(CompilerFamily::Msvc, version));
                }
            }
        }

        found
    }

    /// Whether `family` is installed at `version` ("default" means any).
    pub fn is_compiler_installed(&self, family: CompilerFamily, version: &str) -> bool {
        self.find_compiler(family, requested(version)).is_some()
    }

    /// The host's default compiler, or an error naming what was tried.
    pub fn require_default_compiler(&self) -> Result<CompilerId, ToolchainError> {
        self.default_compiler(None, None)
            .ok_or(ToolchainError::NoDefaultCompiler)
    }

    /// Candidate versions for a lookup: the requested one, or every known
    /// version of `family`, newest first.
    pub(crate) fn candidate_versions(
        &self,
        family: CompilerFamily,
        version: Option<&str>,
    ) -> Vec<String> {
        match version {
            Some(v) => vec![v.to_string()],
            None => self.catalog.versions(family),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("host", &self.host)
            .field("cc_override", &self.cc_override)
            .field("cross_fallback", &self.cross_fallback)
            .field("msvc", &self.msvc)
            .field("vs_installer_dir", &self.vs_installer_dir)
            .finish_non_exhaustive()
    }
}

/// Map the "default" sentinel to "no particular version".
pub(crate) fn requested(version: &str) -> Option<&str> {
    if version == DEFAULT {
        None
    } else {
        Some(version)
    }
}
