//! Toolchain descriptors.
//!
//! A [`Toolchain`] pins down everything a build needs to know about its
//! compiler: host, target, architecture, compiler family and version. It is
//! built from a partial [`ToolchainSpec`], optionally layered over an
//! existing descriptor, and every field left open is filled in by probing.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::core::compiler::{CompilerChoice, CompilerFamily, CompilerId, DEFAULT};
use crate::core::host::{normalize_arch, normalize_os, normalize_target};
use crate::toolchain::clang::CLANGXX;
use crate::toolchain::cross::is_cross_compile;
use crate::toolchain::errors::ToolchainError;
use crate::toolchain::gcc::GXX;
use crate::toolchain::resolver::requested;
use crate::toolchain::Resolver;

/// Partial toolchain description. Unset fields are filled in when the
/// descriptor is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainSpec {
    pub host: Option<String>,
    pub target: Option<String>,
    pub arch: Option<String>,
    pub compiler: Option<CompilerChoice>,
    pub compiler_version: Option<String>,
}

impl ToolchainSpec {
    pub fn new() -> Self {
        ToolchainSpec::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn compiler(mut self, compiler: impl Into<CompilerChoice>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }

    pub fn compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }
}

/// A fully resolved toolchain description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    host: String,
    target: String,
    arch: String,
    #[serde(serialize_with = "serialize_display")]
    compiler: CompilerChoice,
    compiler_version: String,
    cross_compile: bool,
    platform: String,
    name: String,
}

impl Toolchain {
    /// Build a descriptor from scratch.
    pub fn new(resolver: &Resolver, spec: ToolchainSpec) -> Self {
        Toolchain::build(resolver, None, spec)
    }

    /// Build a descriptor that starts from `basis` and applies `spec` on top.
    ///
    /// The basis's values are taken as given; compiler fields are only
    /// re-resolved if they are still "default" after the overlay, or if the
    /// new descriptor turns out to be a cross-compile.
    pub fn from_basis(resolver: &Resolver, basis: &Toolchain, spec: ToolchainSpec) -> Self {
        Toolchain::build(resolver, Some(basis), spec)
    }

    fn build(resolver: &Resolver, basis: Option<&Toolchain>, spec: ToolchainSpec) -> Self {
        let host = resolver.host();

        let mut fields = match basis {
            Some(basis) => ToolchainSpec {
                host: Some(basis.host.clone()),
                target: Some(basis.target.clone()),
                arch: Some(basis.arch.clone()),
                compiler: Some(basis.compiler),
                compiler_version: Some(basis.compiler_version.clone()),
            },
            None => ToolchainSpec::default(),
        };
        fields.host = spec.host.or(fields.host);
        fields.target = spec.target.or(fields.target);
        fields.arch = spec.arch.or(fields.arch);
        fields.compiler = spec.compiler.or(fields.compiler);
        fields.compiler_version = spec.compiler_version.or(fields.compiler_version);

        let target = normalize_os(fields.target.as_deref().unwrap_or(&host.os));
        let arch = normalize_arch(fields.arch.as_deref().unwrap_or(&host.arch));
        let cross_compile = is_cross_compile(host, &target, &arch);
        let platform = normalize_target(&format!("{}-{}", target, arch));

        let mut compiler = fields.compiler.unwrap_or_default();
        let mut compiler_version = fields
            .compiler_version
            .unwrap_or_else(|| DEFAULT.to_string());

        if cross_compile {
            let fallback = resolver.cross_fallback();
            info!(
                "{} is a cross-compile from {}, using {}",
                platform, host, fallback
            );
            compiler = CompilerChoice::Family(fallback.family);
            compiler_version = fallback.version.clone();
        } else {
            match compiler {
                CompilerChoice::Default => {
                    if let Some(id) = resolver.default_compiler(None, None) {
                        compiler = CompilerChoice::Family(id.family);
                        compiler_version = id.version;
                    }
                }
                CompilerChoice::Family(family) if compiler_version == DEFAULT => {
                    compiler_version = resolver
                        .find_compiler(family, None)
                        .and_then(|found| resolver.compiler_version(&found.path))
                        .map(|id| id.version)
                        .unwrap_or_else(|| DEFAULT.to_string());
                }
                CompilerChoice::Family(_) => {}
            }
        }

        let host_label = fields.host.unwrap_or_else(|| DEFAULT.to_string());
        let name = format!(
            "{}-{}-{}-{}-{}",
            host_label, compiler, compiler_version, target, arch
        );

        Toolchain {
            host: host_label,
            target,
            arch,
            compiler,
            compiler_version,
            cross_compile,
            platform,
            name,
        }
    }

    /// Host label ("default" unless one was given).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn compiler(&self) -> CompilerChoice {
        self.compiler
    }

    pub fn compiler_version(&self) -> &str {
        &self.compiler_version
    }

    pub fn cross_compile(&self) -> bool {
        self.cross_compile
    }

    /// Normalized `target-arch` tag.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Canonical `host-compiler-version-target-arch` name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiler as a family/version pair, if a family was resolved.
    pub fn compiler_id(&self) -> Option<CompilerId> {
        self.compiler
            .family()
            .map(|family| CompilerId::new(family, self.compiler_version.clone()))
    }

    /// Path of the C compiler.
    ///
    /// # Panics
    ///
    /// Panics on a cross-compile descriptor; paths are only meaningful for
    /// compilers that run on this host.
    pub fn compiler_path(&self, resolver: &Resolver) -> Option<PathBuf> {
        assert!(
            !self.cross_compile,
            "compiler paths are not resolved for cross-compile toolchain `{}`",
            self.name
        );

        let family = self.compiler.family()?;
        resolver
            .find_compiler(family, requested(&self.compiler_version))
            .map(|found| found.path)
    }

    /// Path of the C++ compiler.
    ///
    /// MSVC drives both languages with one executable, so this is the same
    /// as [`Toolchain::compiler_path`] there.
    ///
    /// # Panics
    ///
    /// Panics on a cross-compile descriptor.
    pub fn cxx_compiler_path(&self, resolver: &Resolver) -> Option<PathBuf> {
        assert!(
            !self.cross_compile,
            "compiler paths are not resolved for cross-compile toolchain `{}`",
            self.name
        );

        let family = self.compiler.family()?;
        let version = requested(&self.compiler_version);
        let driver = match family {
            CompilerFamily::Gcc => GXX,
            CompilerFamily::Clang | CompilerFamily::AppleClang => CLANGXX,
            CompilerFamily::Msvc => return self.compiler_path(resolver),
        };

        resolver
            .find_compiler_tool(family, driver, version)
            .map(|found| found.path)
    }

    /// Like [`Toolchain::compiler_path`], but an absent compiler is an error.
    pub fn require_compiler_path(&self, resolver: &Resolver) -> Result<PathBuf, ToolchainError> {
        self.compiler_path(resolver)
            .ok_or_else(|| self.not_installed())
    }

    /// Like [`Toolchain::cxx_compiler_path`], but an absent compiler is an error.
    pub fn require_cxx_compiler_path(
        &self,
        resolver: &Resolver,
    ) -> Result<PathBuf, ToolchainError> {
        self.cxx_compiler_path(resolver)
            .ok_or_else(|| self.not_installed())
    }

    fn not_installed(&self) -> ToolchainError {
        ToolchainError::not_installed(self.compiler, &self.compiler_version)
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
