//! Default compiler detection.
//!
//! The host default is probed once per resolver and the answer (including
//! "nothing found") is kept until [`DefaultCompilerCache::reset`].
//! Cross-compile queries bypass the memo entirely.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::core::compiler::{CompilerFamily, CompilerId};
use crate::toolchain::clang::CLANG;
use crate::toolchain::cross::is_cross_compile;
use crate::toolchain::gcc::GCC;
use crate::toolchain::Resolver;

/// Memo for the host's default compiler.
///
/// The outer `Option` says whether detection has run; the inner one is its
/// result. Detection runs while the lock is held, so concurrent callers
/// never probe twice.
#[derive(Debug, Default)]
pub struct DefaultCompilerCache {
    slot: Mutex<Option<Option<CompilerId>>>,
}

impl DefaultCompilerCache {
    fn lock(&self) -> MutexGuard<'_, Option<Option<CompilerId>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the memoized value, computing it with `resolve` on first use.
    pub fn get_or_resolve<F>(&self, resolve: F) -> Option<CompilerId>
    where
        F: FnOnce() -> Option<CompilerId>,
    {
        let mut slot = self.lock();
        if let Some(cached) = slot.as_ref() {
            return cached.clone();
        }
        let resolved = resolve();
        *slot = Some(resolved.clone());
        resolved
    }

    /// The memoized value, or `None` if detection has not run yet.
    pub fn get(&self) -> Option<Option<CompilerId>> {
        self.lock().clone()
    }

    /// Forget the memoized value so the next query probes again.
    pub fn reset(&self) {
        *self.lock() = None;
    }
}

impl Resolver {
    /// The compiler builds should use by default.
    ///
    /// With both `target` and `arch` given and classified as a cross-compile,
    /// the configured cross fallback is returned without probing. Otherwise
    /// the host default is probed once and memoized:
    ///
    /// - Windows: MSVC at the newest installed version.
    /// - Elsewhere: `$CC`, then `cc` (classified by banner), then the newest
    ///   clang, then the newest GCC.
    pub fn default_compiler(&self, target: Option<&str>, arch: Option<&str>) -> Option<CompilerId> {
        if let (Some(target), Some(arch)) = (target, arch) {
            if is_cross_compile(&self.host, target, arch) {
                debug!(
                    "{}-{} is a cross-compile from {}, using {}",
                    target, arch, self.host, self.cross_fallback
                );
                return Some(self.cross_fallback.clone());
            }
        }

        self.default_compiler
            .get_or_resolve(|| self.probe_default_compiler())
    }

    fn probe_default_compiler(&self) -> Option<CompilerId> {
        let found = if self.host.is_windows() {
            self.find_msvc(None)
                .map(|msvc| CompilerId::new(CompilerFamily::Msvc, msvc.version))
        } else {
            self.probe_cc()
                .or_else(|| {
                    self.find_llvm_tool(CLANG, None)
                        .map(|clang| CompilerId::new(CompilerFamily::Clang, clang.version))
                })
                .or_else(|| {
                    self.find_gcc_tool(GCC, None)
                        .map(|gcc| CompilerId::new(CompilerFamily::Gcc, gcc.version))
                })
        };

        match &found {
            Some(id) => info!("Default compiler is {} {}", id.family, id.version),
            None => warn!("No default compiler found; install GCC or Clang"),
        }
        found
    }

    /// Classify `$CC` and then `cc`, whichever is found and recognized first.
    fn probe_cc(&self) -> Option<CompilerId> {
        self.cc_override
            .as_deref()
            .into_iter()
            .chain(std::iter::once("cc"))
            .filter_map(|name| self.runner.find_executable(name, false))
            .find_map(|path| self.compiler_version(&path))
    }
}
