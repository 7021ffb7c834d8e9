//! Cross-compile classification.

use crate::core::host::{normalize_arch, normalize_os, Host};

/// Decide whether building for `target_os`/`target_arch` on `host` is a
/// cross-compile.
///
/// Apple toolchains build macOS and iOS natively, and a Windows host
/// targeting Windows only swaps toolsets, whatever the architecture.
pub fn is_cross_compile(host: &Host, target_os: &str, target_arch: &str) -> bool {
    let target_os = normalize_os(target_os);

    if host.is_macos() && (target_os == "macos" || target_os == "ios") {
        return false;
    }
    if host.is_windows() && target_os == "windows" {
        return false;
    }

    target_os != host.os || normalize_arch(target_arch) != host.arch
}
