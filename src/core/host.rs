//! Host platform facts and OS/arch normalization.
//!
//! Canonical OS tags are `linux`, `macos`, `windows`, `ios`, `android`,
//! `freebsd` and so on. Canonical arch tags are `x86`, `x64`, `armv6`,
//! `armv7` and `armv8`.

use std::fmt;

/// The machine resolution runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Canonical OS tag
    pub os: String,
    /// Canonical architecture tag
    pub arch: String,
}

impl Host {
    /// Create a host description, normalizing both tags.
    pub fn new(os: &str, arch: &str) -> Self {
        Host {
            os: normalize_os(os),
            arch: normalize_arch(arch),
        }
    }

    /// Detect the current host.
    pub fn current() -> Self {
        Host::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    pub fn is_macos(&self) -> bool {
        self.os == "macos"
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Normalize an OS name to its canonical tag.
pub fn normalize_os(os: &str) -> String {
    let os = os.trim().to_lowercase();
    match os.as_str() {
        "darwin" | "osx" | "macosx" | "mac" => "macos".to_string(),
        "win" | "win32" | "win64" | "mingw" | "msys" => "windows".to_string(),
        _ => os,
    }
}

/// Normalize an architecture name to its canonical tag.
pub fn normalize_arch(arch: &str) -> String {
    let arch = arch.trim().to_lowercase();
    match arch.as_str() {
        "x86_64" | "amd64" | "x64" => "x64".to_string(),
        "i386" | "i486" | "i586" | "i686" | "x86" | "win32" => "x86".to_string(),
        "aarch64" | "arm64" | "armv8" | "armv8a" | "arm64e" => "armv8".to_string(),
        "armhf" => "armv7".to_string(),
        a if a.starts_with("armv7") => "armv7".to_string(),
        a if a.starts_with("armv6") => "armv6".to_string(),
        _ => arch,
    }
}

/// Normalize an `os-arch` platform tag.
///
/// The split happens at the first `-`, so arch aliases that contain
/// underscores (`x86_64`) survive intact.
pub fn normalize_target(target: &str) -> String {
    match target.split_once('-') {
        Some((os, arch)) => format!("{}-{}", normalize_os(os), normalize_arch(arch)),
        None => normalize_os(target),
    }
}
