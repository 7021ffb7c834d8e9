//! Compiler families and resolved compiler identities.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::toolchain::ToolchainError;

/// Sentinel used for any field that has not been resolved to a concrete value.
pub const DEFAULT: &str = "default";

/// The product line of a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple's clang distribution (Xcode / Command Line Tools)
    #[serde(alias = "apple-clang")]
    AppleClang,
    /// Microsoft Visual C++
    Msvc,
}

impl CompilerFamily {
    /// Every family, in catalog order.
    pub const ALL: [CompilerFamily; 4] = [
        CompilerFamily::Gcc,
        CompilerFamily::Clang,
        CompilerFamily::AppleClang,
        CompilerFamily::Msvc,
    ];

    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::AppleClang => "appleclang",
            CompilerFamily::Msvc => "msvc",
        }
    }
}

impl std::str::FromStr for CompilerFamily {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcc" => Ok(CompilerFamily::Gcc),
            "clang" | "llvm" => Ok(CompilerFamily::Clang),
            "appleclang" | "apple-clang" => Ok(CompilerFamily::AppleClang),
            "msvc" => Ok(CompilerFamily::Msvc),
            _ => Err(ToolchainError::UnknownCompiler(s.to_string())),
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested compiler: either a concrete family or "whatever this host uses".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompilerChoice {
    #[default]
    Default,
    Family(CompilerFamily),
}

impl CompilerChoice {
    /// The concrete family, if one has been chosen.
    pub fn family(&self) -> Option<CompilerFamily> {
        match self {
            CompilerChoice::Default => None,
            CompilerChoice::Family(family) => Some(*family),
        }
    }
}

impl From<CompilerFamily> for CompilerChoice {
    fn from(family: CompilerFamily) -> Self {
        CompilerChoice::Family(family)
    }
}

impl std::str::FromStr for CompilerChoice {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT {
            Ok(CompilerChoice::Default)
        } else {
            s.parse().map(CompilerChoice::Family)
        }
    }
}

impl fmt::Display for CompilerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilerChoice::Default => f.write_str(DEFAULT),
            CompilerChoice::Family(family) => family.fmt(f),
        }
    }
}

/// A classified compiler: family plus version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilerId {
    pub family: CompilerFamily,
    pub version: String,
}

impl CompilerId {
    pub fn new(family: CompilerFamily, version: impl Into<String>) -> Self {
        CompilerId {
            family,
            version: version.into(),
        }
    }
}

impl fmt::Display for CompilerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family, self.version)
    }
}

/// A located tool: where it lives and which version identifier it answers to.
///
/// Lookups return `Option<Resolution>`, so a path is never reported
/// without its version or the other way around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub version: String,
}

impl Resolution {
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Resolution {
            path: path.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse() {
        assert_eq!("gcc".parse::<CompilerFamily>().unwrap(), CompilerFamily::Gcc);
        assert_eq!(
            "apple-clang".parse::<CompilerFamily>().unwrap(),
            CompilerFamily::AppleClang
        );
        assert!(matches!(
            "icc".parse::<CompilerFamily>(),
            Err(ToolchainError::UnknownCompiler(name)) if name == "icc"
        ));
    }

    #[test]
    fn test_choice_roundtrip_display() {
        let choice: CompilerChoice = "default".parse().unwrap();
        assert_eq!(choice, CompilerChoice::Default);
        assert_eq!(choice.to_string(), "default");

        let choice: CompilerChoice = "appleclang".parse().unwrap();
        assert_eq!(choice.family(), Some(CompilerFamily::AppleClang));
        assert_eq!(choice.to_string(), "appleclang");
    }

    #[test]
    fn test_compiler_id_display() {
        assert_eq!(CompilerId::new(CompilerFamily::Gcc, "4.8").to_string(), "gcc-4.8");
    }
}
