//! Toolchain resolution error types.
//!
//! Probing itself never fails: a compiler that isn't there is reported as
//! `None`. These errors are for callers that need a compiler and want a
//! message instead of an absence.

use thiserror::Error;

/// Error raised when a toolchain requirement can't be met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolchainError {
    #[error("unknown compiler `{0}`, expected one of: gcc, clang, appleclang, msvc")]
    UnknownCompiler(String),

    #[error("{compiler} {version} is not installed")]
    NotInstalled { compiler: String, version: String },

    #[error("no default compiler could be found (tried CC, cc, clang, gcc)")]
    NoDefaultCompiler,
}

impl ToolchainError {
    pub(crate) fn not_installed(compiler: impl ToString, version: impl ToString) -> Self {
        ToolchainError::NotInstalled {
            compiler: compiler.to_string(),
            version: version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ToolchainError::not_installed("gcc", "11").to_string(),
            "gcc 11 is not installed"
        );
        assert!(ToolchainError::UnknownCompiler("icc".into())
            .to_string()
            .contains("`icc`"));
    }
}
