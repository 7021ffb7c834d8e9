//! Configuration file support for Keel.
//!
//! Keel reads toolchain policy from two locations:
//! - Global: `~/.keel/toolchain.toml` - User-wide defaults
//! - Project: `.keel/toolchain.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! ```toml
//! [cross]
//! compiler = "gcc"
//! version = "4.8"
//!
//! [catalog]
//! gcc = ["15"]
//!
//! [msvc]
//! helper = "vswhere"
//! install-command = ["choco", "install", "--no-progress", "vswhere"]
//! auto-install = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default cross-compile compiler family.
pub const DEFAULT_CROSS_COMPILER: &str = "gcc";

/// Default cross-compile compiler version.
pub const DEFAULT_CROSS_VERSION: &str = "4.8";

/// Default name of the Visual Studio enumeration helper.
pub const DEFAULT_MSVC_HELPER: &str = "vswhere";

/// Keel toolchain configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeelConfig {
    /// Toolchain forced for cross-compiles
    pub cross: CrossSettings,

    /// Extra known compiler versions
    pub catalog: CatalogSettings,

    /// MSVC discovery settings
    pub msvc: MsvcSettings,
}

/// Toolchain forced whenever a descriptor is classified as cross-compiling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSettings {
    /// Compiler family (defaults to gcc)
    pub compiler: Option<String>,

    /// Compiler version (defaults to 4.8)
    pub version: Option<String>,
}

impl CrossSettings {
    /// Effective compiler family name.
    pub fn compiler(&self) -> &str {
        self.compiler.as_deref().unwrap_or(DEFAULT_CROSS_COMPILER)
    }

    /// Effective compiler version.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_CROSS_VERSION)
    }
}

/// Versions added to the built-in compiler catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub gcc: Vec<String>,
    pub clang: Vec<String>,
    pub appleclang: Vec<String>,
    pub msvc: Vec<String>,
}

impl CatalogSettings {
    fn is_empty(&self) -> bool {
        self.gcc.is_empty()
            && self.clang.is_empty()
            && self.appleclang.is_empty()
            && self.msvc.is_empty()
    }
}

/// Settings for locating Visual Studio installations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MsvcSettings {
    /// Name or path of the enumeration helper (defaults to vswhere)
    pub helper: Option<String>,

    /// Command that installs the helper when it is missing
    pub install_command: Option<Vec<String>>,

    /// Whether a missing helper may be installed automatically
    pub auto_install: Option<bool>,
}

impl MsvcSettings {
    /// Effective helper name.
    pub fn helper(&self) -> &str {
        self.helper.as_deref().unwrap_or(DEFAULT_MSVC_HELPER)
    }

    /// Effective install command (program followed by arguments).
    pub fn install_command(&self) -> Vec<String> {
        self.install_command.clone().unwrap_or_else(|| {
            ["choco", "install", "--no-progress", "vswhere"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
    }

    /// Whether auto-install is enabled.
    pub fn auto_install(&self) -> bool {
        self.auto_install.unwrap_or(true)
    }
}

impl KeelConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Check if any settings are configured.
    pub fn has_overrides(&self) -> bool {
        self.cross != CrossSettings::default()
            || !self.catalog.is_empty()
            || self.msvc != MsvcSettings::default()
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Catalog versions accumulate; everything else is replaced field by field.
    pub fn merge(&mut self, other: KeelConfig) {
        if other.cross.compiler.is_some() {
            self.cross.compiler = other.cross.compiler;
        }
        if other.cross.version.is_some() {
            self.cross.version = other.cross.version;
        }

        self.catalog.gcc.extend(other.catalog.gcc);
        self.catalog.clang.extend(other.catalog.clang);
        self.catalog.appleclang.extend(other.catalog.appleclang);
        self.catalog.msvc.extend(other.catalog.msvc);

        if other.msvc.helper.is_some() {
            self.msvc.helper = other.msvc.helper;
        }
        if other.msvc.install_command.is_some() {
            self.msvc.install_command = other.msvc.install_command;
        }
        if other.msvc.auto_install.is_some() {
            self.msvc.auto_install = other.msvc.auto_install;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.keel/toolchain.toml)
/// 2. Global config (~/.keel/toolchain.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> KeelConfig {
    let mut config = KeelConfig::default();

    if global_path.exists() {
        config.merge(KeelConfig::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(KeelConfig::load_or_default(project_path));
    }

    config
}

/// Load configuration for a project rooted at `project_root`.
pub fn load_project_config(project_root: &Path) -> KeelConfig {
    let project_path = project_toolchain_config_path(project_root);
    let global_path = global_toolchain_config_path().unwrap_or_default();
    load_config(&global_path, &project_path)
}

/// Get the global keel config directory (~/.keel).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".keel"))
}

/// Get the global toolchain config path (~/.keel/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.keel/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".keel").join("toolchain.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = KeelConfig::default();
        assert_eq!(config.cross.compiler(), "gcc");
        assert_eq!(config.cross.version(), "4.8");
        assert_eq!(config.msvc.helper(), "vswhere");
        assert_eq!(
            config.msvc.install_command(),
            vec!["choco", "install", "--no-progress", "vswhere"]
        );
        assert!(config.msvc.auto_install());
        assert!(!config.has_overrides());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchain.toml");

        std::fs::write(
            &config_path,
            r#"
[cross]
compiler = "clang"
version = "16"

[catalog]
gcc = ["15"]
clang = ["19", "20"]

[msvc]
helper = "C:/tools/vswhere.exe"
install-command = ["winget", "install", "vswhere"]
auto-install = false
"#,
        )
        .unwrap();

        let config = KeelConfig::load(&config_path).unwrap();
        assert_eq!(config.cross.compiler(), "clang");
        assert_eq!(config.cross.version(), "16");
        assert_eq!(config.catalog.gcc, vec!["15"]);
        assert_eq!(config.catalog.clang, vec!["19", "20"]);
        assert_eq!(config.msvc.helper(), "C:/tools/vswhere.exe");
        assert_eq!(config.msvc.install_command(), vec!["winget", "install", "vswhere"]);
        assert!(!config.msvc.auto_install());
        assert!(config.has_overrides());
    }

    #[test]
    fn test_config_load_invalid_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchain.toml");
        std::fs::write(&config_path, "[cross\ncompiler = ").unwrap();

        assert!(KeelConfig::load(&config_path).is_err());
        assert_eq!(KeelConfig::load_or_default(&config_path), KeelConfig::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = KeelConfig::default();
        base.cross.compiler = Some("gcc".to_string());
        base.cross.version = Some("9".to_string());
        base.catalog.gcc = vec!["15".to_string()];

        let mut override_cfg = KeelConfig::default();
        override_cfg.cross.version = Some("11".to_string());
        override_cfg.catalog.gcc = vec!["16".to_string()];

        base.merge(override_cfg);

        assert_eq!(base.cross.compiler(), "gcc"); // Not overridden
        assert_eq!(base.cross.version(), "11");
        assert_eq!(base.catalog.gcc, vec!["15", "16"]);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[cross]
compiler = "gcc"
version = "9"

[msvc]
auto-install = false
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[cross]
version = "12"
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.cross.compiler(), "gcc");
        assert_eq!(config.cross.version(), "12");
        assert!(!config.msvc.auto_install());
    }

    #[test]
    fn test_load_project_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(
            &tmp.path().join("nope.toml"),
            &project_toolchain_config_path(tmp.path()),
        );
        assert_eq!(config, KeelConfig::default());
    }
}
