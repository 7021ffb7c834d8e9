//! The catalog of known compiler versions.
//!
//! Probing is bounded to the version identifiers listed here; a compiler
//! installed under a version the catalog does not know is only found through
//! its unversioned name.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::compiler::{CompilerFamily, DEFAULT};
use crate::util::config::CatalogSettings;

/// Metadata attached to a known version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Human-readable release name (e.g. "Visual Studio 2019")
    pub release: Option<String>,
}

impl VersionInfo {
    fn release(name: &str) -> Self {
        VersionInfo {
            release: Some(name.to_string()),
        }
    }
}

/// Known version identifiers per compiler family.
///
/// Every family map carries a [`DEFAULT`] key, mirroring how the catalog
/// is authored; it is never returned from [`CompilerCatalog::versions`].
#[derive(Debug, Clone)]
pub struct CompilerCatalog {
    families: BTreeMap<CompilerFamily, BTreeMap<String, VersionInfo>>,
}

impl CompilerCatalog {
    /// An empty catalog (only the sentinel keys).
    pub fn empty() -> Self {
        let families = CompilerFamily::ALL
            .iter()
            .map(|family| {
                let mut versions = BTreeMap::new();
                versions.insert(DEFAULT.to_string(), VersionInfo::default());
                (*family, versions)
            })
            .collect();
        CompilerCatalog { families }
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let mut catalog = CompilerCatalog::empty();

        for v in ["4.8", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14"] {
            catalog.add_version(CompilerFamily::Gcc, v);
        }
        for v in [
            "3", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17", "18",
        ] {
            catalog.add_version(CompilerFamily::Clang, v);
        }
        for v in ["11", "12", "13", "14", "15", "16"] {
            catalog.add_version(CompilerFamily::AppleClang, v);
        }

        for (v, release) in [
            ("14", "Visual Studio 2015"),
            ("15", "Visual Studio 2017"),
            ("16", "Visual Studio 2019"),
            ("17", "Visual Studio 2022"),
        ] {
            catalog.insert(CompilerFamily::Msvc, v, VersionInfo::release(release));
        }

        catalog
    }

    /// The built-in catalog extended with versions from configuration.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let mut catalog = CompilerCatalog::builtin();
        for (family, versions) in [
            (CompilerFamily::Gcc, &settings.gcc),
            (CompilerFamily::Clang, &settings.clang),
            (CompilerFamily::AppleClang, &settings.appleclang),
            (CompilerFamily::Msvc, &settings.msvc),
        ] {
            for version in versions {
                catalog.add_version(family, version);
            }
        }
        catalog
    }

    /// Register a version for a family. Existing metadata is kept.
    pub fn add_version(&mut self, family: CompilerFamily, version: &str) {
        self.families
            .entry(family)
            .or_default()
            .entry(version.to_string())
            .or_default();
    }

    fn insert(&mut self, family: CompilerFamily, version: &str, info: VersionInfo) {
        self.families
            .entry(family)
            .or_default()
            .insert(version.to_string(), info);
    }

    /// Known versions of a family, newest first, without the sentinel.
    pub fn versions(&self, family: CompilerFamily) -> Vec<String> {
        let mut versions: Vec<String> = self
            .families
            .get(&family)
            .map(|known| {
                known
                    .keys()
                    .filter(|v| v.as_str() != DEFAULT)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        versions.sort_by(|a, b| compare_versions(b, a));
        versions
    }

    /// Whether a version identifier is known for a family.
    pub fn contains(&self, family: CompilerFamily, version: &str) -> bool {
        version != DEFAULT
            && self
                .families
                .get(&family)
                .is_some_and(|known| known.contains_key(version))
    }

    /// Metadata for a known version.
    pub fn info(&self, family: CompilerFamily, version: &str) -> Option<&VersionInfo> {
        self.families.get(&family)?.get(version)
    }
}

impl Default for CompilerCatalog {
    fn default() -> Self {
        CompilerCatalog::builtin()
    }
}

/// Compare two version identifiers component by component.
///
/// Dot-separated components compare numerically when both parse as
/// integers, so `10` sorts above `9` and `5` above `4.8`. A numeric
/// component sorts above a non-numeric one, and two non-numeric components
/// compare as strings. This keeps the order total for arbitrary labels.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    (Ok(_), Err(_)) => Ordering::Greater,
                    (Err(_), Ok(_)) => Ordering::Less,
                    (Err(_), Err(_)) => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
