//! Xcode installation types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single Xcode installation found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XcodeInstallation {
    /// Developer directory, e.g. `/Applications/Xcode.app/Contents/Developer`.
    pub path: String,
    /// Path to the `xcodebuild` binary inside `path`.
    pub xcodebuild: String,
    /// Whether this is the toolchain reported by `xcode-select`.
    pub selected: bool,
    pub version: String,
    pub build: Option<String>,
    /// iOS device SDK versions.
    pub sdks: Vec<String>,
    /// iOS simulator SDK versions.
    pub sims: Vec<String>,
}

impl XcodeInstallation {
    /// Deduplication key: `version:build`, or just `version` without a build.
    pub fn identity_key(&self) -> String {
        identity_key(&self.version, self.build.as_deref())
    }
}

/// Build the identity key for a version and optional build number.
pub fn identity_key(version: &str, build: Option<&str>) -> String {
    match build {
        Some(build) => format!("{}:{}", version, build),
        None => version.to_string(),
    }
}

/// All retained installations, keyed by identity key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XcodeInventory {
    pub installations: BTreeMap<String, XcodeInstallation>,
    /// Identity key of the selected installation, if one was found.
    pub selected: Option<String>,
}

impl XcodeInventory {
    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.installations.len()
    }

    pub fn get(&self, key: &str) -> Option<&XcodeInstallation> {
        self.installations.get(key)
    }

    /// The installation currently active for command-line builds.
    pub fn selected_installation(&self) -> Option<&XcodeInstallation> {
        self.selected
            .as_deref()
            .and_then(|key| self.installations.get(key))
    }
}
