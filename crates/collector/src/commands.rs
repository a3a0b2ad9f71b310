//! Allowlisted commands for discovery.
//!
//! Every command the prober can run is defined here. All of them are
//! read-only queries.

/// Trait for the toolchain command set.
pub trait CommandSet: Send + Sync {
    /// Print the active developer directory.
    fn select_path_cmd(&self) -> &str;

    /// Print the version and build of an `xcodebuild` binary.
    fn xcodebuild_version_cmd(&self, xcodebuild: &str) -> Option<String>;

    /// List the SDKs an `xcodebuild` binary knows about.
    fn xcodebuild_sdks_cmd(&self, xcodebuild: &str) -> Option<String>;

    /// Dump the keychain contents (certificates, no secrets).
    fn dump_keychain_cmd(&self) -> &str;

    /// List the keychain search list.
    fn list_keychains_cmd(&self) -> &str;
}

/// macOS commands using the stock developer tools.
pub struct MacCommands;

impl MacCommands {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacCommands {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSet for MacCommands {
    fn select_path_cmd(&self) -> &str {
        "xcode-select -print-path"
    }

    fn xcodebuild_version_cmd(&self, xcodebuild: &str) -> Option<String> {
        if !is_safe_path(xcodebuild) {
            return None;
        }
        Some(format!("{} -version", shell_quote(xcodebuild)))
    }

    fn xcodebuild_sdks_cmd(&self, xcodebuild: &str) -> Option<String> {
        if !is_safe_path(xcodebuild) {
            return None;
        }
        Some(format!("{} -showsdks", shell_quote(xcodebuild)))
    }

    fn dump_keychain_cmd(&self) -> &str {
        "security dump-keychain"
    }

    fn list_keychains_cmd(&self) -> &str {
        "security list-keychains"
    }
}

/// Wrap a path in single quotes for `sh -c`.
pub fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}

/// Validate that a path can be embedded in a command line.
fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && path.len() < 1024
        && !path.contains('\n')
        && !path.contains('\r')
        && !path.contains('\0')
}
