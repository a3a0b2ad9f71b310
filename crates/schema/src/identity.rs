//! Code-signing identity types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Signing identities found in the keychain.
///
/// Names are kept in ordered sets so duplicates collapse and the
/// serialized output is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRegistry {
    /// Names following `iPhone Developer: `.
    pub developer_names: BTreeSet<String>,
    /// Names following `iPhone Distribution: `.
    pub distribution_names: BTreeSet<String>,
    /// Apple WWDR intermediate certificate flag, as computed from the dump.
    pub wwdr: bool,
}

impl CertificateRegistry {
    pub fn is_empty(&self) -> bool {
        self.developer_names.is_empty() && self.distribution_names.is_empty()
    }
}
