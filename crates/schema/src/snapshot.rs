//! The aggregate snapshot returned by detection.

use crate::{CertificateRegistry, ProfileBuckets, XcodeInventory};
use iosprobe_common::Timestamp;
use serde::{Deserialize, Serialize};

/// Everything known about the iOS toolchain on this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub xcode: XcodeInventory,
    pub certs: CertificateRegistry,
    pub provisioning_profiles: ProfileBuckets,
    /// Keychain files in the search list, in the order `security` reports them.
    pub keychains: Vec<String>,
    /// When the probes finished.
    pub probed_at: Timestamp,
}

impl Snapshot {
    /// A snapshot with nothing found.
    pub fn empty() -> Self {
        Self {
            xcode: XcodeInventory::default(),
            certs: CertificateRegistry::default(),
            provisioning_profiles: ProfileBuckets::default(),
            keychains: Vec::new(),
            probed_at: Timestamp::now(),
        }
    }
}
