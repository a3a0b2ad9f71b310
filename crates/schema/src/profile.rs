//! Provisioning profile types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a provisioning profile may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Development,
    Adhoc,
    Distribution,
}

impl DistributionKind {
    /// Classify from the two facts that decide it.
    ///
    /// A profile without provisioned devices is always `Distribution`,
    /// whatever its certificate says.
    pub fn classify(has_devices: bool, certificate_is_distribution: bool) -> Self {
        match (has_devices, certificate_is_distribution) {
            (false, _) => DistributionKind::Distribution,
            (true, true) => DistributionKind::Adhoc,
            (true, false) => DistributionKind::Development,
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::Development => write!(f, "development"),
            DistributionKind::Adhoc => write!(f, "adhoc"),
            DistributionKind::Distribution => write!(f, "distribution"),
        }
    }
}

/// Identity and entitlement data extracted from a `.mobileprovision` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningProfile {
    pub uuid: String,
    pub name: String,
    pub app_id_prefix: String,
    /// `application-identifier` entitlement without the `<prefix>.` part.
    pub app_id: String,
    /// `get-task-allow` entitlement.
    pub allows_debugging: bool,
    /// `aps-environment` entitlement, empty when absent.
    pub push_environment: String,
}

/// Profiles grouped by [`DistributionKind`], each in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBuckets {
    pub adhoc: Vec<ProvisioningProfile>,
    pub development: Vec<ProvisioningProfile>,
    pub distribution: Vec<ProvisioningProfile>,
}

impl ProfileBuckets {
    pub fn push(&mut self, kind: DistributionKind, profile: ProvisioningProfile) {
        match kind {
            DistributionKind::Adhoc => self.adhoc.push(profile),
            DistributionKind::Development => self.development.push(profile),
            DistributionKind::Distribution => self.distribution.push(profile),
        }
    }

    pub fn get(&self, kind: DistributionKind) -> &[ProvisioningProfile] {
        match kind {
            DistributionKind::Adhoc => &self.adhoc,
            DistributionKind::Development => &self.development,
            DistributionKind::Distribution => &self.distribution,
        }
    }

    pub fn total(&self) -> usize {
        self.adhoc.len() + self.development.len() + self.distribution.len()
    }
}
