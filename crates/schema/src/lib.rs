//! Snapshot schema definitions for iosprobe.
//!
//! This crate defines the structure of an environment snapshot:
//! Xcode installations, signing identities, provisioning profiles
//! and keychains.

pub mod identity;
pub mod profile;
pub mod snapshot;
pub mod xcode;

pub use identity::CertificateRegistry;
pub use profile::{DistributionKind, ProfileBuckets, ProvisioningProfile};
pub use snapshot::Snapshot;
pub use xcode::{XcodeInstallation, XcodeInventory};
