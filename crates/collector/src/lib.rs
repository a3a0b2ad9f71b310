//! iOSProbe Collector - Read-only discovery of the iOS build toolchain.
//!
//! Four independent probes (Xcode installations, signing identities,
//! provisioning profiles, keychains) run concurrently and are merged into
//! one [`Snapshot`](iosprobe_schema::Snapshot).

pub mod cache;
pub mod collector;
pub mod commands;
pub mod executor;
pub mod filesystem;
pub mod identities;
pub mod keychains;
pub mod parsers;
pub mod profiles;
pub mod xcode;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{detect, SnapshotCache};
pub use collector::{Collector, DetectOptions, ProbeConfig};
