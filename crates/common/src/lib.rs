//! Common utilities and types shared across iosprobe crates.

pub mod error;
pub mod os;
pub mod timestamp;
pub mod version;

pub use error::{Error, Result};
pub use os::HostPlatform;
pub use timestamp::Timestamp;
pub use version::Version;
