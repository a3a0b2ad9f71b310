//! Host platform detection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform the prober is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Darwin,
    Linux,
    Windows,
    Other,
}

impl HostPlatform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            HostPlatform::Darwin
        } else if cfg!(target_os = "linux") {
            HostPlatform::Linux
        } else if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else {
            HostPlatform::Other
        }
    }

    /// Only Apple hosts carry an Xcode toolchain worth probing.
    pub fn is_apple(&self) -> bool {
        matches!(self, HostPlatform::Darwin)
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Darwin => write!(f, "darwin"),
            HostPlatform::Linux => write!(f, "linux"),
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::Other => write!(f, "other"),
        }
    }
}

impl FromStr for HostPlatform {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "darwin" | "macos" => Ok(HostPlatform::Darwin),
            "linux" => Ok(HostPlatform::Linux),
            "windows" => Ok(HostPlatform::Windows),
            _ => Err(crate::Error::UnsupportedPlatform(s.to_string())),
        }
    }
}
