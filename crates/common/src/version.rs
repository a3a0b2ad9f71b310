//! Dotted numeric version comparison.
//!
//! Versions are compared as tuples of integers, component by component.
//! Missing trailing components count as zero, so `"8"`, `"8.0"` and
//! `"8.0.0"` are all equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed dotted version such as `16.2` or `14.0.1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(Vec<u64>);

impl Version {
    /// Parse a version string. Never fails: a component that does not start
    /// with a digit reads as `0`, and anything after its leading digits is
    /// ignored (`"4b"` reads as `4`).
    pub fn parse(s: &str) -> Self {
        let components = s
            .trim()
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().unwrap_or(0)
            })
            .collect();
        Version(components)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }

    fn component(&self, index: usize) -> u64 {
        self.0.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// `true` when `version >= minimum`.
pub fn gte(version: &str, minimum: &str) -> bool {
    Version::parse(version) >= Version::parse(minimum)
}
