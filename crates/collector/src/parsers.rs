//! Parsers for command outputs.
//!
//! One function per external tool, so a change in a tool's output format
//! only touches its parser.

use iosprobe_schema::CertificateRegistry;
use regex::Regex;
use std::sync::LazyLock;

static XCODE_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)xcode\s+?(.*)").unwrap());

static XCODE_BUILD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)build ?version:?\s+?(.*)").unwrap());

static SDK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(iphoneos|iphonesimulator)(.+)$").unwrap());

static DEVELOPER_IDENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""iPhone Developer: (.*)""#).unwrap());

static DISTRIBUTION_IDENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""iPhone Distribution: (.*)""#).unwrap());

static QUOTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Marker for the Apple Worldwide Developer Relations intermediate certificate.
pub const WWDR_MARKER: &str = "Apple Worldwide Developer Relations Certification Authority";

/// Which kind of SDK a `-showsdks` line names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkKind {
    Device,
    Simulator,
}

/// Parse `xcode-select -print-path` output.
pub fn parse_selected_path(output: &str) -> String {
    output.trim().to_string()
}

/// Parse `xcodebuild -version` output into (version, build).
///
/// Returns `None` when no version can be found.
pub fn parse_xcodebuild_version(output: &str) -> Option<(String, Option<String>)> {
    let version = XCODE_VERSION_PATTERN
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())?;

    let build = XCODE_BUILD_PATTERN
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|b| !b.is_empty());

    Some((version, build))
}

/// Parse `xcodebuild -showsdks` output into iOS device and simulator SDK versions.
pub fn parse_showsdks(output: &str) -> Vec<(SdkKind, String)> {
    let mut sdks = Vec::new();

    for line in output.lines() {
        if let Some(caps) = SDK_PATTERN.captures(line) {
            let kind = match &caps[1] {
                "iphoneos" => SdkKind::Device,
                _ => SdkKind::Simulator,
            };
            let version = caps[2].trim();
            if !version.is_empty() {
                sdks.push((kind, version.to_string()));
            }
        }
    }

    sdks
}

/// Parse `security dump-keychain` output into signing identities.
///
/// `wwdr` is set as soon as one line of the dump does not mention the WWDR
/// certificate.
// TODO: confirm whether `wwdr` should instead mean "the WWDR marker is present"
// and invert the check once product owners agree.
pub fn parse_keychain_dump(output: &str) -> CertificateRegistry {
    let mut registry = CertificateRegistry::default();

    for line in output.split('\n') {
        if let Some(caps) = DEVELOPER_IDENTITY_PATTERN.captures(line) {
            registry.developer_names.insert(caps[1].trim().to_string());
        }

        if let Some(caps) = DISTRIBUTION_IDENTITY_PATTERN.captures(line) {
            registry
                .distribution_names
                .insert(caps[1].trim().to_string());
        }

        if !registry.wwdr && !line.contains(WWDR_MARKER) {
            registry.wwdr = true;
        }
    }

    registry
}

/// Parse `security list-keychains` output into keychain paths.
pub fn parse_keychain_list(output: &str) -> Vec<String> {
    let mut keychains = Vec::new();

    for line in output.lines() {
        for caps in QUOTED_PATTERN.captures_iter(line) {
            let path = caps[1].trim();
            if !path.is_empty() {
                keychains.push(path.to_string());
            }
        }
    }

    keychains
}
