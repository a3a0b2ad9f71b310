//! Provisioning profile discovery and classification.
//!
//! A `.mobileprovision` file is a CMS envelope around an XML property list.
//! The property list is cut out between the first `<?xml` and the last
//! `</plist>` and parsed; the signature itself is not verified.

use crate::filesystem::Filesystem;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use iosprobe_common::{Error, Result};
use iosprobe_schema::{DistributionKind, ProfileBuckets, ProvisioningProfile};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where Xcode installs provisioning profiles, relative to the home directory.
pub const PROFILES_SUBDIR: &str = "Library/MobileDevice/Provisioning Profiles";

const PROFILE_EXTENSION: &str = ".mobileprovision";
const XML_START: &[u8] = b"<?xml";
const PLIST_END: &[u8] = b"</plist>";
const DISTRIBUTION_MARKER: &[u8] = b"Distribution:";

/// Default profiles directory for the current user.
pub fn default_profiles_dir(filesystem: &dyn Filesystem) -> Option<PathBuf> {
    filesystem.home_dir().map(|home| home.join(PROFILES_SUBDIR))
}

/// Parse and classify every profile in `dir`.
///
/// A missing directory yields empty buckets; unreadable or malformed files
/// are skipped one by one.
pub async fn classify_profiles(filesystem: &dyn Filesystem, dir: &Path) -> ProfileBuckets {
    let mut buckets = ProfileBuckets::default();

    if !filesystem.exists(dir).await {
        debug!("No provisioning profiles directory at {}", dir.display());
        return buckets;
    }

    let names = match filesystem.read_dir(dir).await {
        Ok(names) => names,
        Err(e) => {
            debug!("Cannot list {}: {:#}", dir.display(), e);
            return buckets;
        }
    };

    for name in names.into_iter().filter(|n| is_profile_name(n)) {
        let path = dir.join(&name);
        let contents = match filesystem.read(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        };

        match parse_profile(&contents) {
            Ok((kind, profile)) => {
                debug!("{} is a {} profile", name, kind);
                buckets.push(kind, profile);
            }
            Err(e) => debug!("Skipping {}: {}", path.display(), e),
        }
    }

    info!(
        "Found {} provisioning profile(s): {} development, {} adhoc, {} distribution",
        buckets.total(),
        buckets.development.len(),
        buckets.adhoc.len(),
        buckets.distribution.len()
    );
    buckets
}

/// Parse the raw bytes of a `.mobileprovision` file.
pub fn parse_profile(contents: &[u8]) -> Result<(DistributionKind, ProvisioningProfile)> {
    let xml = extract_plist(contents)
        .ok_or_else(|| Error::MalformedProfile("no embedded property list".to_string()))?;

    let value = Value::from_reader_xml(xml)
        .map_err(|e| Error::MalformedProfile(format!("invalid property list: {}", e)))?;
    let root = value
        .as_dictionary()
        .ok_or_else(|| Error::MalformedProfile("property list is not a dictionary".to_string()))?;

    let app_id_prefix = root
        .get("ApplicationIdentifierPrefix")
        .and_then(Value::as_array)
        .and_then(|prefixes| prefixes.first())
        .and_then(Value::as_string)
        .unwrap_or_default()
        .to_string();

    let empty = Dictionary::new();
    let entitlements = root
        .get("Entitlements")
        .and_then(Value::as_dictionary)
        .unwrap_or(&empty);

    let has_devices = root
        .get("ProvisionedDevices")
        .and_then(Value::as_array)
        .is_some_and(|devices| !devices.is_empty());
    // Certificates are only inspected when the device list decides nothing.
    let kind = if has_devices {
        DistributionKind::classify(true, first_certificate_is_distribution(root))
    } else {
        DistributionKind::Distribution
    };

    let application_identifier = string_entry(entitlements, "application-identifier");
    let profile = ProvisioningProfile {
        uuid: string_entry(root, "UUID"),
        name: string_entry(root, "Name"),
        app_id: strip_app_id_prefix(&application_identifier, &app_id_prefix),
        app_id_prefix,
        allows_debugging: entitlements
            .get("get-task-allow")
            .and_then(Value::as_boolean)
            .unwrap_or(false),
        push_environment: string_entry(entitlements, "aps-environment"),
    };

    Ok((kind, profile))
}

/// Slice from the first `<?xml` through the last `</plist>`.
fn extract_plist(contents: &[u8]) -> Option<&[u8]> {
    let start = find(contents, XML_START)?;
    let end = rfind(contents, PLIST_END)? + PLIST_END.len();
    (start < end).then(|| &contents[start..end])
}

/// Whether the first developer certificate names a distribution identity.
///
/// Certificates are normally `<data>` elements; a base64 `<string>` is
/// accepted too. A missing or undecodable certificate counts as development.
fn first_certificate_is_distribution(root: &Dictionary) -> bool {
    let certificate = match root
        .get("DeveloperCertificates")
        .and_then(Value::as_array)
        .and_then(|certs| certs.first())
    {
        Some(Value::Data(bytes)) => bytes.clone(),
        Some(Value::String(encoded)) => {
            let compact: String = encoded.split_whitespace().collect();
            match STANDARD.decode(compact) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("Undecodable developer certificate: {}", e);
                    return false;
                }
            }
        }
        _ => return false,
    };

    find(&certificate, DISTRIBUTION_MARKER).is_some()
}

/// Remove the first `<prefix>.` from an application identifier.
fn strip_app_id_prefix(application_identifier: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return application_identifier.to_string();
    }
    application_identifier.replacen(&format!("{}.", prefix), "", 1)
}

fn string_entry(dict: &Dictionary, key: &str) -> String {
    dict.get(key)
        .and_then(Value::as_string)
        .unwrap_or_default()
        .to_string()
}

fn is_profile_name(name: &str) -> bool {
    name.len() > PROFILE_EXTENSION.len() && name.ends_with(PROFILE_EXTENSION)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
