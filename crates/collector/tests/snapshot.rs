//! End-to-end discovery over a fixture machine.

use anyhow::Result;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use async_trait::async_trait;
use iosprobe_collector::executor::Executor;
use iosprobe_collector::filesystem::LocalFilesystem;
use iosprobe_collector::{Collector, DetectOptions, ProbeConfig, SnapshotCache};
use iosprobe_common::HostPlatform;
use predicates::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

struct FixtureExecutor {
    responses: HashMap<String, String>,
}

#[async_trait]
impl Executor for FixtureExecutor {
    async fn execute(&self, command: &str) -> Result<(Option<i32>, String, String)> {
        match self.responses.get(command) {
            Some(stdout) => Ok((Some(0), stdout.clone(), String::new())),
            None => Ok((Some(127), String::new(), format!("{}: not found", command))),
        }
    }
}

const SHOWSDKS: &str = "iOS SDKs:
\tiOS 7.1                       \t-sdk iphoneos7.1
\tiOS 9.2                       \t-sdk iphoneos9.2

iOS Simulator SDKs:
\tSimulator - iOS 7.1           \t-sdk iphonesimulator7.1
\tSimulator - iOS 8.0           \t-sdk iphonesimulator8.0
";

const KEYCHAIN_DUMP: &str = r#"keychain: "/Users/me/Library/Keychains/login.keychain-db"
class: 0x80001000
    "labl"<blob>="iPhone Developer: Jane Doe (ABCDE12345)"
    "labl"<blob>="iPhone Distribution: Acme Corp (KLMNO13579)"
    "labl"<blob>="Apple Worldwide Developer Relations Certification Authority"
"#;

/// Minimal profile: `<data>` holds the base64 of "Distribution:" or not.
fn profile(uuid: &str, devices: bool, certificate_b64: &str) -> String {
    let devices = if devices {
        "<key>ProvisionedDevices</key><array><string>00008030-000A</string></array>"
    } else {
        ""
    };
    format!(
        r#"garbage<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict>
<key>ApplicationIdentifierPrefix</key><array><string>ABCDE12345</string></array>
<key>DeveloperCertificates</key><array><data>{}</data></array>
<key>Entitlements</key><dict>
  <key>application-identifier</key><string>ABCDE12345.com.example.app</string>
</dict>
<key>Name</key><string>{}</string>
{}
<key>UUID</key><string>{}</string>
</dict></plist>trailer"#,
        certificate_b64, uuid, devices, uuid
    )
}

// "iPhone Distribution: Acme" and "iPhone Developer: Jane" in base64.
const DIST_CERT: &str = "aVBob25lIERpc3RyaWJ1dGlvbjogQWNtZQ==";
const DEV_CERT: &str = "aVBob25lIERldmVsb3BlcjogSmFuZQ==";

fn fixture() -> (TempDir, Collector) {
    let temp = TempDir::new().unwrap();
    let mut responses = HashMap::new();

    let mut developer_dirs = Vec::new();
    for developer in [
        "Applications/Xcode.app/Contents/Developer",
        "Volumes/X/Applications/Xcode.app/Contents/Developer",
    ] {
        let xcodebuild = temp.child(format!("{}/usr/bin/xcodebuild", developer));
        xcodebuild.write_str("#!/bin/sh\n").unwrap();
        let path = xcodebuild.path().to_string_lossy().to_string();
        responses.insert(
            format!("'{}' -version", path),
            "Xcode 14.2\nBuild version 14C18\n".to_string(),
        );
        responses.insert(format!("'{}' -showsdks", path), SHOWSDKS.to_string());
        developer_dirs.push(temp.path().join(developer).to_string_lossy().to_string());
    }

    responses.insert("security dump-keychain".to_string(), KEYCHAIN_DUMP.to_string());
    responses.insert(
        "security list-keychains".to_string(),
        "    \"/Users/me/Library/Keychains/login.keychain-db\"\n    \"/Library/Keychains/System.keychain\"\n"
            .to_string(),
    );

    let profiles = temp.child("Provisioning Profiles");
    profiles
        .child("1.mobileprovision")
        .write_str(&profile("dev-1", true, DEV_CERT))
        .unwrap();
    profiles
        .child("2.mobileprovision")
        .write_str(&profile("adhoc-1", true, DIST_CERT))
        .unwrap();
    profiles
        .child("3.mobileprovision")
        .write_str(&profile("store-1", false, DIST_CERT))
        .unwrap();
    profiles
        .child("4.mobileprovision")
        .write_str("no markers at all")
        .unwrap();

    let config = ProbeConfig {
        options: DetectOptions {
            min_sdk: Some("8.0".to_string()),
        },
        platform: HostPlatform::Darwin,
        search_root: temp.path().to_path_buf(),
        profiles_dir: Some(profiles.path().to_path_buf()),
    };
    let collector = Collector::with_collaborators(
        config,
        Arc::new(FixtureExecutor { responses }),
        Arc::new(LocalFilesystem::new()),
    );
    (temp, collector)
}

#[tokio::test]
async fn test_full_snapshot() {
    let (temp, collector) = fixture();
    temp.child("Volumes/X/Applications/Xcode.app")
        .assert(predicate::path::is_dir());

    let snapshot = collector.collect().await.unwrap();

    // Same version on two volumes: the lexicographically last path is kept.
    assert_eq!(snapshot.xcode.len(), 1);
    let xcode = snapshot.xcode.get("14.2:14C18").unwrap();
    assert!(xcode.path.contains("/Volumes/X/Applications/Xcode.app"));
    assert!(snapshot.xcode.selected.is_none());
    assert_eq!(xcode.sdks, vec!["9.2"]);
    assert_eq!(xcode.sims, vec!["8.0"]);

    assert!(snapshot.certs.developer_names.contains("Jane Doe (ABCDE12345)"));
    assert!(snapshot
        .certs
        .distribution_names
        .contains("Acme Corp (KLMNO13579)"));
    assert!(snapshot.certs.wwdr);

    let profiles = &snapshot.provisioning_profiles;
    assert_eq!(profiles.development.len(), 1);
    assert_eq!(profiles.development[0].uuid, "dev-1");
    assert_eq!(profiles.adhoc.len(), 1);
    assert_eq!(profiles.adhoc[0].uuid, "adhoc-1");
    assert_eq!(profiles.distribution.len(), 1);
    assert_eq!(profiles.distribution[0].app_id, "com.example.app");

    assert_eq!(
        snapshot.keychains,
        vec![
            "/Users/me/Library/Keychains/login.keychain-db",
            "/Library/Keychains/System.keychain"
        ]
    );
}

#[tokio::test]
async fn test_snapshot_serializes() {
    let (_temp, collector) = fixture();
    let snapshot = collector.collect().await.unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["xcode"]["installations"]["14.2:14C18"]["version"], "14.2");
    assert_eq!(json["provisioning_profiles"]["adhoc"][0]["name"], "adhoc-1");
    assert_eq!(json["certs"]["developer_names"][0], "Jane Doe (ABCDE12345)");
}

#[tokio::test]
async fn test_cache_returns_identical_snapshot() {
    let (temp, collector) = fixture();
    let cache = SnapshotCache::new();

    let first = cache.get_or_probe(&collector).await.unwrap();
    std::fs::remove_dir_all(temp.path().join("Provisioning Profiles")).unwrap();
    let second = cache.get_or_probe(&collector).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.provisioning_profiles.total(), 3);

    let refreshed = cache.force_refresh(&collector).await.unwrap();
    assert_eq!(refreshed.provisioning_profiles.total(), 0);
}
