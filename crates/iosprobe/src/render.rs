//! Output rendering for the CLI.

use iosprobe_schema::{DistributionKind, Snapshot};
use serde_json::Value;
use std::fmt::Write;

/// Which part of the snapshot to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    All,
    Xcode,
    Identities,
    Profiles,
    Keychains,
}

pub fn json_section(snapshot: &Snapshot, section: Section) -> serde_json::Result<Value> {
    match section {
        Section::All => serde_json::to_value(snapshot),
        Section::Xcode => serde_json::to_value(&snapshot.xcode),
        Section::Identities => serde_json::to_value(&snapshot.certs),
        Section::Profiles => serde_json::to_value(&snapshot.provisioning_profiles),
        Section::Keychains => serde_json::to_value(&snapshot.keychains),
    }
}

pub fn text_section(snapshot: &Snapshot, section: Section) -> String {
    let mut out = String::new();
    let all = section == Section::All;

    if all || section == Section::Xcode {
        render_xcode(snapshot, &mut out);
    }
    if all || section == Section::Identities {
        render_identities(snapshot, &mut out);
    }
    if all || section == Section::Profiles {
        render_profiles(snapshot, &mut out);
    }
    if all || section == Section::Keychains {
        render_keychains(snapshot, &mut out);
    }

    out.trim_end().to_string()
}

fn render_xcode(snapshot: &Snapshot, out: &mut String) {
    let _ = writeln!(out, "Xcode");
    if snapshot.xcode.is_empty() {
        let _ = writeln!(out, "  (none found)");
    }
    for (key, xcode) in &snapshot.xcode.installations {
        let marker = if xcode.selected { " (selected)" } else { "" };
        let _ = writeln!(out, "  {}{}", key, marker);
        let _ = writeln!(out, "    path: {}", xcode.path);
        let _ = writeln!(out, "    sdks: {}", xcode.sdks.join(", "));
        let _ = writeln!(out, "    sims: {}", xcode.sims.join(", "));
    }
    out.push('\n');
}

fn render_identities(snapshot: &Snapshot, out: &mut String) {
    let certs = &snapshot.certs;
    let _ = writeln!(out, "Signing identities");
    let _ = writeln!(out, "  wwdr: {}", certs.wwdr);
    for name in &certs.developer_names {
        let _ = writeln!(out, "  developer: {}", name);
    }
    for name in &certs.distribution_names {
        let _ = writeln!(out, "  distribution: {}", name);
    }
    out.push('\n');
}

fn render_profiles(snapshot: &Snapshot, out: &mut String) {
    let _ = writeln!(out, "Provisioning profiles");
    for kind in [
        DistributionKind::Development,
        DistributionKind::Adhoc,
        DistributionKind::Distribution,
    ] {
        let profiles = snapshot.provisioning_profiles.get(kind);
        let _ = writeln!(out, "  {} ({})", kind, profiles.len());
        for profile in profiles {
            let _ = writeln!(
                out,
                "    {} [{}] {}.{}",
                profile.name, profile.uuid, profile.app_id_prefix, profile.app_id
            );
        }
    }
    out.push('\n');
}

fn render_keychains(snapshot: &Snapshot, out: &mut String) {
    let _ = writeln!(out, "Keychains");
    for keychain in &snapshot.keychains {
        let _ = writeln!(out, "  {}", keychain);
    }
    out.push('\n');
}
