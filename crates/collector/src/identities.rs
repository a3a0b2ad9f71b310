//! Signing identity discovery.

use crate::commands::CommandSet;
use crate::executor::{stdout_if_success, Executor};
use crate::parsers;
use iosprobe_schema::CertificateRegistry;
use tracing::info;

/// Scan the keychain dump for iPhone developer and distribution identities.
///
/// A failed dump yields an empty registry with `wwdr` unset.
pub async fn scan_identities(
    executor: &dyn Executor,
    commands: &dyn CommandSet,
) -> CertificateRegistry {
    let Some(output) = stdout_if_success(executor, commands.dump_keychain_cmd()).await else {
        return CertificateRegistry::default();
    };

    let registry = parsers::parse_keychain_dump(&output);
    info!(
        "Found {} developer and {} distribution identities",
        registry.developer_names.len(),
        registry.distribution_names.len()
    );
    registry
}
