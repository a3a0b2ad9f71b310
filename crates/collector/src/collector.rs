//! Snapshot assembly.

use crate::commands::{CommandSet, MacCommands};
use crate::executor::{Executor, LocalExecutor};
use crate::filesystem::{Filesystem, LocalFilesystem};
use crate::xcode::XcodeLocator;
use crate::{identities, keychains, profiles};
use iosprobe_common::{HostPlatform, Timestamp};
use iosprobe_schema::{ProfileBuckets, Snapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Options recognised by `detect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectOptions {
    /// Drop SDK and simulator versions older than this.
    pub min_sdk: Option<String>,
}

/// Collector configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub options: DetectOptions,
    pub platform: HostPlatform,
    /// Base under which `Developer`, `Applications` and `Volumes` are searched.
    pub search_root: PathBuf,
    /// Overrides `~/Library/MobileDevice/Provisioning Profiles`.
    pub profiles_dir: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            options: DetectOptions::default(),
            platform: HostPlatform::current(),
            search_root: PathBuf::from("/"),
            profiles_dir: None,
        }
    }
}

impl ProbeConfig {
    pub fn with_options(options: DetectOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }
}

/// Runs the four probes and assembles a [`Snapshot`].
pub struct Collector {
    config: ProbeConfig,
    executor: Arc<dyn Executor>,
    filesystem: Arc<dyn Filesystem>,
    commands: Arc<dyn CommandSet>,
}

impl Collector {
    /// Create a collector that probes the local machine.
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(LocalExecutor::new()),
            Arc::new(LocalFilesystem::new()),
        )
    }

    /// Create a collector over the given executor and filesystem.
    pub fn with_collaborators(
        config: ProbeConfig,
        executor: Arc<dyn Executor>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            config,
            executor,
            filesystem,
            commands: Arc::new(MacCommands::new()),
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run every probe concurrently and assemble the snapshot.
    ///
    /// Returns `None` without probing anything on non-Apple hosts.
    pub async fn collect(&self) -> Option<Snapshot> {
        if !self.config.platform.is_apple() {
            info!(
                "Skipping toolchain discovery on {} host",
                self.config.platform
            );
            return None;
        }

        info!("Starting iOS toolchain discovery");

        let locator = XcodeLocator::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.filesystem),
            Arc::clone(&self.commands),
            self.config.search_root.clone(),
            self.config.options.min_sdk.clone(),
        );

        let (xcode, certs, provisioning_profiles, keychains) = tokio::join!(
            locator.locate(),
            identities::scan_identities(self.executor.as_ref(), self.commands.as_ref()),
            self.collect_profiles(),
            keychains::list_keychains(self.executor.as_ref(), self.commands.as_ref()),
        );

        info!("iOS toolchain discovery complete");

        Some(Snapshot {
            xcode,
            certs,
            provisioning_profiles,
            keychains,
            probed_at: Timestamp::now(),
        })
    }

    async fn collect_profiles(&self) -> ProfileBuckets {
        let dir = match &self.config.profiles_dir {
            Some(dir) => dir.clone(),
            None => match profiles::default_profiles_dir(self.filesystem.as_ref()) {
                Some(dir) => dir,
                None => return ProfileBuckets::default(),
            },
        };
        profiles::classify_profiles(self.filesystem.as_ref(), &dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedExecutor;

    fn darwin_config(root: &std::path::Path) -> ProbeConfig {
        ProbeConfig {
            platform: HostPlatform::Darwin,
            search_root: root.to_path_buf(),
            profiles_dir: Some(root.join("Provisioning Profiles")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_non_apple_host_probes_nothing() {
        let executor = Arc::new(ScriptedExecutor::new());
        let config = ProbeConfig {
            platform: HostPlatform::Linux,
            ..Default::default()
        };
        let collector = Collector::with_collaborators(
            config,
            executor.clone(),
            Arc::new(LocalFilesystem::new()),
        );

        assert!(collector.collect().await.is_none());
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_machine_yields_empty_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        let collector = Collector::with_collaborators(
            darwin_config(temp.path()),
            Arc::new(ScriptedExecutor::new()),
            Arc::new(LocalFilesystem::new()),
        );

        let snapshot = collector.collect().await.unwrap();
        assert!(snapshot.xcode.is_empty());
        assert!(snapshot.certs.is_empty());
        assert!(!snapshot.certs.wwdr);
        assert_eq!(snapshot.provisioning_profiles.total(), 0);
        assert!(snapshot.keychains.is_empty());
    }

    #[tokio::test]
    async fn test_collect_merges_probes() {
        let temp = tempfile::tempdir().unwrap();
        let executor = ScriptedExecutor::new()
            .with_success(
                "security dump-keychain",
                "\"labl\"<blob>=\"iPhone Distribution: Acme Corp (KLMNO13579)\"\n",
            )
            .with_success(
                "security list-keychains",
                "    \"/Library/Keychains/System.keychain\"\n",
            );
        let collector = Collector::with_collaborators(
            darwin_config(temp.path()),
            Arc::new(executor),
            Arc::new(LocalFilesystem::new()),
        );

        let snapshot = collector.collect().await.unwrap();
        assert!(snapshot
            .certs
            .distribution_names
            .contains("Acme Corp (KLMNO13579)"));
        assert_eq!(snapshot.keychains, vec!["/Library/Keychains/System.keychain"]);
    }

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::with_options(DetectOptions {
            min_sdk: Some("8.0".to_string()),
        });
        assert_eq!(config.search_root, PathBuf::from("/"));
        assert_eq!(config.platform, HostPlatform::current());
        assert_eq!(config.options.min_sdk.as_deref(), Some("8.0"));
        assert!(config.profiles_dir.is_none());
    }
}
