//! Xcode installation discovery.
//!
//! Candidate developer directories are found on disk, every candidate's
//! `xcodebuild` is queried concurrently, and the answers are folded into an
//! [`XcodeInventory`] with at most one installation per `version:build`.

use crate::commands::CommandSet;
use crate::executor::{stdout_if_success, Executor};
use crate::filesystem::Filesystem;
use crate::parsers::{self, SdkKind};
use iosprobe_common::version;
use iosprobe_schema::{XcodeInstallation, XcodeInventory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Finds and queries Xcode installations.
pub struct XcodeLocator {
    executor: Arc<dyn Executor>,
    filesystem: Arc<dyn Filesystem>,
    commands: Arc<dyn CommandSet>,
    search_root: PathBuf,
    min_sdk: Option<String>,
}

impl XcodeLocator {
    pub fn new(
        executor: Arc<dyn Executor>,
        filesystem: Arc<dyn Filesystem>,
        commands: Arc<dyn CommandSet>,
        search_root: PathBuf,
        min_sdk: Option<String>,
    ) -> Self {
        Self {
            executor,
            filesystem,
            commands,
            search_root,
            min_sdk,
        }
    }

    /// Discover, query and deduplicate every Xcode installation.
    pub async fn locate(&self) -> XcodeInventory {
        let roots = self.candidate_roots().await;
        debug!("Xcode candidate roots: {:?}", roots);

        let selected = match stdout_if_success(
            self.executor.as_ref(),
            self.commands.select_path_cmd(),
        )
        .await
        {
            Some(output) => parsers::parse_selected_path(&output),
            None => String::new(),
        };

        let mut tasks = JoinSet::new();
        let mut probed = 0;
        for (index, root) in roots.into_iter().enumerate() {
            let xcodebuild = Path::new(&root).join("usr").join("bin").join("xcodebuild");
            // A symlinked xcodebuild is reachable through its real path as well.
            if !self.filesystem.is_regular_file(&xcodebuild).await {
                continue;
            }

            let executor = Arc::clone(&self.executor);
            let commands = Arc::clone(&self.commands);
            let min_sdk = self.min_sdk.clone();
            let is_selected = root == selected;
            let xcodebuild = xcodebuild.to_string_lossy().to_string();
            probed += 1;

            tasks.spawn(async move {
                let install = probe_candidate(
                    executor.as_ref(),
                    commands.as_ref(),
                    root,
                    xcodebuild,
                    is_selected,
                    min_sdk.as_deref(),
                )
                .await;
                (index, install)
            });
        }

        let mut results = Vec::with_capacity(probed);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(install))) => results.push((index, install)),
                Ok((_, None)) => {}
                Err(e) => warn!("Xcode probe task failed: {}", e),
            }
        }
        results.sort_by_key(|(index, _)| *index);

        let inventory = dedupe(results.into_iter().map(|(_, install)| install));
        info!(
            "Found {} Xcode installation(s) out of {} candidate(s)",
            inventory.len(),
            probed
        );
        inventory
    }

    /// Developer directories that may hold an Xcode, sorted lexicographically.
    async fn candidate_roots(&self) -> Vec<String> {
        let mut roots = vec![self.search_root.join("Developer")];
        roots.extend(self.xcode_apps_in(&self.search_root.join("Applications")).await);

        let volumes = self.search_root.join("Volumes");
        for volume in self.list(&volumes).await {
            let volume = volumes.join(volume);
            roots.push(volume.join("Developer"));

            let applications = volume.join("Applications");
            if self.filesystem.exists(&applications).await {
                roots.extend(self.xcode_apps_in(&applications).await);
            }
        }

        let mut roots: Vec<String> = roots
            .into_iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        roots.sort();
        roots
    }

    async fn xcode_apps_in(&self, dir: &Path) -> Vec<PathBuf> {
        self.list(dir)
            .await
            .into_iter()
            .filter(|name| is_xcode_app_name(name))
            .map(|name| dir.join(name).join("Contents").join("Developer"))
            .collect()
    }

    async fn list(&self, dir: &Path) -> Vec<String> {
        match self.filesystem.read_dir(dir).await {
            Ok(names) => names,
            Err(e) => {
                debug!("Skipping {}: {:#}", dir.display(), e);
                Vec::new()
            }
        }
    }
}

/// Query one candidate. `None` when it reports no usable version.
async fn probe_candidate(
    executor: &dyn Executor,
    commands: &dyn CommandSet,
    path: String,
    xcodebuild: String,
    selected: bool,
    min_sdk: Option<&str>,
) -> Option<XcodeInstallation> {
    let version_cmd = commands.xcodebuild_version_cmd(&xcodebuild)?;
    let output = stdout_if_success(executor, &version_cmd).await?;
    let Some((version, build)) = parsers::parse_xcodebuild_version(&output) else {
        debug!("No Xcode version in output of {}", version_cmd);
        return None;
    };

    let mut install = XcodeInstallation {
        path,
        xcodebuild,
        selected,
        version,
        build,
        sdks: Vec::new(),
        sims: Vec::new(),
    };

    if let Some(sdks_cmd) = commands.xcodebuild_sdks_cmd(&install.xcodebuild) {
        if let Some(output) = stdout_if_success(executor, &sdks_cmd).await {
            for (kind, sdk) in parsers::parse_showsdks(&output) {
                if min_sdk.is_some_and(|min| !version::gte(&sdk, min)) {
                    continue;
                }
                match kind {
                    SdkKind::Device => install.sdks.push(sdk),
                    SdkKind::Simulator => install.sims.push(sdk),
                }
            }
        }
    }

    debug!(
        "Xcode {} at {} (selected: {})",
        install.identity_key(),
        install.path,
        install.selected
    );
    Some(install)
}

/// Fold installations, given in candidate order, into an inventory.
///
/// For each identity key the selected installation always wins; otherwise
/// the one with the lexicographically greatest path is kept.
pub fn dedupe(installs: impl IntoIterator<Item = XcodeInstallation>) -> XcodeInventory {
    let mut inventory = XcodeInventory::default();

    for install in installs {
        let key = install.identity_key();
        if let Some(existing) = inventory.installations.get(&key) {
            if !supersedes(&install, existing) {
                debug!("Dropping duplicate Xcode {} at {}", key, install.path);
                continue;
            }
        }

        if install.selected {
            inventory.selected = Some(key.clone());
        }
        inventory.installations.insert(key, install);
    }

    inventory
}

fn supersedes(candidate: &XcodeInstallation, existing: &XcodeInstallation) -> bool {
    candidate.selected || (!existing.selected && candidate.path > existing.path)
}

fn is_xcode_app_name(name: &str) -> bool {
    name.starts_with("Xcode") && name.ends_with(".app") && name.len() >= "Xcode.app".len()
}
