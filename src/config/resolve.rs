//! Configuration resolution
//!
//! Merges the CLI arguments for `generate` with the workspace-resident
//! `config.yaml` into one immutable [`GenerateConfig`]. All validation
//! happens here, before any side effect is performed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::{FetchStrategy, GenerateArgs, UpgradeStrategy};
use crate::config::workspace::WorkspaceConfig;
use crate::error::{BundleGenError, Result};

/// Fully resolved configuration for one bundle generation run
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Absolute path to the workspace directory
    pub workspace: PathBuf,

    pub fetch_strategy: FetchStrategy,

    /// Absolute path to the release manifest (release-manifest strategy only)
    pub release_manifest: Option<PathBuf>,

    pub upgrade_strategy: UpgradeStrategy,

    /// Version being replaced (replaces strategy only)
    pub previous_version: Option<String>,

    pub release_version: String,

    /// Comma-separated channel list, passed through to operator-sdk verbatim
    pub channels: String,

    pub default_channel: String,

    /// Extra CSV annotations, merged without clearing existing keys
    pub annotations: BTreeMap<String, String>,

    /// Extra CSV labels, merged without clearing existing keys
    pub labels: BTreeMap<String, String>,

    /// Diagnostic output only; no behavioral effect
    pub verbose: bool,

    /// Contents of `<workspace>/config.yaml`
    pub workspace_config: WorkspaceConfig,
}

impl GenerateConfig {
    /// Resolve CLI arguments and the workspace config into one configuration
    pub fn resolve(args: GenerateArgs, verbose: bool) -> Result<Self> {
        let workspace = absolute_path(&args.workspace)?;
        if !workspace.is_dir() {
            return Err(BundleGenError::WorkspaceNotFound {
                path: workspace.display().to_string(),
            });
        }

        let workspace_config = WorkspaceConfig::load(&workspace)?;

        let release_manifest = match args.fetch_strategy {
            FetchStrategy::Local => None,
            FetchStrategy::ReleaseManifest => {
                let path = args.release_manifest.ok_or_else(|| {
                    BundleGenError::ConfigInvalid {
                        message: "--release-manifest is required for the release-manifest \
                                  fetch strategy"
                            .to_string(),
                    }
                })?;
                let path = absolute_path(&path)?;
                if !path.is_file() {
                    return Err(BundleGenError::ReleaseManifestNotFound {
                        path: path.display().to_string(),
                    });
                }
                Some(path)
            }
        };

        let previous_version = match args.upgrade_strategy {
            UpgradeStrategy::Semver => args.previous_version,
            UpgradeStrategy::Replaces => Some(
                args.previous_version
                    .ok_or(BundleGenError::PreviousVersionMissing)?,
            ),
        };

        let annotations = match args.annotations.as_deref() {
            Some(raw) => parse_key_values(raw)?,
            None => BTreeMap::new(),
        };
        let labels = match args.labels.as_deref() {
            Some(raw) => parse_key_values(raw)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            workspace,
            fetch_strategy: args.fetch_strategy,
            release_manifest,
            upgrade_strategy: args.upgrade_strategy,
            previous_version,
            release_version: args.release_version,
            channels: args.channels,
            default_channel: args.default_channel,
            annotations,
            labels,
            verbose,
            workspace_config,
        })
    }

    /// `<workspace>/release-artifacts`, where the bundle tree is produced
    pub fn artifact_dir(&self) -> PathBuf {
        self.workspace.join("release-artifacts")
    }

    /// `<workspace>/manifests/<strategy>`, the kustomize build root
    pub fn strategy_manifests_dir(&self) -> PathBuf {
        self.workspace
            .join("manifests")
            .join(self.fetch_strategy.dir_name())
    }

    /// `<workspace>/release-artifacts/bundle/manifests`, where CSVs land
    pub fn bundle_manifests_dir(&self) -> PathBuf {
        self.artifact_dir().join("bundle").join("manifests")
    }
}

/// Parse a comma-separated list of `key=value` entries
///
/// Any entry that does not split into exactly two parts is a hard
/// configuration error naming the offending entry.
pub fn parse_key_values(input: &str) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in input.split(',') {
        let parts: Vec<&str> = entry.split('=').collect();
        if parts.len() != 2 {
            return Err(BundleGenError::InvalidKeyValue {
                entry: entry.to_string(),
            });
        }
        map.insert(parts[0].to_string(), parts[1].to_string());
    }
    Ok(map)
}

/// Resolve a possibly relative path against the current directory
fn absolute_path(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
