//! ClusterServiceVersion document model
//!
//! A typed tree over the CSV paths this tool touches. Every level carries a
//! flattened catch-all map so fields outside the model survive a
//! load-mutate-save cycle untouched. Required fields (`spec.install.spec.
//! deployments`, deployment/container names) are modeled as required, so a
//! structurally broken CSV fails at deserialization with a typed error
//! instead of a key lookup failing at arbitrary depth.

pub mod mutate;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RelatedImage;
use crate::error::{BundleGenError, Result};

/// Catch-all for CSV fields outside the typed model
pub type Extra = serde_yaml::Mapping;

/// A ClusterServiceVersion document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterServiceVersion {
    pub metadata: Metadata,
    pub spec: CsvSpec,

    #[serde(flatten)]
    pub extra: Extra,
}

/// `metadata` block; annotations and labels are merged, never replaced
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// `spec` block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSpec {
    pub install: Install,

    /// Overwritten wholesale by each mutation pass
    #[serde(
        rename = "relatedImages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub related_images: Option<Vec<RelatedImage>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// `spec.install`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Install {
    pub spec: InstallSpec,

    #[serde(flatten)]
    pub extra: Extra,
}

/// `spec.install.spec`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSpec {
    pub deployments: Vec<Deployment>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// One entry of `spec.install.spec.deployments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub spec: DeploymentSpec,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub template: PodTemplate,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodTemplate {
    pub spec: PodSpec,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodSpec {
    pub containers: Vec<Container>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A container in a deployment's pod template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A `(name, value)` environment variable entry
///
/// `valueFrom`-style entries land in `extra` and are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            extra: Extra::new(),
        }
    }
}

impl ClusterServiceVersion {
    /// Parse a CSV document from YAML string
    pub fn from_yaml(yaml: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize the CSV document to YAML string
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }

    /// Load a CSV document from disk
    ///
    /// Parse or traversal failure is fatal for the file; the error names it.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BundleGenError::CsvReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::from_yaml(&content).map_err(|e| BundleGenError::CsvParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Rewrite the full document back to disk
    ///
    /// The in-memory copy is serialized first, so a failure here leaves the
    /// file untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml().map_err(|e| BundleGenError::CsvWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        std::fs::write(path, yaml).map_err(|e| BundleGenError::CsvWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Find CSV documents in a bundle manifests directory
///
/// Matches the operator-sdk naming convention
/// `*.clusterserviceversion.yaml`; results are sorted for a stable
/// processing order.
pub fn find_csv_files(manifests_dir: &Path) -> Result<Vec<PathBuf>> {
    if !manifests_dir.is_dir() {
        return Err(BundleGenError::BundleManifestsNotFound {
            path: manifests_dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(manifests_dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_csv = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("clusterserviceversion.yaml"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
