//! Workspace configuration (config.yaml) data structures
//!
//! The workspace config supplies the image substitution rules, the default
//! related-images seed, and the operator package name. The on-disk key names
//! match what the bundle tooling has always consumed, so the serde renames
//! here are load-bearing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BundleGenError, Result};

/// Workspace configuration (`<workspace>/config.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    /// Operator package name passed to operator-sdk and used to locate the CSV
    #[serde(rename = "operator-packagename")]
    pub package_name: String,

    /// Image substitution rules applied to the generated CSV
    #[serde(rename = "image-substitutions", default)]
    pub image_substitutions: Vec<ImageSubstitution>,

    /// Seed entries for the CSV's relatedImages list
    #[serde(rename = "defaultRelatedImages", default)]
    pub default_related_images: Vec<RelatedImage>,
}

/// One logical image value and the places it must be written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSubstitution {
    /// Replacement image reference, written verbatim to every target
    pub image: String,

    /// Container/env targets that receive the image
    #[serde(rename = "replaceLocations", default)]
    pub replace_locations: Vec<ReplaceLocation>,
}

/// A single substitution target inside the CSV's deployment tree
///
/// Without `replaceAsEnvVars` the container's image field is overwritten
/// directly; with it, each listed env key is upserted on the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceLocation {
    #[serde(rename = "deploymentName")]
    pub deployment_name: String,

    #[serde(rename = "containerName")]
    pub container_name: String,

    #[serde(rename = "replaceAsEnvVars", skip_serializing_if = "Option::is_none")]
    pub replace_as_env_vars: Option<Vec<String>>,
}

/// A `(name, image)` entry in the CSV's relatedImages ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedImage {
    pub name: String,
    pub image: String,
}

impl WorkspaceConfig {
    /// Parse workspace configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize workspace configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(yaml)
    }

    /// Load and validate `config.yaml` from a workspace directory
    pub fn load(workspace: &Path) -> Result<Self> {
        let config_path = workspace.join("config.yaml");

        if !config_path.exists() {
            return Err(BundleGenError::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            BundleGenError::ConfigReadFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| BundleGenError::ConfigParseFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the workspace configuration
    pub fn validate(&self) -> Result<()> {
        if self.package_name.is_empty() {
            return Err(BundleGenError::ConfigInvalid {
                message: "operator-packagename cannot be empty".to_string(),
            });
        }

        for sub in &self.image_substitutions {
            if sub.image.is_empty() {
                return Err(BundleGenError::ConfigInvalid {
                    message: "image-substitutions entry has an empty image".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ReplaceLocation {
    /// Whether this target rewrites env vars instead of the image field
    pub fn is_env_target(&self) -> bool {
        self.replace_as_env_vars.is_some()
    }
}
