//! CSV mutation engine
//!
//! Applies the three transformations to a loaded ClusterServiceVersion, in
//! order: image substitution with related-images aggregation, upgrade
//! metadata stamping, and additive annotation/label merging. Image
//! substitution runs only under the `local` fetch strategy, matching the
//! established tooling behavior; upgrade stamping and the metadata merge run
//! under both strategies.

use std::collections::BTreeMap;

use crate::cli::{FetchStrategy, UpgradeStrategy};
use crate::config::{GenerateConfig, ImageSubstitution, RelatedImage};
use crate::csv::{ClusterServiceVersion, Container, EnvVar};

/// Per-file counts for diagnostic output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    /// Container/env target writes that resolved to an actual location
    pub substitutions: usize,
    /// Final length of spec.relatedImages (0 when substitution was skipped)
    pub related_images: usize,
}

/// Apply the full mutation pass to one CSV document
pub fn mutate_csv(csv: &mut ClusterServiceVersion, config: &GenerateConfig) -> MutationSummary {
    let mut summary = MutationSummary::default();

    if config.fetch_strategy == FetchStrategy::Local {
        summary.substitutions = substitute_images(
            csv,
            &config.workspace_config.image_substitutions,
            &config.workspace_config.default_related_images,
        );
        summary.related_images = csv
            .spec
            .related_images
            .as_ref()
            .map_or(0, Vec::len);
    }

    stamp_upgrade(
        csv,
        config.upgrade_strategy,
        config.previous_version.as_deref(),
        &config.release_version,
    );

    merge_metadata(csv, &config.annotations, &config.labels);

    summary
}

/// Apply substitution rules and overwrite the related-images ledger
///
/// The ledger starts from the configured defaults and gains one entry per
/// resolved write, in rule-then-target-then-deployment-then-container
/// encounter order. It is append-only: re-running the tool on an already
/// mutated CSV duplicates entries. Returns the number of resolved writes.
pub fn substitute_images(
    csv: &mut ClusterServiceVersion,
    rules: &[ImageSubstitution],
    defaults: &[RelatedImage],
) -> usize {
    let mut ledger: Vec<RelatedImage> = defaults.to_vec();
    let mut applied = 0;

    for rule in rules {
        for location in &rule.replace_locations {
            for deployment in &mut csv.spec.install.spec.deployments {
                if deployment.name != location.deployment_name {
                    continue;
                }
                for container in &mut deployment.spec.template.spec.containers {
                    if container.name != location.container_name {
                        continue;
                    }
                    match &location.replace_as_env_vars {
                        None => {
                            container.image = Some(rule.image.clone());
                            ledger.push(RelatedImage {
                                name: related_image_name(&container.name),
                                image: rule.image.clone(),
                            });
                            applied += 1;
                        }
                        Some(keys) => {
                            for key in keys {
                                upsert_env(container, key, &rule.image);
                                ledger.push(RelatedImage {
                                    name: key.clone(),
                                    image: rule.image.clone(),
                                });
                                applied += 1;
                            }
                        }
                    }
                }
            }
        }
    }

    csv.spec.related_images = Some(ledger);
    applied
}

/// Stamp replaces/skipRange metadata for the `replaces` upgrade strategy
///
/// The skip range is half-open: previous inclusive, current exclusive.
/// Under `semver` neither field is written.
pub fn stamp_upgrade(
    csv: &mut ClusterServiceVersion,
    strategy: UpgradeStrategy,
    previous_version: Option<&str>,
    release_version: &str,
) {
    if strategy != UpgradeStrategy::Replaces {
        return;
    }
    // The resolver guarantees a previous version under replaces.
    let Some(previous) = previous_version else {
        return;
    };

    csv.spec.replaces = Some(previous.to_string());
    csv.metadata.annotations.insert(
        "olm.skipRange".to_string(),
        format!(">={previous} <{release_version}"),
    );
}

/// Upsert configured annotations/labels; existing keys not named stay put
pub fn merge_metadata(
    csv: &mut ClusterServiceVersion,
    annotations: &BTreeMap<String, String>,
    labels: &BTreeMap<String, String>,
) {
    for (key, value) in annotations {
        csv.metadata.annotations.insert(key.clone(), value.clone());
    }
    for (key, value) in labels {
        csv.metadata.labels.insert(key.clone(), value.clone());
    }
}

/// Related-image name for a container-target write: upper-cased container
/// name with hyphens normalized to underscores
fn related_image_name(container_name: &str) -> String {
    container_name.to_uppercase().replace('-', "_")
}

/// Update the first env entry matching `key`, or append a new one
fn upsert_env(container: &mut Container, key: &str, value: &str) {
    match container.env.iter_mut().find(|e| e.name == key) {
        Some(entry) => entry.value = Some(value.to_string()),
        None => container.env.push(EnvVar::new(key, value)),
    }
}
