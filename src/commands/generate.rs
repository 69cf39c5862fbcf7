//! Generate command implementation
//!
//! The single pipeline: configuration resolution, resource aggregation and
//! bundle invocation, then CSV mutation. Strictly sequential; a failure in
//! any stage aborts the run before the next stage starts.

use console::Style;

use crate::cli::{FetchStrategy, GenerateArgs};
use crate::config::GenerateConfig;
use crate::csv::mutate::mutate_csv;
use crate::csv::{ClusterServiceVersion, find_csv_files};
use crate::error::Result;

/// Run generate command
pub fn run(args: GenerateArgs, verbose: bool) -> Result<()> {
    let config = GenerateConfig::resolve(args, verbose)?;

    stage("Generating bundle");
    if config.verbose {
        describe(&config);
    }
    crate::bundle::run(&config)?;

    stage("Updating CSV");
    update_csv_files(&config)
}

/// Mutate every CSV document in the generated bundle
fn update_csv_files(config: &GenerateConfig) -> Result<()> {
    let manifests_dir = config.bundle_manifests_dir();
    let files = find_csv_files(&manifests_dir)?;

    for path in &files {
        let mut doc = ClusterServiceVersion::load(path)?;
        let summary = mutate_csv(&mut doc, config);
        doc.save(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if config.fetch_strategy == FetchStrategy::Local {
            println!(
                "  {} {} ({} substitutions, {} related images)",
                Style::new().green().apply_to("updated"),
                name,
                summary.substitutions,
                summary.related_images
            );
        } else {
            println!("  {} {}", Style::new().green().apply_to("updated"), name);
        }
    }

    Ok(())
}

/// Print a stage header
fn stage(title: &str) {
    println!("{}", Style::new().bold().cyan().apply_to(title));
}

/// Verbose description of the resolved configuration
fn describe(config: &GenerateConfig) {
    let dim = Style::new().dim();
    println!(
        "  {}",
        dim.apply_to(format!(
            "package: {}",
            config.workspace_config.package_name
        ))
    );
    println!(
        "  {}",
        dim.apply_to(format!(
            "fetch strategy: {}",
            config.fetch_strategy.dir_name()
        ))
    );
    if let Some(manifest) = &config.release_manifest {
        println!(
            "  {}",
            dim.apply_to(format!("release manifest: {}", manifest.display()))
        );
    }
    println!(
        "  {}",
        dim.apply_to(format!(
            "version: {} (channels: {}, default: {})",
            config.release_version, config.channels, config.default_channel
        ))
    );
    if let Some(previous) = &config.previous_version {
        println!("  {}", dim.apply_to(format!("replaces: {previous}")));
    }
}
