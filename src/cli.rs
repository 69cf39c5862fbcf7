//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Bundlegen - operator bundle generator
///
/// Aggregates operator manifests, drives `operator-sdk generate bundle`, and
/// rewrites the resulting ClusterServiceVersion documents.
#[derive(Parser, Debug)]
#[command(
    name = "bundlegen",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Operator bundle generator for OperatorHub artifacts",
    long_about = "Bundlegen assembles an installable operator bundle: it aggregates Kubernetes \
                  resource manifests, invokes operator-sdk to generate the bundle directory, \
                  then rewrites the ClusterServiceVersion with substituted images, related-image \
                  provenance, and upgrade metadata.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  bundlegen generate -w ./operatorhub/pipelines --fetch-strategy local \\\n        \
                  --upgrade-strategy semver --release-version 1.3.0 \\\n        \
                  --channels stable,preview --default-channel stable\n    \
                  bundlegen version\n    \
                  bundlegen completions --shell bash"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the operator bundle and rewrite its CSV
    Generate(GenerateArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// How source manifests are aggregated before bundle generation
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Kustomize build of the workspace-local manifests directory
    Local,
    /// Release manifest file concatenated with the local build output
    ReleaseManifest,
}

impl FetchStrategy {
    /// Name of the strategy subdirectory under `<workspace>/manifests/`
    pub fn dir_name(&self) -> &'static str {
        match self {
            FetchStrategy::Local => "local",
            FetchStrategy::ReleaseManifest => "release-manifest",
        }
    }
}

/// How the installer determines upgrade eligibility
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStrategy {
    /// Semver ordering; the bundle tool's own channel metadata suffices
    Semver,
    /// Explicit replaces chain plus an olm.skipRange annotation
    Replaces,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Local manifests, semver upgrades:\n    \
                  bundlegen generate -w ./workspace --fetch-strategy local \\\n        \
                  --upgrade-strategy semver --release-version 1.3.0 \\\n        \
                  --channels stable --default-channel stable\n\n  \
                  Release manifest, explicit replaces chain:\n    \
                  bundlegen generate -w ./workspace --fetch-strategy release-manifest \\\n        \
                  --release-manifest ./release.yaml --upgrade-strategy replaces \\\n        \
                  --previous-version 1.2.0 --release-version 1.3.0 \\\n        \
                  --channels stable --default-channel stable\n\n  \
                  Extra CSV metadata:\n    \
                  bundlegen generate ... --annotations repository=https://example.com/repo \\\n        \
                  --labels operatorframework.io/arch.amd64=supported")]
pub struct GenerateArgs {
    /// Path to the bundle generation workspace directory
    #[arg(long, short = 'w')]
    pub workspace: PathBuf,

    /// How to aggregate operator resources before bundle generation
    #[arg(long, value_enum)]
    pub fetch_strategy: FetchStrategy,

    /// Path to the release manifest file (release-manifest strategy only)
    #[arg(long, value_name = "FILE")]
    pub release_manifest: Option<PathBuf>,

    /// How the installer determines upgrade eligibility
    #[arg(long, value_enum)]
    pub upgrade_strategy: UpgradeStrategy,

    /// Version being replaced (replaces strategy only)
    #[arg(long, value_name = "VERSION")]
    pub previous_version: Option<String>,

    /// Version of the release being bundled
    #[arg(long, value_name = "VERSION")]
    pub release_version: String,

    /// Comma-separated channel list passed to operator-sdk
    #[arg(long)]
    pub channels: String,

    /// Default channel passed to operator-sdk
    #[arg(long)]
    pub default_channel: String,

    /// Extra CSV annotations as comma-separated key=value pairs
    #[arg(long, value_name = "KEY=VALUE,...")]
    pub annotations: Option<String>,

    /// Extra CSV labels as comma-separated key=value pairs
    #[arg(long, value_name = "KEY=VALUE,...")]
    pub labels: Option<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    bundlegen completions --shell bash > ~/.bash_completion.d/bundlegen\n\n\
                  Generate zsh completions:\n    bundlegen completions --shell zsh > ~/.zfunc/_bundlegen\n\n\
                  Generate fish completions:\n    bundlegen completions --shell fish > ~/.config/fish/completions/bundlegen.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
