//! Error types and handling for bundlegen
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bundlegen operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundleGenError {
    // Configuration errors
    #[error("Workspace directory not found: {path}")]
    #[diagnostic(
        code(bundlegen::workspace::not_found),
        help("Pass an existing bundle generation workspace with --workspace")
    )]
    WorkspaceNotFound { path: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(bundlegen::config::not_found),
        help("The workspace must contain a config.yaml with image substitutions and package name")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(bundlegen::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(bundlegen::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(bundlegen::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Invalid key=value entry: {entry}")]
    #[diagnostic(
        code(bundlegen::config::invalid_key_value),
        help("Annotations and labels take the form key=value, comma-separated: a=1,b=2")
    )]
    InvalidKeyValue { entry: String },

    #[error("Release manifest file not found: {path}")]
    #[diagnostic(
        code(bundlegen::config::release_manifest_missing),
        help("The release-manifest fetch strategy requires an existing file passed via --release-manifest")
    )]
    ReleaseManifestNotFound { path: String },

    #[error("Previous version is required for the replaces upgrade strategy")]
    #[diagnostic(
        code(bundlegen::config::previous_version_missing),
        help("Pass --previous-version when using --upgrade-strategy replaces")
    )]
    PreviousVersionMissing,

    // External tool errors
    #[error("Failed to run {tool}: {reason}")]
    #[diagnostic(
        code(bundlegen::tool::spawn_failed),
        help("Check that the tool is installed and on PATH")
    )]
    ToolSpawnFailed { tool: String, reason: String },

    #[error("{tool} exited with status {status}")]
    #[diagnostic(code(bundlegen::tool::failed))]
    ToolFailed { tool: String, status: i32 },

    // CSV document errors
    #[error("Bundle manifests directory not found: {path}")]
    #[diagnostic(
        code(bundlegen::csv::manifests_missing),
        help("operator-sdk generate bundle should have produced bundle/manifests under release-artifacts")
    )]
    BundleManifestsNotFound { path: String },

    #[error("Failed to read CSV file: {path}")]
    #[diagnostic(code(bundlegen::csv::read_failed))]
    CsvReadFailed { path: String, reason: String },

    #[error("Failed to parse CSV file: {path}")]
    #[diagnostic(code(bundlegen::csv::parse_failed))]
    CsvParseFailed { path: String, reason: String },

    #[error("Failed to write CSV file: {path}")]
    #[diagnostic(code(bundlegen::csv::write_failed))]
    CsvWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundlegen::fs::io_error))]
    IoError { message: String },

    #[error("YAML error: {reason}")]
    #[diagnostic(code(bundlegen::yaml::error))]
    YamlError { reason: String },
}

impl BundleGenError {
    /// Exit code for this error; external tool failures propagate the
    /// child's own exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            BundleGenError::ToolFailed { status, .. } if *status > 0 => *status,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for BundleGenError {
    fn from(err: std::io::Error) -> Self {
        BundleGenError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BundleGenError {
    fn from(err: serde_yaml::Error) -> Self {
        BundleGenError::YamlError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundleGenError>;
