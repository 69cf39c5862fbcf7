//! External-process invocation plan
//!
//! A plain-data description of the commands the aggregation stage will run,
//! kept separate from execution so the exact argv per fetch strategy is unit
//! testable.

use std::path::PathBuf;

use crate::config::GenerateConfig;

/// One external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

/// The full invocation plan for one bundle generation run
///
/// The aggregated manifest stream is the kustomize output, optionally
/// prefixed by the release manifest bytes and a document separator. The
/// concatenation is a byte-stream join of YAML documents, not a structural
/// merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPlan {
    /// Kustomize build of the strategy manifests directory
    pub kustomize: ToolCommand,

    /// Release manifest to prepend to the kustomize output, if any
    pub release_manifest: Option<PathBuf>,

    /// operator-sdk invocation consuming the aggregated stream on stdin
    pub operator_sdk: ToolCommand,

    /// Working directory for operator-sdk; the bundle tree lands here
    pub working_dir: PathBuf,
}

/// Separator inserted between the release manifest and the kustomize output
pub const DOCUMENT_SEPARATOR: &[u8] = b"\n---\n";

impl InvocationPlan {
    /// Build the invocation plan from a resolved configuration
    pub fn from_config(config: &GenerateConfig) -> Self {
        let kustomize = ToolCommand::new(
            "kustomize",
            vec![
                "build".to_string(),
                "--load-restrictor".to_string(),
                "LoadRestrictionsNone".to_string(),
                config.strategy_manifests_dir().display().to_string(),
            ],
        );

        let operator_sdk = ToolCommand::new(
            "operator-sdk",
            vec![
                "generate".to_string(),
                "bundle".to_string(),
                "--channels".to_string(),
                config.channels.clone(),
                "--default-channel".to_string(),
                config.default_channel.clone(),
                "--kustomize-dir".to_string(),
                "manifests".to_string(),
                "--overwrite".to_string(),
                "--package".to_string(),
                config.workspace_config.package_name.clone(),
                "--version".to_string(),
                config.release_version.clone(),
            ],
        );

        Self {
            kustomize,
            release_manifest: config.release_manifest.clone(),
            operator_sdk,
            working_dir: config.artifact_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GenerateArgs;
    use clap::Parser;
    use std::path::Path;
    use tempfile::TempDir;

    fn resolved_config(fetch: &str, temp: &TempDir) -> GenerateConfig {
        std::fs::write(
            temp.path().join("config.yaml"),
            "operator-packagename: my-operator\n",
        )
        .unwrap();
        let manifest = temp.path().join("release.yaml");
        std::fs::write(&manifest, "kind: List\n").unwrap();

        let ws = temp.path().display().to_string();
        let manifest_arg = manifest.display().to_string();
        let mut argv = vec![
            "generate",
            "-w",
            ws.as_str(),
            "--fetch-strategy",
            fetch,
            "--upgrade-strategy",
            "semver",
            "--release-version",
            "1.3.0",
            "--channels",
            "stable,preview",
            "--default-channel",
            "stable",
        ];
        if fetch == "release-manifest" {
            argv.extend(["--release-manifest", manifest_arg.as_str()]);
        }
        let args = GenerateArgs::try_parse_from(argv).unwrap();
        GenerateConfig::resolve(args, false).unwrap()
    }

    #[test]
    fn test_kustomize_argv_local() {
        let temp = TempDir::new().unwrap();
        let config = resolved_config("local", &temp);
        let plan = InvocationPlan::from_config(&config);

        assert_eq!(plan.kustomize.program, "kustomize");
        assert_eq!(plan.kustomize.args[0], "build");
        assert_eq!(plan.kustomize.args[1], "--load-restrictor");
        assert_eq!(plan.kustomize.args[2], "LoadRestrictionsNone");
        assert!(
            Path::new(&plan.kustomize.args[3]).ends_with("manifests/local"),
            "kustomize builds the strategy-named subdirectory"
        );
        assert!(plan.release_manifest.is_none());
    }

    #[test]
    fn test_release_manifest_prepended() {
        let temp = TempDir::new().unwrap();
        let config = resolved_config("release-manifest", &temp);
        let plan = InvocationPlan::from_config(&config);

        assert!(
            Path::new(&plan.kustomize.args[3]).ends_with("manifests/release-manifest")
        );
        assert_eq!(plan.release_manifest, config.release_manifest);
    }

    #[test]
    fn test_operator_sdk_argv() {
        let temp = TempDir::new().unwrap();
        let config = resolved_config("local", &temp);
        let plan = InvocationPlan::from_config(&config);

        assert_eq!(plan.operator_sdk.program, "operator-sdk");
        assert_eq!(
            plan.operator_sdk.args,
            vec![
                "generate",
                "bundle",
                "--channels",
                "stable,preview",
                "--default-channel",
                "stable",
                "--kustomize-dir",
                "manifests",
                "--overwrite",
                "--package",
                "my-operator",
                "--version",
                "1.3.0",
            ]
        );
    }

    #[test]
    fn test_working_dir_is_release_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = resolved_config("local", &temp);
        let plan = InvocationPlan::from_config(&config);
        assert_eq!(plan.working_dir, config.workspace.join("release-artifacts"));
    }
}
