//! Common test utilities for bundlegen integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A minimal but realistic CSV document, as operator-sdk would emit it
pub const CSV_FIXTURE: &str = r#"
apiVersion: operators.coreos.com/v1alpha1
kind: ClusterServiceVersion
metadata:
  name: my-operator.v1.3.0
  annotations:
    capabilities: Seamless Upgrades
spec:
  displayName: My Operator
  version: 1.3.0
  install:
    strategy: deployment
    spec:
      deployments:
        - name: pipelines-operator
          spec:
            template:
              spec:
                containers:
                  - name: operator
                    image: registry.example.com/operator:main
                    env:
                      - name: IMAGE_PROXY
                        value: registry.example.com/proxy:main
"#;

/// A workspace config with one container target and one env target
pub const CONFIG_FIXTURE: &str = r#"
operator-packagename: my-operator
image-substitutions:
  - image: registry.example.com/operator:1.3.0
    replaceLocations:
      - deploymentName: pipelines-operator
        containerName: operator
  - image: registry.example.com/proxy:1.3.0
    replaceLocations:
      - deploymentName: pipelines-operator
        containerName: operator
        replaceAsEnvVars:
          - IMAGE_PROXY
defaultRelatedImages:
  - name: OPERATOR_BASE
    image: registry.example.com/base:latest
"#;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a workspace with config.yaml and a local manifests directory
    pub fn with_config(config_yaml: &str) -> Self {
        let workspace = Self::new();
        workspace.write_file("config.yaml", config_yaml);
        workspace.write_file(
            "manifests/local/kustomization.yaml",
            "resources:\n  - deployment.yaml\n",
        );
        workspace
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Path to the generated CSV inside release-artifacts
    pub fn csv_path(&self) -> String {
        "release-artifacts/bundle/manifests/my-operator.clusterserviceversion.yaml"
            .to_string()
    }

    /// Parse the generated CSV as untyped YAML for assertions
    pub fn read_csv(&self) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_file(&self.csv_path())).expect("Failed to parse CSV")
    }

    /// Install stub `kustomize` and `operator-sdk` scripts and return a PATH
    /// value with the stub directory prepended
    ///
    /// The kustomize stub emits a fixed resource stream. The operator-sdk
    /// stub records its argv and stdin in the working directory and writes
    /// the CSV fixture into bundle/manifests.
    pub fn install_stub_tools(&self) -> String {
        let bin_dir = self.path.join("stub-bin");
        std::fs::create_dir_all(&bin_dir).expect("Failed to create stub bin dir");

        let csv_fixture = self.path.join("stub-bin/csv-fixture.yaml");
        std::fs::write(&csv_fixture, CSV_FIXTURE).expect("Failed to write CSV fixture");

        write_script(
            &bin_dir.join("kustomize"),
            "#!/bin/sh\nprintf 'kind: Deployment\\nmetadata:\\n  name: from-kustomize\\n'\n",
        );
        write_script(
            &bin_dir.join("operator-sdk"),
            &format!(
                "#!/bin/sh\n\
                 cat > received-stream.yaml\n\
                 printf '%s\\n' \"$@\" > sdk-args.txt\n\
                 mkdir -p bundle/manifests\n\
                 cp {} bundle/manifests/my-operator.clusterserviceversion.yaml\n",
                csv_fixture.display()
            ),
        );

        prepend_path(&bin_dir)
    }

    /// Install a failing operator-sdk stub exiting with the given status
    pub fn install_failing_sdk(&self, status: i32) -> String {
        let bin_dir = self.path.join("stub-bin");
        std::fs::create_dir_all(&bin_dir).expect("Failed to create stub bin dir");

        write_script(
            &bin_dir.join("kustomize"),
            "#!/bin/sh\nprintf 'kind: Deployment\\n'\n",
        );
        write_script(
            &bin_dir.join("operator-sdk"),
            &format!("#!/bin/sh\ncat > /dev/null\nexit {status}\n"),
        );

        prepend_path(&bin_dir)
    }
}

fn write_script(path: &std::path::Path, content: &str) {
    std::fs::write(path, content).expect("Failed to write stub script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark stub script executable");
    }
}

fn prepend_path(bin_dir: &std::path::Path) -> String {
    let current = std::env::var("PATH").unwrap_or_default();
    format!("{}:{}", bin_dir.display(), current)
}
