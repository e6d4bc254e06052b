/// Applying manifests to a cluster
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::utils::command::{CommandBuilder, CommandOutput};

/// Something that can apply a manifest file to a cluster
pub trait ClusterApplier {
    fn apply(
        &self,
        manifest_path: &Path,
        kubeconfig_path: &Path,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Applies manifests by shelling out to `kubectl apply -f`
#[derive(Debug, Clone)]
pub struct KubectlApplier {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl KubectlApplier {
    /// Create an applier that runs `kubectl` from PATH
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("kubectl"),
            timeout: None,
        }
    }

    /// Use a different kubectl binary
    #[allow(dead_code)]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill kubectl if it has not exited after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for KubectlApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterApplier for KubectlApplier {
    async fn apply(&self, manifest_path: &Path, kubeconfig_path: &Path) -> Result<CommandOutput> {
        info!("Applying Kubernetes manifest: {}", manifest_path.display());

        let output = CommandBuilder::new(&self.program)
            .args(["apply", "-f"])
            .arg(manifest_path)
            .kubeconfig(kubeconfig_path)
            .timeout(self.timeout)
            .output()
            .await?;

        debug!("kubectl stdout: {}", output.stdout.trim());
        Ok(output)
    }
}

/// Classify an apply result
///
/// Any output on stderr counts as a failure, even with a zero exit status.
pub fn check_apply(output: CommandOutput) -> Result<String> {
    if output.success && output.stderr.is_empty() {
        return Ok(output.stdout);
    }

    let stderr = if output.stderr.trim().is_empty() {
        "kubectl exited with a non-zero status".to_string()
    } else {
        output.stderr.trim().to_string()
    };
    Err(InstallError::Apply { stderr })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn output(success: bool, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: "clusterissuer.cert-manager.io/letsencrypt-prod created".to_string(),
            stderr: stderr.to_string(),
            success,
        }
    }

    #[test]
    fn test_check_apply_success() {
        let stdout = check_apply(output(true, "")).unwrap();
        assert!(stdout.contains("letsencrypt-prod"));
    }

    #[test]
    fn test_check_apply_stderr_is_failure() {
        let err = check_apply(output(true, "Warning: deprecated API")).unwrap_err();
        match err {
            InstallError::Apply { stderr } => assert_eq!(stderr, "Warning: deprecated API"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_apply_non_zero_exit() {
        let err = check_apply(output(false, "")).unwrap_err();
        assert!(matches!(err, InstallError::Apply { .. }));
    }

    #[tokio::test]
    async fn test_kubectl_applier_invocation() {
        let applier = KubectlApplier::new().with_program("echo");
        let output = applier
            .apply(Path::new("/tmp/manifest.yaml"), Path::new("/tmp/kubeconfig"))
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout.trim(), "apply -f /tmp/manifest.yaml");
    }

    #[tokio::test]
    async fn test_kubectl_applier_missing_binary() {
        let applier = KubectlApplier::new().with_program("/nonexistent/kubectl");
        let err = applier
            .apply(Path::new("m.yaml"), Path::new("kc"))
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::SubprocessLaunch { .. }));
    }
}
