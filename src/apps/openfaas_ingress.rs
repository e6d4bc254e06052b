/// OpenFaaS ingress with TLS via cert-manager
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::InstallRequest;
use crate::error::Result;
use crate::k8s::{check_apply, ClusterApplier};
use crate::manifest::{render, ManifestWriter};

const POST_INSTALL_NOTES: &str = r#"=======================================================================
= OpenFaaS Ingress and cert-manager ClusterIssuer have been installed  =
=======================================================================

# You will need to ensure that your domain points to your cluster and is
# accessible through ports 80 and 443.
#
# This is used to validate your ownership of this domain by LetsEncrypt
# and then you can use https with your installation.

# Ingress to your domain has been installed for OpenFaaS
# to see the ingress record run
kubectl get -n openfaas ingress openfaas-gateway

# Check the cert-manager logs with:
kubectl logs -n cert-manager deploy/cert-manager

# A cert-manager ClusterIssuer has been installed into the default
# namespace - to see the resource run
kubectl describe ClusterIssuer letsencrypt-prod

# To check the status of your certificate you can run
kubectl describe -n openfaas Certificate openfaas-gateway

# It may take a while to be issued by LetsEncrypt, in the meantime a
# self-signed cert will be installed

Thank you for using k3sup!"#;

/// Installs the OpenFaaS gateway Ingress and a Let's Encrypt ClusterIssuer
pub struct OpenFaasIngressInstaller<A> {
    applier: A,
    writer: ManifestWriter,
}

impl<A: ClusterApplier> OpenFaasIngressInstaller<A> {
    /// Create a new installer
    pub fn new(applier: A, writer: ManifestWriter) -> Self {
        Self { applier, writer }
    }

    /// Render, write and apply the manifest, returning the manifest path
    pub async fn install(&self, request: &InstallRequest) -> Result<PathBuf> {
        info!("Using kubeconfig: {}", request.kubeconfig_path().display());

        let manifest = render(request.domain(), request.email())?;
        let manifest_path = self.writer.write(&manifest).await?;

        let output = self
            .applier
            .apply(&manifest_path, request.kubeconfig_path())
            .await?;

        let stdout = check_apply(output).map_err(|err| {
            warn!(
                "Unable to install this application. Have you got OpenFaaS running in the openfaas \
                 namespace and cert-manager 0.11.0 or higher installed in cert-manager namespace?"
            );
            err
        })?;

        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            info!("{}", line);
        }

        Ok(manifest_path)
    }
}

/// Print follow-up instructions after a successful install
pub fn print_post_install_notes() {
    println!("{}", POST_INSTALL_NOTES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use crate::k8s::applier::fake::RecordingApplier;
    use crate::manifest::FileNaming;

    fn installer(
        dir: &std::path::Path,
        applier: RecordingApplier,
    ) -> OpenFaasIngressInstaller<RecordingApplier> {
        OpenFaasIngressInstaller::new(applier, ManifestWriter::new(dir, FileNaming::Fixed))
    }

    #[tokio::test]
    async fn test_install_success() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path().join(".k3sup");
        let installer = installer(&dir, RecordingApplier::new(true, ""));
        let request =
            InstallRequest::new("openfaas.example.com", "ops@example.com", "/tmp/kubeconfig")
                .unwrap();

        let path = installer.install(&request).await.unwrap();

        assert_eq!(path, dir.join("temp_openfaas_ingress.yaml"));
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert_eq!(yaml.matches("host: openfaas.example.com").count(), 1);
        assert_eq!(yaml.matches("openfaas.example.com").count(), 2);
        assert_eq!(yaml.matches("email: ops@example.com").count(), 1);

        let calls = installer.applier.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, path);
        assert_eq!(calls[0].1, PathBuf::from("/tmp/kubeconfig"));
    }

    #[tokio::test]
    async fn test_install_fails_on_stderr() {
        let scratch = tempfile::tempdir().unwrap();
        let installer = installer(
            scratch.path(),
            RecordingApplier::new(true, "Warning: extensions/v1beta1 Ingress is deprecated"),
        );
        let request = InstallRequest::new("openfaas.example.com", "ops@example.com", "kc").unwrap();

        let err = installer.install(&request).await.unwrap_err();

        match err {
            InstallError::Apply { stderr } => assert!(stderr.contains("deprecated")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_fails_on_exit_status() {
        let scratch = tempfile::tempdir().unwrap();
        let installer = installer(scratch.path(), RecordingApplier::new(false, ""));
        let request = InstallRequest::new("openfaas.example.com", "ops@example.com", "kc").unwrap();

        let err = installer.install(&request).await.unwrap_err();

        assert!(matches!(err, InstallError::Apply { .. }));
        assert_eq!(installer.applier.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_skips_apply() {
        let scratch = tempfile::tempdir().unwrap();
        let blocker = scratch.path().join("blocked");
        std::fs::write(&blocker, b"file").unwrap();
        let installer = installer(&blocker, RecordingApplier::new(true, ""));
        let request = InstallRequest::new("openfaas.example.com", "ops@example.com", "kc").unwrap();

        let err = installer.install(&request).await.unwrap_err();

        assert!(matches!(err, InstallError::DirectoryCreate { .. }));
        assert!(installer.applier.calls().is_empty());
    }

    #[test]
    fn test_post_install_notes_mention_resources() {
        assert!(POST_INSTALL_NOTES.contains("kubectl get -n openfaas ingress openfaas-gateway"));
        assert!(POST_INSTALL_NOTES.contains("kubectl describe ClusterIssuer letsencrypt-prod"));
    }
}
