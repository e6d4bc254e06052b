/// Install request configuration and kubeconfig resolution
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{InstallError, Result};

/// Parameters for installing the OpenFaaS ingress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    domain: String,
    email: String,
    kubeconfig_path: PathBuf,
}

impl InstallRequest {
    /// Build a request, rejecting an empty domain or email
    pub fn new(
        domain: impl Into<String>,
        email: impl Into<String>,
        kubeconfig_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let domain = domain.into();
        let email = email.into();

        if domain.is_empty() || email.is_empty() {
            return Err(InstallError::Validation(
                "both --email and --domain flags should be set and not empty, please set these values"
                    .to_string(),
            ));
        }

        // Loose policy: odd-looking values are rendered as given
        if !looks_like_hostname(&domain) {
            warn!("Domain {:?} does not look like a DNS hostname", domain);
        }
        if !email.contains('@') {
            warn!("Email {:?} does not look like an email address", email);
        }

        Ok(Self {
            domain,
            email,
            kubeconfig_path: kubeconfig_path.into(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig_path
    }
}

fn looks_like_hostname(domain: &str) -> bool {
    domain.len() <= 253
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Resolve the kubeconfig to use: explicit flag, then KUBECONFIG, then ~/.kube/config
pub fn resolve_kubeconfig(explicit: Option<PathBuf>) -> PathBuf {
    resolve_kubeconfig_from(explicit, std::env::var_os("KUBECONFIG"), dirs::home_dir())
}

fn resolve_kubeconfig_from(
    explicit: Option<PathBuf>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => home.unwrap_or_default().join(".kube").join("config"),
    }
}
