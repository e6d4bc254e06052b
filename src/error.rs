/// Error taxonomy for app installation
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while installing an app into the cluster
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not build the templated yaml file for the resources: {0}")]
    Template(String),

    #[error("Failed to create directory {}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute {program}")]
    SubprocessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("kubectl apply failed: {stderr}")]
    Apply { stderr: String },

    #[error("{program} did not finish within {timeout:?}")]
    CommandTimeout { program: String, timeout: Duration },
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;

impl From<handlebars::TemplateError> for InstallError {
    fn from(err: handlebars::TemplateError) -> Self {
        InstallError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for InstallError {
    fn from(err: handlebars::RenderError) -> Self {
        InstallError::Template(err.to_string())
    }
}
