/// Persist rendered manifests to the local cache directory
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::RenderedManifest;
use crate::error::{InstallError, Result};

const CACHE_DIR_NAME: &str = ".k3sup";
const MANIFEST_STEM: &str = "temp_openfaas_ingress";

/// How manifest files are named inside the cache directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileNaming {
    /// Same file on every run, overwritten each time
    #[default]
    Fixed,
    /// Random suffix per invocation so concurrent runs do not clobber each other
    Unique,
}

/// Writes manifests into a cache directory
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    dir: PathBuf,
    naming: FileNaming,
}

impl ManifestWriter {
    /// Create a writer for the given directory
    pub fn new(dir: impl Into<PathBuf>, naming: FileNaming) -> Self {
        Self {
            dir: dir.into(),
            naming,
        }
    }

    /// Default cache directory under the system temp directory
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join(CACHE_DIR_NAME)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the manifest, creating the cache directory if needed
    pub async fn write(&self, manifest: &RenderedManifest) -> Result<PathBuf> {
        self.ensure_dir().await?;

        let path = self.dir.join(self.file_name());
        debug!("Writing manifest to {}", path.display());

        tokio::fs::write(&path, manifest.as_bytes())
            .await
            .map_err(|source| InstallError::FileWrite {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    async fn ensure_dir(&self) -> Result<()> {
        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);

        builder
            .create(&self.dir)
            .await
            .map_err(|source| InstallError::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })
    }

    fn file_name(&self) -> String {
        match self.naming {
            FileNaming::Fixed => format!("{}.yaml", MANIFEST_STEM),
            FileNaming::Unique => {
                let suffix: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(8)
                    .map(char::from)
                    .collect();
                format!("{}-{}.yaml", MANIFEST_STEM, suffix.to_ascii_lowercase())
            }
        }
    }
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new(Self::default_dir(), FileNaming::Fixed)
    }
}
