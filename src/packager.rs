//! Packaging of a finished file mapping.
//!
//! The handle's URL is where the project would be served; nothing is
//! uploaded anywhere.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use autocoder_common::FileMapping;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::config::DeployProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentHandle {
    pub name: String,
    pub url: String,
    /// Directory the files were written to, when written locally
    pub location: Option<PathBuf>,
    /// Hex SHA-256 over the sorted `(path, content)` pairs
    pub digest: String,
    pub file_count: usize,
}

#[async_trait]
pub trait ProjectPackager: Send + Sync {
    async fn package(&self, files: &FileMapping) -> Result<DeploymentHandle>;
}

/// `autocoder-project-<unix millis>`
pub fn project_name(unix_millis: i64) -> String {
    format!("autocoder-project-{}", unix_millis)
}

pub fn digest(files: &FileMapping) -> String {
    let mut hasher = Sha256::new();
    for (path, content) in files.iter() {
        hasher.update(path.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// The URL a provider would serve `name` at.
pub fn hosted_url(provider: DeployProvider, name: &str, location: &Path) -> String {
    match provider {
        DeployProvider::CloudflarePages => format!("https://{}.pages.dev", name),
        DeployProvider::CloudflareWorkers => format!("https://{}.workers.dev", name),
        DeployProvider::Static => format!("file://{}", location.display()),
    }
}

/// Turn a virtual path into a relative filesystem path, rejecting anything
/// that could escape the output directory.
pub fn safe_relative_path(path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if path.is_empty() {
        bail!("Refusing to write file with empty path");
    }
    let mut relative = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => bail!("Refusing to write '{}': path contains '..'", path),
            Component::RootDir | Component::Prefix(_) => {
                bail!("Refusing to write '{}': path is absolute", path)
            }
        }
    }
    if relative.as_os_str().is_empty() {
        bail!("Refusing to write '{}': path has no file name", path);
    }
    Ok(relative)
}

/// Writes every file below `<output_root>/<project name>/`.
pub struct DirectoryPackager {
    output_root: PathBuf,
    provider: DeployProvider,
}

impl DirectoryPackager {
    pub fn new(output_root: impl Into<PathBuf>, provider: DeployProvider) -> Self {
        Self {
            output_root: output_root.into(),
            provider,
        }
    }
}

#[async_trait]
impl ProjectPackager for DirectoryPackager {
    async fn package(&self, files: &FileMapping) -> Result<DeploymentHandle> {
        let entries = files
            .iter()
            .map(|(path, content)| Ok((safe_relative_path(path)?, content)))
            .collect::<Result<Vec<_>>>()?;

        let name = project_name(Utc::now().timestamp_millis());
        let target = self.output_root.join(&name);
        tokio::fs::create_dir_all(&target)
            .await
            .with_context(|| format!("Failed to create output directory: {}", target.display()))?;

        for (relative, content) in entries {
            let dest = target.join(relative);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            tokio::fs::write(&dest, content)
                .await
                .with_context(|| format!("Failed to write file: {}", dest.display()))?;
        }

        let location = tokio::fs::canonicalize(&target).await.unwrap_or(target);
        let handle = DeploymentHandle {
            url: hosted_url(self.provider, &name, &location),
            name,
            location: Some(location),
            digest: digest(files),
            file_count: files.len(),
        };
        info!(
            name = %handle.name,
            url = %handle.url,
            files = handle.file_count,
            "Project packaged"
        );
        Ok(handle)
    }
}
