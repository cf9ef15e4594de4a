// ─── Artifact Fetcher ───
// resolve → download into scratch → verify → publish at the destination.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::core::catalog::{CatalogContext, VersionCatalog};
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::http::HttpFetch;
use crate::core::integrity;
use crate::core::selector::{process_sequentially, BulkReport, VersionSelector};

/// A verified artifact on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    pub path: PathBuf,
    /// True when the destination already existed and nothing was downloaded.
    pub cached: bool,
}

pub struct ArtifactFetcher {
    fetcher: Arc<dyn HttpFetch>,
    scratch_root: Option<PathBuf>,
}

impl ArtifactFetcher {
    pub fn new(ctx: &CatalogContext) -> Self {
        Self {
            fetcher: Arc::clone(&ctx.fetcher),
            scratch_root: ctx.config.scratch_dir.clone(),
        }
    }

    /// Fetch `version` of the catalog's flavor into `destination_dir`.
    ///
    /// An existing destination file is returned as-is without
    /// re-verification.
    pub async fn fetch(
        &self,
        catalog: &dyn VersionCatalog,
        version: &str,
        destination_dir: &Path,
    ) -> ArtifactResult<FetchResult> {
        let flavor = catalog.flavor();
        // A version names a file inside destination_dir, never a path
        if version.is_empty() || version.contains(['/', '\\']) {
            return Err(ArtifactError::VersionNotFound {
                flavor,
                version: version.to_string(),
            });
        }
        let destination = destination_dir.join(flavor.file_name(version));

        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            info!(
                %flavor, version, path = %destination.display(),
                "Artifact already exists"
            );
            return Ok(FetchResult {
                path: destination,
                cached: true,
            });
        }
        info!(%flavor, version, path = %destination.display(), "Downloading artifact");

        if !catalog.list_versions().await?.iter().any(|v| v == version) {
            return Err(ArtifactError::VersionNotFound {
                flavor,
                version: version.to_string(),
            });
        }

        let descriptor = catalog.resolve_download_url(version).await?;
        if !descriptor.has_url() {
            return Err(ArtifactError::NoDownloadUrl {
                flavor,
                version: version.to_string(),
            });
        }

        // Dropping the TempDir removes it on every return path below
        let scratch = self.scratch_dir(&flavor.to_string())?;
        let download_path = scratch.path().join(flavor.scratch_file_name());

        let written = self
            .fetcher
            .download_to(&descriptor.download_url, &download_path)
            .await?;
        debug!(bytes = written, path = %download_path.display(), "Scratch download complete");

        if let Err(e) = integrity::verify_file(
            &download_path,
            descriptor.size_bytes,
            descriptor.sha1.as_deref(),
        )
        .await
        {
            warn!(%flavor, version, error = %e, "Discarding unverified download");
            return Err(e);
        }

        publish(&download_path, &destination).await?;
        drop(scratch);

        info!(%flavor, version, "Successfully downloaded artifact");
        Ok(FetchResult {
            path: destination,
            cached: false,
        })
    }

    /// Apply `selector` to the catalog listing and fetch each chosen
    /// version in order. Failures are collected, never propagated.
    pub async fn fetch_selection(
        &self,
        catalog: &dyn VersionCatalog,
        selector: &VersionSelector,
        destination_dir: &Path,
    ) -> ArtifactResult<BulkReport<FetchResult>> {
        let available = catalog.list_versions().await?;
        let chosen = selector.select(catalog.flavor(), &available)?;

        let report = process_sequentially(chosen, |version| async move {
            self.fetch(catalog, &version, destination_dir).await
        })
        .await;
        Ok(report)
    }

    fn scratch_dir(&self, prefix: &str) -> ArtifactResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        match &self.scratch_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| ArtifactError::io(root, e))?;
                builder.tempdir_in(root).map_err(|e| ArtifactError::io(root, e))
            }
            None => builder
                .tempdir()
                .map_err(|e| ArtifactError::io(std::env::temp_dir(), e)),
        }
    }
}

/// Copy `source` next to `destination` under a hidden name, then rename it
/// into place so a partial file is never visible at `destination`.
async fn publish(source: &Path, destination: &Path) -> ArtifactResult<()> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| ArtifactError::io(parent, e))?;

    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = parent.join(format!(".{}.partial", file_name));

    // fs::copy carries the permission bits over
    if let Err(e) = tokio::fs::copy(source, &staging).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(ArtifactError::io(&staging, e));
    }
    if let Err(e) = tokio::fs::rename(&staging, destination).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(ArtifactError::io(destination, e));
    }
    Ok(())
}

/// Record a resolved version as a single line, e.g. `latest.txt`.
pub async fn write_version_file(path: &Path, version: &str) -> ArtifactResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ArtifactError::io(parent, e))?;
    }
    tokio::fs::write(path, version.trim())
        .await
        .map_err(|e| ArtifactError::io(path, e))
}
