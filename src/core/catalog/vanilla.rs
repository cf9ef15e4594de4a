use async_trait::async_trait;
use tracing::{debug, info};

use super::context::CatalogContext;
use super::provider::{ArtifactDescriptor, VersionCatalog, VersionCatalogEntry};
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::flavor::BuildFlavor;
use crate::core::version::{ServerManifest, VersionManifest};

/// Release game versions from the Mojang manifest, newest first.
///
/// Shared by every Java flavor: Forge and Fabric builds exist per game
/// release, so they enumerate the same list.
#[derive(Debug, Clone)]
pub struct ReleaseIndex {
    entries: Vec<VersionCatalogEntry>,
}

impl ReleaseIndex {
    pub async fn load(ctx: &CatalogContext) -> ArtifactResult<Self> {
        let manifest =
            VersionManifest::fetch(ctx.fetcher.as_ref(), &ctx.config.endpoints.mojang_manifest)
                .await?;
        Ok(Self::from_manifest(
            &manifest,
            ctx.config.earliest_supported_version.as_deref(),
        ))
    }

    /// Releases only, cut after `earliest` when the manifest contains it.
    pub fn from_manifest(manifest: &VersionManifest, earliest: Option<&str>) -> Self {
        let mut entries: Vec<VersionCatalogEntry> = manifest
            .releases()
            .into_iter()
            .map(|entry| VersionCatalogEntry {
                id: entry.id.clone(),
                locator: entry.url.clone(),
            })
            .collect();

        if let Some(cutoff) = earliest {
            if let Some(index) = entries.iter().position(|e| e.id == cutoff) {
                entries.truncate(index + 1);
            }
        }

        Self { entries }
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn locator(&self, version: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == version)
            .map(|e| e.locator.as_str())
    }

    pub fn contains(&self, version: &str) -> bool {
        self.locator(version).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Official Mojang server jars, verified by size and SHA-1.
pub struct VanillaCatalog {
    ctx: CatalogContext,
    index: ReleaseIndex,
}

impl VanillaCatalog {
    pub async fn load(ctx: CatalogContext) -> ArtifactResult<Self> {
        let index = ReleaseIndex::load(&ctx).await?;
        info!(releases = index.len(), "Vanilla catalog ready");
        Ok(Self { ctx, index })
    }

    pub fn index(&self) -> &ReleaseIndex {
        &self.index
    }
}

#[async_trait]
impl VersionCatalog for VanillaCatalog {
    fn flavor(&self) -> BuildFlavor {
        BuildFlavor::Vanilla
    }

    async fn list_versions(&self) -> ArtifactResult<Vec<String>> {
        Ok(self.index.ids())
    }

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor> {
        let manifest_url =
            self.index
                .locator(version)
                .ok_or_else(|| ArtifactError::VersionNotFound {
                    flavor: BuildFlavor::Vanilla,
                    version: version.to_string(),
                })?;

        let manifest = ServerManifest::fetch(self.ctx.fetcher.as_ref(), manifest_url).await?;
        debug!(version, "Retrieved server manifest");

        Ok(match manifest.downloads.server {
            Some(server) => ArtifactDescriptor {
                download_url: server.url,
                size_bytes: server.size,
                sha1: server.sha1,
            },
            None => ArtifactDescriptor::url_only(String::new()),
        })
    }
}
