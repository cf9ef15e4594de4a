use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::context::CatalogContext;
use super::provider::{ArtifactDescriptor, VersionCatalog};
use super::vanilla::ReleaseIndex;
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::flavor::BuildFlavor;
use crate::core::version::manifest::fetch_json;

/// Revision assigned to loader builds with a missing or unparseable `build`.
const UNKNOWN_REVISION: i64 = -1;

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// GET /v2/versions/loader/{minecraft}
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderEntry {
    pub loader: Option<LoaderInfo>,
    pub intermediary: Option<IntermediaryInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderInfo {
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub build: Value,
    #[serde(default, deserialize_with = "null_as_false")]
    pub stable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntermediaryInfo {
    #[serde(default, deserialize_with = "null_as_false")]
    pub stable: bool,
}

// GET /v2/versions/installer
#[derive(Debug, Clone, Deserialize)]
pub struct InstallerEntry {
    #[serde(default)]
    pub version: Value,
    #[serde(default, deserialize_with = "null_as_false")]
    pub stable: bool,
}

/// An eligible loader build paired with the chosen installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabricLoaderBuild {
    pub revision: i64,
    pub stable: bool,
    /// Composite `loaderVersion/installerVersion`.
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FabricLoaders {
    pub builds: Vec<FabricLoaderBuild>,
    pub latest: Option<String>,
}

fn parse_revision(build: &Value) -> i64 {
    match build {
        Value::Number(n) => n.as_i64().unwrap_or(UNKNOWN_REVISION),
        Value::String(s) => s.trim().parse().unwrap_or(UNKNOWN_REVISION),
        _ => UNKNOWN_REVISION,
    }
}

impl FabricLoaders {
    /// Combine the loader and installer listings.
    ///
    /// Without `allow_unstable` a loader is eligible only when both it and
    /// its intermediary are stable, and only stable installers count. The
    /// highest revision wins; ties keep the first seen and unknown
    /// revisions never win.
    pub fn select(
        loaders: &[LoaderEntry],
        installers: &[InstallerEntry],
        allow_unstable: bool,
    ) -> Self {
        let installer_version = installers
            .iter()
            .filter(|i| allow_unstable || i.stable)
            .find_map(|i| i.version.as_str());
        let Some(installer_version) = installer_version else {
            warn!("No eligible Fabric installer found");
            return Self::default();
        };

        let mut builds = Vec::new();
        let mut latest: Option<(i64, String)> = None;
        for entry in loaders {
            let (Some(loader), Some(intermediary)) = (&entry.loader, &entry.intermediary) else {
                continue;
            };
            let stable = loader.stable && intermediary.stable;
            if !allow_unstable && !stable {
                continue;
            }
            let Some(loader_version) = loader.version.as_str() else {
                continue;
            };

            let revision = parse_revision(&loader.build);
            let build = FabricLoaderBuild {
                revision,
                stable,
                version: format!("{}/{}", loader_version, installer_version),
            };
            let best = latest.as_ref().map_or(UNKNOWN_REVISION, |(rev, _)| *rev);
            if revision > best {
                latest = Some((revision, build.version.clone()));
            }
            builds.push(build);
        }

        Self {
            builds,
            latest: latest.map(|(_, version)| version),
        }
    }
}

/// Fabric server launcher jars served by the Fabric meta API.
pub struct FabricCatalog {
    ctx: CatalogContext,
    index: ReleaseIndex,
}

impl FabricCatalog {
    pub async fn load(ctx: CatalogContext) -> ArtifactResult<Self> {
        let index = ReleaseIndex::load(&ctx).await?;
        info!(releases = index.len(), "Fabric catalog ready");
        Ok(Self { ctx, index })
    }

    pub async fn fabric_loaders(&self, minecraft_version: &str) -> ArtifactResult<FabricLoaders> {
        let meta = self.ctx.config.endpoints.fabric_meta.trim_end_matches('/');
        let fetcher = self.ctx.fetcher.as_ref();

        let loaders: Vec<LoaderEntry> = fetch_json(
            fetcher,
            &format!("{}/versions/loader/{}", meta, minecraft_version),
        )
        .await?;
        let installers: Vec<InstallerEntry> =
            fetch_json(fetcher, &format!("{}/versions/installer", meta)).await?;

        let selected =
            FabricLoaders::select(&loaders, &installers, self.ctx.config.allow_unstable);
        debug!(
            minecraft_version,
            candidates = loaders.len(),
            eligible = selected.builds.len(),
            latest = ?selected.latest,
            "Resolved Fabric loaders"
        );
        Ok(selected)
    }

    pub fn download_url(&self, minecraft_version: &str, fabric_version: &str) -> String {
        format!(
            "{}/versions/loader/{}/{}/server/jar",
            self.ctx.config.endpoints.fabric_meta.trim_end_matches('/'),
            minecraft_version,
            fabric_version
        )
    }
}

#[async_trait]
impl VersionCatalog for FabricCatalog {
    fn flavor(&self) -> BuildFlavor {
        BuildFlavor::Fabric
    }

    async fn list_versions(&self) -> ArtifactResult<Vec<String>> {
        Ok(self.index.ids())
    }

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor> {
        if !self.index.contains(version) {
            return Err(ArtifactError::VersionNotFound {
                flavor: BuildFlavor::Fabric,
                version: version.to_string(),
            });
        }

        let loaders = self.fabric_loaders(version).await?;
        let Some(fabric_version) = loaders.latest else {
            warn!(version, "No Fabric loader found, does it exist?");
            return Err(ArtifactError::NoDownloadUrl {
                flavor: BuildFlavor::Fabric,
                version: version.to_string(),
            });
        };

        Ok(ArtifactDescriptor::url_only(
            self.download_url(version, &fabric_version),
        ))
    }
}
