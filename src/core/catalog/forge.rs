use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use super::context::CatalogContext;
use super::provider::{render_template, ArtifactDescriptor, VersionCatalog};
use super::vanilla::ReleaseIndex;
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::flavor::BuildFlavor;

// Forge has no version API; builds are scraped from the per-release
// download page.
fn download_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"https://maven\.minecraftforge\.net/net/minecraftforge/forge/([^/\s"']+)/[^/\s"']*\.jar"#,
        )
        .expect("valid Forge download link pattern")
    })
}

fn recommended_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"<td\s*class="download-version">\s*(\S+)\s*<i\s*class="promo-recommended[^"]*"\s*>\s*</i>\s*</td>"#,
        )
        .expect("valid Forge recommended marker pattern")
    })
}

/// Forge builds found on one release page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeBuilds {
    /// Deduplicated, sorted ascending; the last entry is the newest.
    pub builds: Vec<String>,
    pub recommended: Option<String>,
}

impl ForgeBuilds {
    pub fn parse(minecraft_version: &str, html: &str) -> Self {
        let prefix = format!("{}-", minecraft_version);

        let mut builds: Vec<String> = download_link_pattern()
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().strip_prefix(&prefix))
            .filter(|build| !build.is_empty())
            .map(str::to_owned)
            .collect();
        // Lexicographic, so "9" sorts after "10"
        builds.sort();
        builds.dedup();

        let recommended = recommended_pattern()
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        Self {
            builds,
            recommended,
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.builds.last().map(String::as_str)
    }

    /// Recommended build when the page marks one, otherwise the newest.
    pub fn preferred(&self) -> Option<&str> {
        self.recommended.as_deref().or_else(|| self.latest())
    }

    pub fn newest_first(&self) -> Vec<String> {
        self.builds.iter().rev().cloned().collect()
    }
}

/// Forge installer jars, one per game release.
pub struct ForgeCatalog {
    ctx: CatalogContext,
    index: ReleaseIndex,
}

impl ForgeCatalog {
    pub async fn load(ctx: CatalogContext) -> ArtifactResult<Self> {
        let index = ReleaseIndex::load(&ctx).await?;
        info!(releases = index.len(), "Forge catalog ready");
        Ok(Self { ctx, index })
    }

    pub async fn forge_builds(&self, minecraft_version: &str) -> ArtifactResult<ForgeBuilds> {
        let url = render_template(
            &self.ctx.config.endpoints.forge_index,
            &[("minecraft", minecraft_version)],
        );
        let html = self
            .ctx
            .fetcher
            .get_text(&url)
            .await
            .map_err(|e| ArtifactError::upstream(&url, e))?;
        if html.trim().is_empty() {
            warn!(url, "Forge page is empty");
        }

        let builds = ForgeBuilds::parse(minecraft_version, &html);
        debug!(
            minecraft_version,
            builds = builds.builds.len(),
            recommended = ?builds.recommended,
            "Scraped Forge builds"
        );
        Ok(builds)
    }

    pub fn download_url(&self, minecraft_version: &str, forge_version: &str) -> String {
        render_template(
            &self.ctx.config.endpoints.forge_download,
            &[("minecraft", minecraft_version), ("forge", forge_version)],
        )
    }
}

#[async_trait]
impl VersionCatalog for ForgeCatalog {
    fn flavor(&self) -> BuildFlavor {
        BuildFlavor::Forge
    }

    async fn list_versions(&self) -> ArtifactResult<Vec<String>> {
        Ok(self.index.ids())
    }

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor> {
        if !self.index.contains(version) {
            return Err(ArtifactError::VersionNotFound {
                flavor: BuildFlavor::Forge,
                version: version.to_string(),
            });
        }

        let builds = self.forge_builds(version).await?;
        let forge_version = builds
            .preferred()
            .ok_or_else(|| ArtifactError::NoDownloadUrl {
                flavor: BuildFlavor::Forge,
                version: version.to_string(),
            })?;
        info!(minecraft_version = version, forge_version, "Selected Forge build");

        Ok(ArtifactDescriptor::url_only(
            self.download_url(version, forge_version),
        ))
    }
}
