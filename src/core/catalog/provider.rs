use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::ArtifactResult;
use crate::core::flavor::BuildFlavor;

/// Where and how to verify one concrete artifact.
///
/// Forge, Fabric and Bedrock publish no size or hash; those stay `None`
/// and the matching verification step is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub download_url: String,
    pub size_bytes: Option<u64>,
    pub sha1: Option<String>,
}

impl ArtifactDescriptor {
    pub fn url_only(download_url: impl Into<String>) -> Self {
        Self {
            download_url: download_url.into(),
            size_bytes: None,
            sha1: None,
        }
    }

    pub fn has_url(&self) -> bool {
        !self.download_url.trim().is_empty()
    }
}

/// A game version and the upstream locator it resolves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalogEntry {
    pub id: String,
    pub locator: String,
}

/// Version discovery for one build flavor.
///
/// Implementations load their upstream index when constructed and are
/// read-only afterward.
#[async_trait]
pub trait VersionCatalog: Send + Sync {
    fn flavor(&self) -> BuildFlavor;

    /// Available versions, newest first, without duplicates.
    async fn list_versions(&self) -> ArtifactResult<Vec<String>>;

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor>;
}

/// Substitute `{key}` placeholders in an endpoint template.
pub(crate) fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{}}}", key), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_template_replaces_every_occurrence() {
        let url = render_template(
            "https://host/{minecraft}-{forge}/forge-{minecraft}-{forge}.jar",
            &[("minecraft", "1.19.3"), ("forge", "44.1.0")],
        );
        assert_eq!(url, "https://host/1.19.3-44.1.0/forge-1.19.3-44.1.0.jar");
    }

    #[test]
    fn blank_url_is_not_usable() {
        assert!(!ArtifactDescriptor::url_only("  ").has_url());
        assert!(ArtifactDescriptor::url_only("https://x/y.jar").has_url());
    }
}
