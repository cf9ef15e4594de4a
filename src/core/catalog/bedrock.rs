use async_trait::async_trait;
use tracing::info;

use super::context::CatalogContext;
use super::provider::{render_template, ArtifactDescriptor, VersionCatalog};
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::flavor::BuildFlavor;

/// Bedrock dedicated server zip. There is no upstream listing, only the
/// configured default version.
pub struct BedrockCatalog {
    ctx: CatalogContext,
}

impl BedrockCatalog {
    pub fn new(ctx: CatalogContext) -> Self {
        info!(version = %ctx.config.bedrock_version, "Bedrock catalog ready");
        Self { ctx }
    }

    fn version(&self) -> &str {
        &self.ctx.config.bedrock_version
    }
}

#[async_trait]
impl VersionCatalog for BedrockCatalog {
    fn flavor(&self) -> BuildFlavor {
        BuildFlavor::Bedrock
    }

    async fn list_versions(&self) -> ArtifactResult<Vec<String>> {
        Ok(vec![self.version().to_string()])
    }

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor> {
        if version != self.version() {
            return Err(ArtifactError::VersionNotFound {
                flavor: BuildFlavor::Bedrock,
                version: version.to_string(),
            });
        }
        Ok(ArtifactDescriptor::url_only(render_template(
            &self.ctx.config.endpoints.bedrock_download,
            &[("version", version)],
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::testing::{self, FakeFetcher};

    #[tokio::test]
    async fn lists_single_default_version_without_network() {
        let fetcher = Arc::new(FakeFetcher::new());
        let catalog = BedrockCatalog::new(testing::context(fetcher.clone()));

        assert_eq!(catalog.list_versions().await.unwrap(), ["1.19.40.02"]);
        let descriptor = catalog.resolve_download_url("1.19.40.02").await.unwrap();
        assert_eq!(
            descriptor.download_url,
            "https://bedrock.test/bedrock-server-1.19.40.02.zip"
        );
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn other_versions_are_not_found() {
        let catalog = BedrockCatalog::new(testing::context(Arc::new(FakeFetcher::new())));
        let err = catalog.resolve_download_url("1.20.0.01").await.unwrap_err();
        assert!(matches!(err, ArtifactError::VersionNotFound { .. }));
    }
}
