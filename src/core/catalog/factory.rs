use async_trait::async_trait;

use super::{
    bedrock::BedrockCatalog, context::CatalogContext, fabric::FabricCatalog,
    forge::ForgeCatalog, provider::ArtifactDescriptor, provider::VersionCatalog,
    vanilla::VanillaCatalog,
};
use crate::core::error::ArtifactResult;
use crate::core::flavor::BuildFlavor;

/// Closed flavor → catalog registry; dispatcher without Box<dyn>.
pub enum Catalog {
    Vanilla(VanillaCatalog),
    Forge(ForgeCatalog),
    Fabric(FabricCatalog),
    Bedrock(BedrockCatalog),
}

impl Catalog {
    /// Build and load the catalog for `flavor`.
    pub async fn create(flavor: BuildFlavor, ctx: CatalogContext) -> ArtifactResult<Self> {
        Ok(match flavor {
            BuildFlavor::Vanilla => Self::Vanilla(VanillaCatalog::load(ctx).await?),
            BuildFlavor::Forge => Self::Forge(ForgeCatalog::load(ctx).await?),
            BuildFlavor::Fabric => Self::Fabric(FabricCatalog::load(ctx).await?),
            BuildFlavor::Bedrock => Self::Bedrock(BedrockCatalog::new(ctx)),
        })
    }

    /// Like [`Catalog::create`] for a textual tag; unregistered tags fail
    /// with `UnknownFlavor`.
    pub async fn from_tag(tag: &str, ctx: CatalogContext) -> ArtifactResult<Self> {
        let flavor: BuildFlavor = tag.parse()?;
        Self::create(flavor, ctx).await
    }

    fn inner(&self) -> &dyn VersionCatalog {
        match self {
            Catalog::Vanilla(c) => c,
            Catalog::Forge(c) => c,
            Catalog::Fabric(c) => c,
            Catalog::Bedrock(c) => c,
        }
    }
}

#[async_trait]
impl VersionCatalog for Catalog {
    fn flavor(&self) -> BuildFlavor {
        self.inner().flavor()
    }

    async fn list_versions(&self) -> ArtifactResult<Vec<String>> {
        self.inner().list_versions().await
    }

    async fn resolve_download_url(&self, version: &str) -> ArtifactResult<ArtifactDescriptor> {
        self.inner().resolve_download_url(version).await
    }
}
