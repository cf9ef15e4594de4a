pub mod bedrock;
pub mod context;
pub mod fabric;
pub mod factory;
pub mod forge;
pub mod provider;
pub mod vanilla;

pub use context::CatalogContext;
pub use factory::Catalog;
pub use provider::{ArtifactDescriptor, VersionCatalog, VersionCatalogEntry};
