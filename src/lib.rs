pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::catalog::{
    ArtifactDescriptor, Catalog, CatalogContext, VersionCatalog, VersionCatalogEntry,
};
pub use crate::core::config::{Endpoints, LoggingConfig, ResolverConfig};
pub use crate::core::error::{ArtifactError, ArtifactResult};
pub use crate::core::fetcher::{write_version_file, ArtifactFetcher, FetchResult};
pub use crate::core::flavor::BuildFlavor;
pub use crate::core::selector::{process_sequentially, BulkReport, VersionSelector};

/// Install the structured logging subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this
/// more than once is harmless.
pub fn init_tracing(logging: &LoggingConfig) {
    let fallback = format!("{level},artifact_resolver={level}", level = logging.level);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init();

    tracing::debug!(level = %logging.level, "Artifact resolver logging initialised");
}
