use std::sync::Arc;

use crate::core::config::ResolverConfig;
use crate::core::error::ArtifactResult;
use crate::core::http::{HttpFetch, ReqwestFetcher};

/// Everything a catalog or fetcher needs from its invocation.
/// Cheap to clone; nothing in it is mutated after construction.
#[derive(Clone)]
pub struct CatalogContext {
    pub fetcher: Arc<dyn HttpFetch>,
    pub config: Arc<ResolverConfig>,
}

impl CatalogContext {
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: ResolverConfig) -> Self {
        Self {
            fetcher,
            config: Arc::new(config),
        }
    }

    /// Context backed by a real reqwest client honoring the configured timeout.
    pub fn from_config(config: ResolverConfig) -> ArtifactResult<Self> {
        let fetcher = ReqwestFetcher::from_config(&config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }
}
