// In-memory upstream used by unit tests; never touches the network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::catalog::CatalogContext;
use crate::core::config::{Endpoints, ResolverConfig};
use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::http::HttpFetch;

pub const MANIFEST_URL: &str = "https://mojang.test/version_manifest.json";
pub const FABRIC_META: &str = "https://fabric.test/v2";

#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
    /// Bodies that are cut off after the stored prefix has been written.
    truncated: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub fn with_truncated(mut self, url: &str, prefix: impl Into<Vec<u8>>) -> Self {
        self.truncated.insert(url.to_string(), prefix.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn respond(&self, url: &str) -> ArtifactResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ArtifactError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[async_trait]
impl HttpFetch for FakeFetcher {
    async fn get_text(&self, url: &str) -> ArtifactResult<String> {
        let body = self.respond(url)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn download_to(&self, url: &str, dest: &Path) -> ArtifactResult<u64> {
        if let Some(prefix) = self.truncated.get(url) {
            self.requests.lock().unwrap().push(url.to_string());
            tokio::fs::write(dest, prefix)
                .await
                .map_err(|e| ArtifactError::io(dest, e))?;
            let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "stream cut off");
            return Err(ArtifactError::io(dest, reset));
        }
        let body = self.respond(url)?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| ArtifactError::io(dest, e))?;
        Ok(body.len() as u64)
    }
}

pub fn test_config() -> ResolverConfig {
    ResolverConfig {
        endpoints: Endpoints {
            mojang_manifest: MANIFEST_URL.to_string(),
            forge_index: "https://forge.test/index_{minecraft}.html".to_string(),
            forge_download:
                "https://maven.test/forge/{minecraft}-{forge}/forge-{minecraft}-{forge}-installer.jar"
                    .to_string(),
            fabric_meta: FABRIC_META.to_string(),
            bedrock_download: "https://bedrock.test/bedrock-server-{version}.zip".to_string(),
        },
        ..ResolverConfig::default()
    }
}

pub fn context(fetcher: Arc<FakeFetcher>) -> CatalogContext {
    context_with(fetcher, test_config())
}

pub fn context_with(fetcher: Arc<FakeFetcher>, config: ResolverConfig) -> CatalogContext {
    CatalogContext::new(fetcher, config)
}

/// Mojang manifest with two releases and one snapshot between them.
pub fn release_manifest() -> String {
    r#"{
        "latest": { "release": "1.19.3", "snapshot": "23w03a" },
        "versions": [
            { "id": "23w03a", "type": "snapshot", "url": "https://mojang.test/23w03a.json" },
            { "id": "1.19.3", "type": "release", "url": "https://mojang.test/1.19.3.json" },
            { "id": "1.19.3-pre1", "type": "old_beta", "url": "https://mojang.test/pre.json" },
            { "id": "1.19.2", "type": "release", "url": "https://mojang.test/1.19.2.json" }
        ]
    }"#
    .to_string()
}
