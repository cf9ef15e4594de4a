// ─── Version Manifest ───
// Mojang's game version index and the per-version manifest it points to.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::http::HttpFetch;

const RELEASE_TYPE: &str = "release";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
}

impl VersionManifest {
    /// Fetch the version manifest from `url`.
    pub async fn fetch(fetcher: &dyn HttpFetch, url: &str) -> ArtifactResult<Self> {
        info!("Fetching Minecraft version manifest...");
        let manifest: VersionManifest = fetch_json(fetcher, url).await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Release entries in manifest order (newest first), one per id. A
    /// repeated id keeps the position of its first occurrence and the entry
    /// of its last.
    pub fn releases(&self) -> Vec<&VersionEntry> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut releases: Vec<&VersionEntry> = Vec::new();
        for entry in self.versions.iter().filter(|v| v.version_type == RELEASE_TYPE) {
            match slots.get(entry.id.as_str()) {
                Some(&slot) => releases[slot] = entry,
                None => {
                    slots.insert(entry.id.as_str(), releases.len());
                    releases.push(entry);
                }
            }
        }
        releases
    }
}

/// Per-version manifest; only the server download matters here.
#[derive(Debug, Deserialize)]
pub struct ServerManifest {
    #[serde(default)]
    pub downloads: ServerDownloads,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerDownloads {
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub url: String,
    pub size: Option<u64>,
    pub sha1: Option<String>,
}

impl ServerManifest {
    pub async fn fetch(fetcher: &dyn HttpFetch, url: &str) -> ArtifactResult<Self> {
        fetch_json(fetcher, url).await
    }
}

/// GET + parse, reporting either failure as an unavailable upstream.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn HttpFetch,
    url: &str,
) -> ArtifactResult<T> {
    let body = fetcher
        .get_text(url)
        .await
        .map_err(|e| ArtifactError::upstream(url, e))?;
    serde_json::from_str(&body).map_err(|e| ArtifactError::upstream(url, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_entry() {
        let json = r#"{
            "id": "1.20.4",
            "type": "release",
            "url": "https://example.com/1.20.4.json",
            "time": "2023-12-07T08:00:00+00:00"
        }"#;
        let entry: VersionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1.20.4");
        assert_eq!(entry.version_type, "release");
    }

    #[test]
    fn releases_skip_snapshots_and_collapse_duplicates() {
        let json = r#"{ "versions": [
            { "id": "23w51a", "type": "snapshot", "url": "s" },
            { "id": "1.20.4", "type": "release", "url": "a" },
            { "id": "1.20.4", "type": "release", "url": "b" },
            { "id": "1.20.3", "type": "release", "url": "c" }
        ] }"#;
        let manifest: VersionManifest = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = manifest.releases().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["1.20.4", "1.20.3"]);
        assert_eq!(manifest.releases()[0].url, "b");
    }

    #[test]
    fn server_manifest_without_server_download() {
        let manifest: ServerManifest =
            serde_json::from_str(r#"{ "downloads": { "client": {} } }"#).unwrap();
        assert!(manifest.downloads.server.is_none());
    }
}
