use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{ArtifactError, ArtifactResult};

const APP_DIR_NAME: &str = "artifact-resolver";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_BEDROCK_VERSION: &str = "1.19.40.02";
const EARLIEST_SUPPORTED_VERSION: &str = "1.7.2";

/// Log verbosity threaded into every component instead of a global logger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Upstream URL templates.
///
/// Placeholders: `{minecraft}`, `{forge}` and `{version}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub mojang_manifest: String,
    pub forge_index: String,
    pub forge_download: String,
    pub fabric_meta: String,
    pub bedrock_download: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            mojang_manifest: "https://launchermeta.mojang.com/mc/game/version_manifest.json"
                .to_string(),
            forge_index:
                "https://files.minecraftforge.net/net/minecraftforge/forge/index_{minecraft}.html"
                    .to_string(),
            forge_download: "https://maven.minecraftforge.net/net/minecraftforge/forge/{minecraft}-{forge}/forge-{minecraft}-{forge}-installer.jar".to_string(),
            fabric_meta: "https://meta.fabricmc.net/v2".to_string(),
            bedrock_download:
                "https://minecraft.azureedge.net/bin-linux/bedrock-server-{version}.zip"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub logging: LoggingConfig,
    /// Let Fabric pick loaders, intermediaries and installers not flagged stable.
    pub allow_unstable: bool,
    pub request_timeout_secs: u64,
    /// Oldest Vanilla release offered; older entries are cut from the listing.
    pub earliest_supported_version: Option<String>,
    pub bedrock_version: String,
    /// Parent of per-download scratch directories. System temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    pub endpoints: Endpoints,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            allow_unstable: false,
            request_timeout_secs: 60,
            earliest_supported_version: Some(EARLIEST_SUPPORTED_VERSION.to_string()),
            bedrock_version: DEFAULT_BEDROCK_VERSION.to_string(),
            scratch_dir: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl ResolverConfig {
    /// `<config dir>/artifact-resolver/config.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
        let config: ResolverConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded resolver config");
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> ArtifactResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> ArtifactResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ArtifactError::io(path, e))
    }

    pub fn validate(&self) -> ArtifactResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ArtifactError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.bedrock_version.trim().is_empty() {
            return Err(ArtifactError::Config("bedrock_version is empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "allow_unstable": true, "logging": { "level": "debug" } }"#)
            .unwrap();

        let config = ResolverConfig::load(&path).unwrap();
        assert!(config.allow_unstable);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.bedrock_version, DEFAULT_BEDROCK_VERSION);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ResolverConfig::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert_eq!(
            config.earliest_supported_version.as_deref(),
            Some(EARLIEST_SUPPORTED_VERSION)
        );
    }

    #[test]
    fn save_then_load_preserves_endpoints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = ResolverConfig::default();
        config.endpoints.fabric_meta = "http://mirror.local/v2".into();
        config.save(&path).unwrap();

        let loaded = ResolverConfig::load(&path).unwrap();
        assert_eq!(loaded.endpoints.fabric_meta, "http://mirror.local/v2");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ResolverConfig {
            request_timeout_secs: 0,
            ..ResolverConfig::default()
        };
        assert!(matches!(config.validate(), Err(ArtifactError::Config(_))));
    }
}
