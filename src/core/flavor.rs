use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ArtifactError;

/// Supported server distributions — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildFlavor {
    Vanilla,
    Forge,
    Fabric,
    Bedrock,
}

impl BuildFlavor {
    pub const ALL: [BuildFlavor; 4] = [
        BuildFlavor::Vanilla,
        BuildFlavor::Forge,
        BuildFlavor::Fabric,
        BuildFlavor::Bedrock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildFlavor::Vanilla => "vanilla",
            BuildFlavor::Forge => "forge",
            BuildFlavor::Fabric => "fabric",
            BuildFlavor::Bedrock => "bedrock",
        }
    }

    /// Deterministic artifact file name for a version of this flavor.
    pub fn file_name(&self, version: &str) -> String {
        match self {
            BuildFlavor::Vanilla => format!("{}.jar", version),
            BuildFlavor::Forge => format!("forge-{}-installer.jar", version),
            BuildFlavor::Fabric => format!("fabric-server-{}.jar", version),
            BuildFlavor::Bedrock => format!("bedrock-server-{}.zip", version),
        }
    }

    /// Name of the in-progress file inside a scratch directory.
    pub fn scratch_file_name(&self) -> String {
        format!("{}.download", self.as_str())
    }
}

impl std::fmt::Display for BuildFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildFlavor {
    type Err = ArtifactError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase();
        BuildFlavor::ALL
            .into_iter()
            .find(|flavor| flavor.as_str() == normalized)
            .ok_or_else(|| ArtifactError::UnknownFlavor(tag.to_string()))
    }
}
