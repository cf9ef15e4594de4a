use std::future::Future;
use std::str::FromStr;

use tracing::{info, warn};

use crate::core::error::{ArtifactError, ArtifactResult};
use crate::core::flavor::BuildFlavor;

/// User-facing version choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Newest entry of the catalog listing.
    Latest,
    /// Every listed version, oldest first.
    All,
    /// A literal version, validated later by the catalog.
    Exact(String),
}

impl FromStr for VersionSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "latest" => VersionSelector::Latest,
            "all" => VersionSelector::All,
            other => VersionSelector::Exact(other.to_string()),
        })
    }
}

impl VersionSelector {
    /// Apply the selector to a newest-first listing.
    pub fn select(&self, flavor: BuildFlavor, versions: &[String]) -> ArtifactResult<Vec<String>> {
        match self {
            VersionSelector::Exact(version) => Ok(vec![version.clone()]),
            VersionSelector::Latest => versions
                .first()
                .map(|v| vec![v.clone()])
                .ok_or_else(|| ArtifactError::VersionNotFound {
                    flavor,
                    version: "latest".to_string(),
                }),
            VersionSelector::All => Ok(versions.iter().rev().cloned().collect()),
        }
    }
}

/// Outcome of running one operation per version.
#[derive(Debug)]
pub struct BulkReport<T> {
    pub succeeded: Vec<(String, T)>,
    pub failed: Vec<(String, ArtifactError)>,
}

impl<T> BulkReport<T> {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_versions(&self) -> Vec<&str> {
        self.failed.iter().map(|(v, _)| v.as_str()).collect()
    }
}

/// Run `op` for each version in order. A failing version is recorded and
/// the rest still run.
pub async fn process_sequentially<T, F, Fut>(versions: Vec<String>, mut op: F) -> BulkReport<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ArtifactResult<T>>,
{
    let mut report = BulkReport {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };

    for version in versions {
        match op(version.clone()).await {
            Ok(value) => report.succeeded.push((version, value)),
            Err(e) => {
                warn!(version, error = %e, "Version failed, continuing");
                report.failed.push((version, e));
            }
        }
    }

    info!(
        "Processed {} versions. {} failed: {}",
        report.attempted(),
        report.failed.len(),
        report.failed_versions().join(", ")
    );
    report
}
