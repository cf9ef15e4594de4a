pub mod manifest;

pub use manifest::{DownloadArtifact, ServerManifest, VersionEntry, VersionManifest};
