use std::path::Path;

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::core::error::{ArtifactError, ArtifactResult};

const HASH_BLOCK_SIZE: usize = 1 << 16;

/// Size in bytes of the file at `path`.
pub async fn file_size(path: &Path) -> ArtifactResult<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ArtifactError::io(path, e))?;
    Ok(metadata.len())
}

/// Lowercase hex SHA-1 of the file, hashed in fixed-size blocks so large
/// artifacts are never held in memory.
pub async fn file_sha1(path: &Path) -> ArtifactResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ArtifactError::io(path, e))?;
    let mut hasher = Sha1::new();
    let mut block = vec![0u8; HASH_BLOCK_SIZE];
    loop {
        let read = file
            .read(&mut block)
            .await
            .map_err(|e| ArtifactError::io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&block[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Check a downloaded file against the expected size and SHA-1.
///
/// A missing expectation skips that check; it is never invented.
pub async fn verify_file(
    path: &Path,
    expected_size: Option<u64>,
    expected_sha1: Option<&str>,
) -> ArtifactResult<()> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ArtifactError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }

    match expected_size {
        Some(expected) => {
            let actual = file_size(path).await?;
            if actual != expected {
                return Err(ArtifactError::SizeMismatch {
                    path: path.to_path_buf(),
                    expected,
                    actual,
                });
            }
        }
        None => warn!(path = %path.display(), "No expected size, skipping size check"),
    }

    match expected_sha1 {
        Some(expected) => {
            let actual = file_sha1(path).await?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ArtifactError::Sha1Mismatch {
                    path: path.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }
        None => warn!(path = %path.display(), "No expected SHA-1, skipping hash check"),
    }

    debug!(path = %path.display(), "Artifact verified");
    Ok(())
}
