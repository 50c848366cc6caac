//! Content digests of snapshot files, recorded between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::warn;

use super::to_pretty_json;
use crate::error::AppError;

/// SHA-256 of every snapshot file at the end of the previous run, keyed by snapshot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestManifest {
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub digests: BTreeMap<String, String>,
}

impl DigestManifest {
    /// Reads a manifest. A missing or unreadable manifest is treated as empty,
    /// which reports every existing snapshot as changed.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                warn!("Ignoring corrupt digest manifest {}: {e}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), AppError> {
        fs::write(path, to_pretty_json(self)?).await?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.digests.get(name).map(String::as_str)
    }
}

/// Hex SHA-256 of a byte slice
pub fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex SHA-256 of a file, `None` when the file does not exist
pub async fn file_digest(path: &Path) -> Result<Option<String>, AppError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(digest_bytes(&bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_digest_bytes_known_value() {
        assert_eq!(
            digest_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_file_digest_missing_file() {
        let temp_dir = tempdir().unwrap();
        assert_eq!(file_digest(&temp_dir.path().join("nope.json")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_manifest_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".snapshot-digests.json");

        let mut manifest = DigestManifest::default();
        manifest.digests.insert("cms".to_string(), digest_bytes(b"{}"));
        manifest.save(&path).await.unwrap();

        let loaded = DigestManifest::load(&path).await.unwrap();
        assert_eq!(loaded.get("cms"), Some(digest_bytes(b"{}").as_str()));
        assert_eq!(loaded.get("events"), None);
    }

    #[tokio::test]
    async fn test_corrupt_manifest_is_treated_as_empty() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".snapshot-digests.json");
        fs::write(&path, "not json").await.unwrap();

        assert_eq!(DigestManifest::load(&path).await.unwrap(), DigestManifest::default());
    }
}
