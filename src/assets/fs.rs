//! Filesystem-backed asset store.
//!
//! Assets are written under `{root}/{folder}/{asset_id}` with no
//! extension (the asset id is the file name), and served under
//! `{base_url}/{folder}/{asset_id}`. Suitable for single-node
//! deployments where a reverse proxy serves the asset directory.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{AssetFolder, AssetStore, RawAsset, UploadedAsset, normalize_asset_ref};
use crate::error::GatewayError;

/// Asset store writing to a local directory via `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
    base_url: String,
}

impl FsAssetStore {
    /// Creates a store rooted at `root`, serving URLs under `base_url`.
    #[must_use]
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn upload(
        &self,
        file: RawAsset,
        folder: AssetFolder,
    ) -> Result<UploadedAsset, GatewayError> {
        let asset_id = uuid::Uuid::new_v4().simple().to_string();
        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| GatewayError::Upload(format!("create {}: {e}", dir.display())))?;

        let path = dir.join(&asset_id);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| GatewayError::Upload(format!("write {}: {e}", path.display())))?;

        tracing::debug!(
            asset_id,
            folder = folder.as_str(),
            size = file.bytes.len(),
            file_name = %file.file_name,
            "asset stored"
        );
        Ok(UploadedAsset {
            url: format!("{}/{}/{}", self.base_url, folder.as_str(), asset_id),
            asset_id,
        })
    }

    async fn delete(&self, asset_ref: &str) -> Result<(), GatewayError> {
        let asset_id = normalize_asset_ref(asset_ref);
        for folder in [AssetFolder::IdentityDocuments, AssetFolder::Photos] {
            let path = self.root.join(folder.as_str()).join(&asset_id);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(asset_id, folder = folder.as_str(), "asset deleted");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(GatewayError::Upload(format!(
                        "delete {}: {e}",
                        path.display()
                    )));
                }
            }
        }
        // Unknown assets are not an error; the record may predate the store.
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn temp_store() -> FsAssetStore {
        let dir = std::env::temp_dir().join(format!("crewreg-assets-{}", uuid::Uuid::new_v4()));
        FsAssetStore::new(dir, "https://assets.local".to_string())
    }

    #[tokio::test]
    async fn upload_then_delete_by_url() {
        let store = temp_store();
        let uploaded = store
            .upload(
                RawAsset {
                    file_name: "id.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    bytes: vec![1, 2, 3],
                },
                AssetFolder::IdentityDocuments,
            )
            .await;
        let Ok(uploaded) = uploaded else {
            panic!("upload failed");
        };
        assert!(uploaded.url.starts_with("https://assets.local/ids/"));

        assert!(store.delete(&uploaded.url).await.is_ok());
        // Second delete of the same reference is a no-op.
        assert!(store.delete(&uploaded.asset_id).await.is_ok());
    }
}
