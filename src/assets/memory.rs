//! In-memory asset store used by tests and as the runtime fallback when
//! no asset directory is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AssetFolder, AssetStore, RawAsset, UploadedAsset, normalize_asset_ref};
use crate::error::GatewayError;

/// Asset store holding payloads in a map.
///
/// Supports failure injection: uploads beyond a configured count fail
/// with [`GatewayError::Upload`], which the registration workflow tests
/// use to exercise the abort path.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: Mutex<HashMap<String, RawAsset>>,
    uploads: AtomicUsize,
    fail_after: Option<usize>,
}

impl MemoryAssetStore {
    /// Creates an empty store that never fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose uploads fail once `succeed` uploads have
    /// been accepted.
    #[must_use]
    pub fn failing_after(succeed: usize) -> Self {
        Self {
            assets: Mutex::new(HashMap::new()),
            uploads: AtomicUsize::new(0),
            fail_after: Some(succeed),
        }
    }

    /// Number of assets currently held.
    pub async fn len(&self) -> usize {
        self.assets.lock().await.len()
    }

    /// Returns `true` when the store holds no assets.
    pub async fn is_empty(&self) -> bool {
        self.assets.lock().await.is_empty()
    }

    /// Returns `true` when an asset with the given id is held.
    pub async fn contains(&self, asset_id: &str) -> bool {
        self.assets.lock().await.contains_key(asset_id)
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(
        &self,
        file: RawAsset,
        folder: AssetFolder,
    ) -> Result<UploadedAsset, GatewayError> {
        let seen = self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after
            && seen >= limit
        {
            return Err(GatewayError::Upload("injected upload failure".to_string()));
        }

        let asset_id = uuid::Uuid::new_v4().simple().to_string();
        self.assets.lock().await.insert(asset_id.clone(), file);
        Ok(UploadedAsset {
            url: format!("memory://{}/{}", folder.as_str(), asset_id),
            asset_id,
        })
    }

    async fn delete(&self, asset_ref: &str) -> Result<(), GatewayError> {
        let asset_id = normalize_asset_ref(asset_ref);
        self.assets.lock().await.remove(&asset_id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawAsset {
        RawAsset {
            file_name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xff],
        }
    }

    #[tokio::test]
    async fn upload_and_delete_round_trip() {
        let store = MemoryAssetStore::new();
        let Ok(uploaded) = store.upload(raw("a.jpg"), AssetFolder::Photos).await else {
            panic!("upload failed");
        };
        assert!(store.contains(&uploaded.asset_id).await);

        assert!(store.delete(&uploaded.url).await.is_ok());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn failure_injection_kicks_in_after_limit() {
        let store = MemoryAssetStore::failing_after(1);
        assert!(store.upload(raw("a.jpg"), AssetFolder::Photos).await.is_ok());
        assert!(
            store
                .upload(raw("b.jpg"), AssetFolder::Photos)
                .await
                .is_err()
        );
    }
}
