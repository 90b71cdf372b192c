//! Asset-store collaborator: upload/delete of binary assets.
//!
//! The registration workflow uploads two images per applicant through
//! this seam and releases them again on record deletion. The gateway is
//! agnostic to the concrete backing store: the filesystem store serves
//! single-node deployments, the in-memory store backs tests.

pub mod fs;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::domain::fields::asset_ref_from_url;
use crate::error::GatewayError;

pub use fs::FsAssetStore;
pub use memory::MemoryAssetStore;

/// Raw binary payload handed to the store.
#[derive(Debug, Clone)]
pub struct RawAsset {
    /// Original file name as submitted by the client.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Logical folder an asset is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFolder {
    /// Identity-document scans.
    IdentityDocuments,
    /// Personal photos.
    Photos,
}

impl AssetFolder {
    /// Path segment used by URL and storage layouts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IdentityDocuments => "ids",
            Self::Photos => "photos",
        }
    }
}

impl fmt::Display for AssetFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully stored asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Stable public URL.
    pub url: String,
    /// Store-side identifier used for deletion.
    pub asset_id: String,
}

/// Binary-asset store collaborator.
///
/// `delete` accepts either an explicit asset id or a full asset URL;
/// implementations derive the id from the URL pattern when given the
/// latter, so records that only carry URLs can still release assets.
#[async_trait]
pub trait AssetStore: fmt::Debug + Send + Sync {
    /// Stores a file under the given folder, returning its URL and id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upload`] on store failure.
    async fn upload(
        &self,
        file: RawAsset,
        folder: AssetFolder,
    ) -> Result<UploadedAsset, GatewayError>;

    /// Removes an asset by id or URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upload`] on store failure. Deleting an
    /// unknown asset is not an error.
    async fn delete(&self, asset_ref: &str) -> Result<(), GatewayError>;
}

/// Normalizes an id-or-URL reference to a bare asset id.
#[must_use]
pub fn normalize_asset_ref(asset_ref: &str) -> String {
    asset_ref_from_url(asset_ref)
}
