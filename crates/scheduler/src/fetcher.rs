//! Icon backend seam.
//!
//! The scheduler is the only caller of the native icon backend. Everything it
//! needs from the outside world is captured by the [`IconFetcher`] trait, so
//! tests can substitute a scripted fetcher and production code can plug in
//! whatever OS capability actually extracts icons.

use async_trait::async_trait;
use launcher_icon_cache::{IconKey, IconPayload};
use thiserror::Error;

/// Failure modes of the external icon backend.
///
/// None of these are fatal: the scheduler recovers every variant locally and
/// converts it into an absent outcome, and the UI degrades to a placeholder
/// glyph.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend ran but could not produce an icon for this key.
    #[error("icon backend failed for {key}: {reason}")]
    Backend { key: String, reason: String },

    /// The backend is not reachable at all (helper process gone, etc.).
    #[error("icon backend unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous icon retrieval collaborator.
///
/// `fetch_icon` resolves to `Ok(Some(payload))` when an icon exists,
/// `Ok(None)` when the item genuinely has none, and `Err(_)` on backend
/// failure. The latter two are treated identically by the scheduler: the
/// result is not cached and a later request will retry.
#[async_trait]
pub trait IconFetcher: Send + Sync {
    /// Resolve the icon for `key`.
    async fn fetch_icon(&self, key: &IconKey) -> Result<Option<IconPayload>, FetchError>;
}
