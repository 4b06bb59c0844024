//! Icon identifiers and payloads.
//!
//! Every launcher item is identified by an [`IconKey`]: either the filesystem
//! path of a real application bundle, or a synthetic identifier for items that
//! have no backing file (user-defined scripts, virtual entries). Only path
//! keys can be resolved by the native icon backend.

use std::fmt;
use std::path::PathBuf;

/// Resolved icon data for a launcher item.
///
/// In practice this is an encoded image blob such as a
/// `data:image/png;base64,…` URI handed straight to the rendering layer.
/// An empty payload means "no icon" and is never cached.
pub type IconPayload = String;

/// Identifier of an item whose icon is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconKey {
    /// A real filesystem entity (application bundle, binary, document).
    Path(PathBuf),

    /// A synthetic item with no filesystem identity. The icon backend can
    /// never resolve these, so they are never fetched.
    Synthetic(String),
}

impl IconKey {
    /// Create a key for a filesystem path.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Create a key for a synthetic (non-file) item.
    pub fn synthetic(id: impl Into<String>) -> Self {
        Self::Synthetic(id.into())
    }

    /// Whether the icon backend can be asked for this key at all.
    pub fn is_fetchable(&self) -> bool {
        matches!(self, Self::Path(_))
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Synthetic(id) => write!(f, "{}", id),
        }
    }
}

impl From<PathBuf> for IconKey {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}
