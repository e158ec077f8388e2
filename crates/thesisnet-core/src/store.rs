//! JSON persistence for [`ThesisCollection`].
//!
//! The on-disk document is UTF-8 with non-ASCII characters written as-is
//! and pretty-printed with a 4-space indent:
//!
//! ```json
//! {
//!     "2023": {
//!         "2023-1": {
//!             "title": "…",
//!             "author": "Smith, John",
//!             "directors": ["Jane Doe"]
//!         }
//!     }
//! }
//! ```
//!
//! A record missing `title`, `author` or `directors` is a malformed input
//! and fails the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::model::ThesisCollection;

const INDENT: &[u8] = b"    ";

/// Errors from loading or saving a thesis document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed thesis document ({origin}): {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("thesis document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::InputUnreadable,
            Self::Write { .. } => ErrorCode::OutputWriteFailed,
            Self::Malformed { .. } | Self::Encoding(_) => ErrorCode::MalformedInput,
        }
    }
}

/// Parse a thesis document from a string.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the JSON shape is wrong.
pub fn from_json_str(json: &str) -> Result<ThesisCollection, StoreError> {
    serde_json::from_str(json).map_err(|source| StoreError::Malformed {
        origin: "inline".to_string(),
        source,
    })
}

/// Serialize a collection in the persisted layout.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if serialization fails and
/// [`StoreError::Encoding`] if the output is not UTF-8.
pub fn to_json_string(collection: &ThesisCollection) -> Result<String, StoreError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    collection
        .serialize(&mut ser)
        .map_err(|source| StoreError::Malformed {
            origin: "serialize".to_string(),
            source,
        })?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// Load a thesis document from disk.
///
/// # Errors
///
/// Returns [`StoreError::Read`] if the file cannot be read and
/// [`StoreError::Malformed`] if its content is not a thesis document.
#[instrument]
pub fn load_collection(path: &Path) -> Result<ThesisCollection, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: ThesisCollection =
        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            origin: path.display().to_string(),
            source,
        })?;
    debug!(records = collection.len(), "thesis document loaded");
    Ok(collection)
}

/// Write a thesis document to disk, creating parent directories.
///
/// # Errors
///
/// Returns [`StoreError::Write`] on any filesystem failure.
#[instrument(skip(collection), fields(records = collection.len()))]
pub fn save_collection(path: &Path, collection: &ThesisCollection) -> Result<(), StoreError> {
    let json = to_json_string(collection)?;
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)
}
