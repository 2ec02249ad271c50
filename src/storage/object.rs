use opendal::{Entry, EntryMode, Metadata};
use serde::Serialize;
use std::fmt;

use crate::storage::utils::path::is_folder_key;
use crate::storage::utils::size::format_size;

/// One key in the bucket, either a folder marker or a leaf object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageObject {
    /// Zero-byte marker whose key ends with `/`.
    Folder { key: String },
    File {
        key: String,
        size: u64,
        last_modified: Option<String>,
    },
}

impl StorageObject {
    pub fn from_entry(entry: &Entry) -> Self {
        let key = entry.path().trim_start_matches('/').to_string();
        let meta = entry.metadata();

        if meta.mode() == EntryMode::DIR || is_folder_key(&key) {
            StorageObject::Folder { key }
        } else {
            StorageObject::File {
                key,
                size: meta.content_length(),
                last_modified: meta.last_modified().map(|t| t.to_string()),
            }
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StorageObject::Folder { key } | StorageObject::File { key, .. } => key,
        }
    }

    /// Key without the trailing separator of a folder marker.
    pub fn name(&self) -> &str {
        self.key().trim_end_matches('/')
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, StorageObject::Folder { .. })
    }
}

impl fmt::Display for StorageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageObject::Folder { key } => write!(f, "{:<6} {:>10} {:<25} {key}", "DIR", "-", "-"),
            StorageObject::File {
                key,
                size,
                last_modified,
            } => {
                let modified = last_modified.as_deref().unwrap_or("Unknown");
                write!(f, "{:<6} {:>10} {modified:<25} {key}", "FILE", format_size(*size))
            }
        }
    }
}

/// Metadata of a single object as reported by a `stat` call.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectMeta {
    pub key: String,
    pub is_folder: bool,
    pub content_length: u64,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

impl ObjectMeta {
    pub fn from_metadata(key: &str, meta: &Metadata) -> Self {
        Self {
            key: key.to_string(),
            is_folder: meta.mode() == EntryMode::DIR,
            content_length: meta.content_length(),
            last_modified: meta.last_modified().map(|t| t.to_string()),
            content_type: meta.content_type().map(|s| s.to_string()),
            etag: meta.etag().map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for ObjectMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key:           {}", self.key)?;
        writeln!(
            f,
            "Type:          {}",
            if self.is_folder { "folder" } else { "file" }
        )?;
        writeln!(f, "ContentLength: {}", self.content_length)?;
        writeln!(
            f,
            "LastModified:  {}",
            self.last_modified.as_deref().unwrap_or("-")
        )?;
        writeln!(
            f,
            "ContentType:   {}",
            self.content_type.as_deref().unwrap_or("-")
        )?;
        write!(f, "ETag:          {}", self.etag.as_deref().unwrap_or("-"))
    }
}
