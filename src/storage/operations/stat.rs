use crate::error::Result;
use crate::storage::object::ObjectMeta;
use crate::storage::utils::path::is_folder_key;
use opendal::{ErrorKind, Operator};

/// Trait for fetching object metadata from storage.
pub trait Stater {
    /// Fetch metadata for a single object or folder marker.
    ///
    /// # Arguments
    /// * `key` - Object key to query
    ///
    /// # Returns
    /// * `Result<ObjectMeta>` - Collected metadata; a missing key surfaces the backend's NotFound
    async fn stat(&self, key: &str) -> Result<ObjectMeta>;

    /// Whether an object exists at exactly this key. A directory only counts
    /// when the key itself names a folder marker.
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Implementation of `Stater` for OpenDAL `Operator`.
#[derive(Clone)]
pub struct OpenDalStater {
    operator: Operator,
}

impl OpenDalStater {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Stater for OpenDalStater {
    async fn stat(&self, key: &str) -> Result<ObjectMeta> {
        let key = key.trim_start_matches('/');
        let meta = self.operator.stat(key).await?;
        Ok(ObjectMeta::from_metadata(key, &meta))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let key = key.trim_start_matches('/');
        match self.operator.stat(key).await {
            Ok(meta) => Ok(is_folder_key(key) || !meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
