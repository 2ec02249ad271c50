use crate::error::Result;
use crate::storage::object::StorageObject;
use crate::storage::utils::path::folder_key;
use futures::stream::TryStreamExt;
use opendal::{ErrorKind, Operator};

/// Trait for enumerating keys in object storage.
pub trait Lister {
    /// List every key under `prefix`.
    ///
    /// # Arguments
    /// * `prefix` - Folder to list; "" lists the whole bucket
    /// * `folders_only` - Return folder markers only, dropping leaf objects
    ///
    /// # Returns
    /// * `Result<Vec<StorageObject>>` - Sorted by key, empty when nothing matches
    async fn list(&self, prefix: &str, folders_only: bool) -> Result<Vec<StorageObject>>;

    /// Whether a folder marker or any key under the folder prefix exists.
    async fn folder_exists(&self, name: &str) -> Result<bool>;
}

/// Implementation of Lister for OpenDAL Operator.
pub struct OpenDalLister {
    operator: Operator,
}

impl OpenDalLister {
    /// Create a new lister with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Every key below an already normalized folder key, excluding the
    /// folder's own marker.
    pub async fn entries_under(&self, folder: &str) -> Result<Vec<StorageObject>> {
        let lister = match self.operator.lister_with(folder).recursive(true).await {
            Ok(lister) => lister,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut objects: Vec<StorageObject> = lister
            .map_ok(|entry| StorageObject::from_entry(&entry))
            .try_filter(|object| {
                let keep = !object.key().is_empty() && object.key() != folder;
                async move { keep }
            })
            .try_collect()
            .await?;
        objects.sort_by(|a, b| a.key().cmp(b.key()));
        objects.dedup_by(|a, b| a.key() == b.key());
        Ok(objects)
    }
}

impl Lister for OpenDalLister {
    async fn list(&self, prefix: &str, folders_only: bool) -> Result<Vec<StorageObject>> {
        let folder = folder_key(prefix);
        let objects = self.entries_under(&folder).await?;

        log::debug!(
            "listed {} key(s) under '{folder}' folders_only={folders_only}",
            objects.len()
        );

        if folders_only {
            Ok(objects.into_iter().filter(|o| o.is_folder()).collect())
        } else {
            Ok(objects)
        }
    }

    async fn folder_exists(&self, name: &str) -> Result<bool> {
        let folder = folder_key(name);
        if folder.is_empty() {
            return Ok(true);
        }
        if self.operator.exists(&folder).await? {
            return Ok(true);
        }
        Ok(!self.entries_under(&folder).await?.is_empty())
    }
}
