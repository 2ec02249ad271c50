// Delete operation trait and implementation
use crate::error::{FolderNotEmptySnafu, FolderNotFoundSnafu, InvalidPathSnafu, Result};
use crate::storage::object::StorageObject;
use crate::storage::operations::list::{Lister, OpenDalLister};
use crate::storage::utils::path::{depth, folder_key, implied_folders, is_folder_key, object_key};
use opendal::Operator;
use snafu::ensure;

/// Trait for deleting objects and folder contents from storage.
pub trait Deleter {
    /// Delete one object. A key ending with `/` names a folder marker,
    /// which is only removed when the folder exists and is empty.
    /// Deleting a missing leaf object succeeds.
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Delete everything under a folder while keeping the folder marker.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of keys deleted
    async fn delete_folder_data(&self, name: &str) -> Result<usize>;
}

/// Implementation of Deleter for OpenDAL Operator.
pub struct OpenDalDeleter {
    operator: Operator,
    lister: OpenDalLister,
}

impl OpenDalDeleter {
    /// Create a new deleter with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self {
            lister: OpenDalLister::new(operator.clone()),
            operator,
        }
    }

    async fn existing_folder(&self, name: &str) -> Result<String> {
        let folder = folder_key(name);
        ensure!(
            !folder.is_empty(),
            InvalidPathSnafu {
                path: name.to_string()
            }
        );
        ensure!(
            self.lister.folder_exists(&folder).await?,
            FolderNotFoundSnafu { path: folder }
        );
        Ok(folder)
    }
}

impl Deleter for OpenDalDeleter {
    async fn delete_object(&self, key: &str) -> Result<()> {
        if !is_folder_key(key) {
            let key = object_key(key);
            ensure!(!key.is_empty(), InvalidPathSnafu { path: key });
            self.operator.delete(&key).await?;
            log::info!("{key} => deleted");
            return Ok(());
        }

        let folder = self.existing_folder(key).await?;
        let entries = self.lister.entries_under(&folder).await?.len();
        ensure!(
            entries == 0,
            FolderNotEmptySnafu {
                path: folder,
                entries
            }
        );

        self.operator.delete(&folder).await?;
        log::info!("{folder} => deleted");
        Ok(())
    }

    async fn delete_folder_data(&self, name: &str) -> Result<usize> {
        let folder = self.existing_folder(name).await?;

        let (folders, files): (Vec<StorageObject>, Vec<StorageObject>) = self
            .lister
            .entries_under(&folder)
            .await?
            .into_iter()
            .partition(StorageObject::is_folder);
        let files: Vec<String> = files.iter().map(|o| o.key().to_string()).collect();

        let mut markers = implied_folders(files.iter().map(String::as_str), &folder);
        markers.extend(folders.iter().map(|o| o.key().to_string()));
        markers.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
        markers.dedup();

        let deleted = files.len() + folders.len();
        self.operator.delete_iter(files).await?;
        for marker in &markers {
            self.operator.delete(marker).await?;
        }

        log::info!("Deleted {deleted} key(s) inside {folder}");
        Ok(deleted)
    }
}
