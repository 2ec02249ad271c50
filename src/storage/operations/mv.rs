use crate::error::Result;
use crate::storage::operations::copy::{Copier, OpenDalCopier};
use crate::storage::utils::path::{depth, implied_folders, object_key};
use opendal::Operator;

/// Trait for moving objects and folders within one bucket.
///
/// A move is a copy followed by a delete of the originals. It is not atomic:
/// when a step fails the sequence stops and both sides may hold part of the
/// data.
pub trait Mover {
    /// Move a single object to a new key.
    async fn move_object(&self, src_key: &str, dest_key: &str) -> Result<()>;

    /// Move every key under the source folder to the destination folder,
    /// including the source marker itself.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of leaf objects moved
    async fn move_folder(&self, src: &str, dest: &str) -> Result<usize>;
}

/// Implementation of Mover for OpenDAL Operator.
pub struct OpenDalMover {
    operator: Operator,
    copier: OpenDalCopier,
}

impl OpenDalMover {
    /// Create a new mover with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self {
            copier: OpenDalCopier::new(operator.clone()),
            operator,
        }
    }
}

impl Mover for OpenDalMover {
    async fn move_object(&self, src_key: &str, dest_key: &str) -> Result<()> {
        self.copier.copy_object(src_key, dest_key).await?;
        self.operator.delete(&object_key(src_key)).await?;
        log::info!("{src_key} is moved to {dest_key}");
        Ok(())
    }

    async fn move_folder(&self, src: &str, dest: &str) -> Result<usize> {
        let copied = self.copier.copy_folder(src, dest).await?;

        self.operator.delete_iter(copied.files.clone()).await?;

        // Deepest markers go first so filesystem backends see empty directories.
        let mut folders = implied_folders(
            copied.files.iter().map(String::as_str),
            &copied.src_folder,
        );
        folders.extend(copied.folders.iter().cloned());
        folders.sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
        folders.dedup();
        for folder in &folders {
            self.operator.delete(folder).await?;
        }
        self.operator.delete(&copied.src_folder).await?;

        log::info!(
            "Moved {} object(s) from {} to {}",
            copied.files.len(),
            copied.src_folder,
            copied.dest_folder
        );
        Ok(copied.files.len())
    }
}
