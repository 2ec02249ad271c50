use crate::error::{FolderNotFoundSnafu, InvalidPathSnafu, Result};
use crate::storage::constants::DEFAULT_CHUNK_SIZE;
use crate::storage::object::StorageObject;
use crate::storage::operations::list::{Lister, OpenDalLister};
use crate::storage::utils::path::{depth, folder_key, is_folder_key, object_key, rebase_key};
use crate::storage::utils::progress::ConsoleProgressReporter;
use opendal::Operator;
use snafu::ensure;

/// Trait for copying objects and folders within one bucket.
pub trait Copier {
    /// Copy a single object to a new key. The destination is overwritten.
    async fn copy_object(&self, src_key: &str, dest_key: &str) -> Result<()>;

    /// Copy every key under the source folder to the destination folder.
    ///
    /// # Arguments
    /// * `src` - Source folder name
    /// * `dest` - Destination folder name, must not lie inside `src`
    ///
    /// # Returns
    /// * `Result<FolderCopy>` - The source keys that were copied
    async fn copy_folder(&self, src: &str, dest: &str) -> Result<FolderCopy>;
}

/// Source keys touched by a folder copy, split by kind.
#[derive(Debug, Default)]
pub struct FolderCopy {
    pub src_folder: String,
    pub dest_folder: String,
    /// Folder markers, shallowest first.
    pub folders: Vec<String>,
    pub files: Vec<String>,
}

/// Implementation of Copier for OpenDAL Operator.
pub struct OpenDalCopier {
    operator: Operator,
}

impl OpenDalCopier {
    /// Create a new copier with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Stream copy a single file with progress reporting, for backends
    /// without a native copy.
    async fn stream_copy(&self, src_key: &str, dest_key: &str) -> opendal::Result<()> {
        let metadata = self.operator.stat(src_key).await?;
        let file_size = metadata.content_length();

        let mut writer = self.operator.writer(dest_key).await?;
        let mut offset = 0u64;

        let reporter = ConsoleProgressReporter::new(format!("Copying {src_key}"), file_size);

        while offset < file_size {
            let chunk_size = std::cmp::min(DEFAULT_CHUNK_SIZE as u64, file_size - offset);
            let data = self
                .operator
                .read_with(src_key)
                .range(offset..offset + chunk_size)
                .await?;
            let data_len = data.len() as u64;
            if data_len == 0 {
                break;
            }

            offset += data_len;
            writer.write(data).await?;
            reporter.maybe_report(offset);
        }

        writer.close().await?;
        println!();
        Ok(())
    }
}

impl Copier for OpenDalCopier {
    async fn copy_object(&self, src_key: &str, dest_key: &str) -> Result<()> {
        let src_key = object_key(src_key);
        let dest_key = object_key(dest_key);
        ensure!(
            !src_key.is_empty() && !is_folder_key(&src_key),
            InvalidPathSnafu { path: src_key }
        );
        ensure!(
            !dest_key.is_empty() && !is_folder_key(&dest_key) && dest_key != src_key,
            InvalidPathSnafu { path: dest_key }
        );

        if self.operator.info().full_capability().copy {
            self.operator.copy(&src_key, &dest_key).await?;
        } else {
            self.stream_copy(&src_key, &dest_key).await?;
        }
        log::info!("Copied {src_key} → {dest_key}");
        Ok(())
    }

    async fn copy_folder(&self, src: &str, dest: &str) -> Result<FolderCopy> {
        let src_folder = folder_key(src);
        let dest_folder = folder_key(dest);
        ensure!(
            !src_folder.is_empty(),
            InvalidPathSnafu {
                path: src.to_string()
            }
        );
        ensure!(
            !dest_folder.is_empty() && !dest_folder.starts_with(&src_folder),
            InvalidPathSnafu {
                path: dest.to_string()
            }
        );

        let lister = OpenDalLister::new(self.operator.clone());
        ensure!(
            lister.folder_exists(&src_folder).await?,
            FolderNotFoundSnafu { path: src_folder }
        );

        let (folders, files): (Vec<StorageObject>, Vec<StorageObject>) = lister
            .entries_under(&src_folder)
            .await?
            .into_iter()
            .partition(StorageObject::is_folder);
        let mut folders: Vec<String> = folders.iter().map(|o| o.key().to_string()).collect();
        folders.sort_by_key(|key| depth(key));
        let files: Vec<String> = files.iter().map(|o| o.key().to_string()).collect();

        // Every target must be known and checked before the first write: when
        // `src` lies inside `dest`, rebased keys can land back inside `src`.
        let folder_targets = rebase_all(&folders, &src_folder, &dest_folder);
        let file_targets = rebase_all(&files, &src_folder, &dest_folder);
        if let Some((_, target)) = folder_targets
            .iter()
            .chain(file_targets.iter())
            .find(|(_, target)| target.starts_with(&src_folder) || files.contains(target))
        {
            return InvalidPathSnafu {
                path: target.clone(),
            }
            .fail();
        }

        // Markers first so that every copied object has its parent folder in place.
        if !self.operator.exists(&dest_folder).await? {
            self.operator.create_dir(&dest_folder).await?;
        }
        for (_, target) in &folder_targets {
            self.operator.create_dir(target).await?;
        }
        for (file, target) in &file_targets {
            self.copy_object(file, target).await?;
        }

        Ok(FolderCopy {
            src_folder,
            dest_folder,
            folders,
            files,
        })
    }
}

/// Pair each key with its counterpart under `dest`, skipping keys outside `src`.
fn rebase_all(keys: &[String], src: &str, dest: &str) -> Vec<(String, String)> {
    keys.iter()
        .filter_map(|key| rebase_key(key, src, dest).map(|target| (key.clone(), target)))
        .collect()
}
