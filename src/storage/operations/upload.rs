use crate::error::{InvalidPathSnafu, ObjectAlreadyExistsSnafu, PathNotFoundSnafu, Result};
use crate::storage::constants::{DEFAULT_BUFFER_SIZE, PROGRESS_UPDATE_INTERVAL};
use crate::storage::utils::path::is_folder_key;
use crate::storage::utils::progress::ConsoleProgressReporter;
use opendal::Operator;
use snafu::ensure;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for uploading local files to storage.
pub trait Uploader {
    /// Upload a single local file under `key`.
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `key` - Destination key in the bucket
    /// * `replace` - Overwrite an existing object instead of failing
    ///
    /// # Returns
    /// * `Result<u64>` - Number of bytes written
    async fn upload(&self, local_path: &Path, key: &str, replace: bool) -> Result<u64>;
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Stream a single file into the writer with progress output.
    async fn upload_file_streaming(&self, local_path: &Path, key: &str) -> Result<u64> {
        let file = fs::File::open(local_path).await?;
        let file_size = file.metadata().await?.len();
        log::info!("File name: {key}, file size: {file_size} bytes");

        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;
        let mut writer = self.operator.writer(key).await?;

        let reporter =
            ConsoleProgressReporter::new(format!("Uploading {}", local_path.display()), file_size);
        let step_bytes = DEFAULT_BUFFER_SIZE as u64 * PROGRESS_UPDATE_INTERVAL;
        let mut next_report = step_bytes;

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            writer.write(buffer[..bytes_read].to_vec()).await?;
            total_bytes += bytes_read as u64;
            if total_bytes >= next_report {
                reporter.maybe_report(total_bytes);
                next_report += step_bytes;
            }
        }
        writer.close().await?;
        reporter.maybe_report(total_bytes);
        println!(
            "\n✅ Upload: {} → {key} ({total_bytes} bytes)",
            local_path.display(),
        );
        Ok(total_bytes)
    }
}

impl Uploader for OpenDalUploader {
    async fn upload(&self, local_path: &Path, key: &str, replace: bool) -> Result<u64> {
        ensure!(
            local_path.is_file(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        ensure!(
            !key.is_empty() && !is_folder_key(key),
            InvalidPathSnafu {
                path: key.to_string()
            }
        );

        // Best effort only: nothing stops another writer between this check and the write.
        if self.operator.exists(key).await? {
            ensure!(
                replace,
                ObjectAlreadyExistsSnafu {
                    key: key.to_string()
                }
            );
            log::info!("Replacing existing object: {key}");
        }

        self.upload_file_streaming(local_path, key).await
    }
}
