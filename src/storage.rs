use crate::config::Credentials;
use crate::error::{Error, MissingCredentialsSnafu, Result};
use opendal::{ErrorKind, Operator};
use snafu::ensure;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub mod constants;
pub mod object;
mod operations;
mod utils;

pub use self::object::{ObjectMeta, StorageObject};
use self::constants::DEFAULT_OSS_ENDPOINT;
use self::operations::copy::OpenDalCopier;
use self::operations::delete::OpenDalDeleter;
use self::operations::list::OpenDalLister;
use self::operations::mkdir::OpenDalMkdirer;
use self::operations::mv::OpenDalMover;
use self::operations::presign::OpenDalPresigner;
use self::operations::stat::OpenDalStater;
use self::operations::upload::OpenDalUploader;
use self::operations::{
    Copier, Deleter, Lister, Mkdirer, Mover, Presigner, Stater, Uploader,
};
use self::utils::path::{basename, object_key};
use crate::wrap_err;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Fs,
}

impl StorageProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oss => "oss",
            Self::S3 => "s3",
            Self::Fs => "fs",
        }
    }
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Fully resolved configuration for one bucket
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
}

impl StorageConfig {
    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::Oss,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            endpoint: Some(DEFAULT_OSS_ENDPOINT.to_string()),
            region,
            root_path: None,
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: String,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: None,
            region: Some(region),
            root_path: None,
        }
    }

    pub fn fs(root_path: impl Into<String>) -> Self {
        Self {
            provider: StorageProvider::Fs,
            bucket: "local".to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path.into()),
        }
    }

    /// Combine `explicit` credentials with `defaults` and check that the
    /// provider's required fields are all present.
    pub fn resolve(
        provider: StorageProvider,
        explicit: Option<Credentials>,
        defaults: Credentials,
    ) -> Result<Self> {
        let creds = explicit.unwrap_or_default().or(defaults);

        let mut missing = Vec::new();
        if creds.access_key_id.is_none() {
            missing.push("access key");
        }
        if creds.secret_access_key.is_none() {
            missing.push("secret key");
        }
        if provider == StorageProvider::S3 && creds.region.is_none() {
            missing.push("region");
        }
        if creds.bucket.is_none() {
            missing.push("bucket name");
        }
        let (Some(access_key_id), Some(secret_access_key), Some(bucket)) =
            (creds.access_key_id, creds.secret_access_key, creds.bucket)
        else {
            return MissingCredentialsSnafu {
                provider: provider.as_str(),
                fields: missing,
            }
            .fail();
        };
        ensure!(
            missing.is_empty(),
            MissingCredentialsSnafu {
                provider: provider.as_str(),
                fields: missing
            }
        );
        let region = creds.region;
        let endpoint = creds.endpoint;

        let mut config = match provider {
            StorageProvider::Oss => {
                StorageConfig::oss(bucket, access_key_id, secret_access_key, region)
            }
            StorageProvider::S3 => StorageConfig::s3(
                bucket,
                access_key_id,
                secret_access_key,
                region.unwrap_or_default(),
            ),
            StorageProvider::Fs => {
                return Err(Error::UnsupportedProvider {
                    provider: "fs (takes a root path, not credentials)".to_string(),
                });
            }
        };
        if endpoint.is_some() {
            config.endpoint = endpoint;
        }
        Ok(config)
    }
}

/// Convenience facade over one OpenDAL operator bound to one bucket.
///
/// Every call goes straight to the backend; nothing is cached.
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    provider: StorageProvider,
    bucket: String,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        log::debug!(
            "storage client ready provider={:?} bucket={}",
            config.provider,
            config.bucket
        );
        Ok(Self {
            operator,
            provider: config.provider,
            bucket: config.bucket,
        })
    }

    pub fn provider(&self) -> StorageProvider {
        self.provider
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                let mut builder = opendal::services::Oss::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(access_key_secret) = &config.access_key_secret {
                    builder = builder.access_key_secret(access_key_secret);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::S3 => {
                let mut builder = opendal::services::S3::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = &config.access_key_secret {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Fs => {
                let root = config
                    .root_path
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_FS_ROOT);
                let builder = opendal::services::Fs::default().root(root);
                Ok(Operator::new(builder)?.finish())
            }
        }
    }

    /// Probe the backend with one cheap listing call. Never fails: problems
    /// are logged and reported as `false`.
    pub async fn check_credentials(&self) -> bool {
        match self.operator.check().await {
            Ok(()) => {
                log::info!("Credentials are valid for bucket {}", self.bucket);
                true
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::PermissionDenied => {
                        log::warn!("The credentials were rejected by the service: {e}")
                    }
                    ErrorKind::ConfigInvalid => log::warn!("The configuration is invalid: {e}"),
                    _ => log::warn!("Credentials could not be validated: {e}"),
                }
                false
            }
        }
    }

    /// Create a zero-byte folder marker. Returns `false` when it already existed.
    pub async fn create_folder(&self, name: &str) -> Result<bool> {
        log::debug!("create_folder provider={:?} name={}", self.provider, name);
        OpenDalMkdirer::new(self.operator.clone())
            .mkdir(name, false)
            .await
    }

    /// Like [`create_folder`](Self::create_folder), also creating markers for
    /// every missing ancestor.
    pub async fn create_folder_all(&self, name: &str) -> Result<bool> {
        log::debug!("create_folder_all provider={:?} name={}", self.provider, name);
        OpenDalMkdirer::new(self.operator.clone())
            .mkdir(name, true)
            .await
    }

    /// Upload a local file. `name` defaults to the file's base name.
    pub async fn upload_file(
        &self,
        local_path: impl AsRef<Path>,
        name: Option<&str>,
        replace: bool,
    ) -> Result<u64> {
        let local_path = local_path.as_ref();
        let key = match name {
            Some(name) => object_key(name),
            None => basename(local_path).unwrap_or_default(),
        };
        log::debug!(
            "upload_file provider={:?} local_path={} key={} replace={}",
            self.provider,
            local_path.display(),
            key,
            replace
        );

        let uploader = OpenDalUploader::new(self.operator.clone());
        wrap_err!(
            uploader.upload(local_path, &key, replace).await,
            UploadFailed {
                local_path: local_path.display().to_string(),
                key: key.clone()
            }
        )
    }

    pub async fn copy_file(&self, src_key: &str, dest_key: &str) -> Result<()> {
        log::debug!(
            "copy_file provider={:?} src_key={} dest_key={}",
            self.provider,
            src_key,
            dest_key
        );
        OpenDalCopier::new(self.operator.clone())
            .copy_object(src_key, dest_key)
            .await
    }

    /// Copy a folder and everything below it. Returns the number of objects copied.
    pub async fn copy_folder(&self, src: &str, dest: &str) -> Result<usize> {
        log::debug!(
            "copy_folder provider={:?} src={} dest={}",
            self.provider,
            src,
            dest
        );
        let copied = OpenDalCopier::new(self.operator.clone())
            .copy_folder(src, dest)
            .await?;
        Ok(copied.files.len())
    }

    pub async fn move_file(&self, src_key: &str, dest_key: &str) -> Result<()> {
        log::debug!(
            "move_file provider={:?} src_key={} dest_key={}",
            self.provider,
            src_key,
            dest_key
        );
        OpenDalMover::new(self.operator.clone())
            .move_object(src_key, dest_key)
            .await
    }

    /// Move a folder by copying every key and then deleting the originals.
    /// Not atomic; see [`Mover`](operations::Mover).
    pub async fn move_folder(&self, src: &str, dest: &str) -> Result<usize> {
        log::debug!(
            "move_folder provider={:?} src={} dest={}",
            self.provider,
            src,
            dest
        );
        let mover = OpenDalMover::new(self.operator.clone());
        wrap_err!(
            mover.move_folder(src, dest).await,
            MoveFolderFailed {
                src_path: src.to_string(),
                dest_path: dest.to_string()
            }
        )
    }

    /// List keys under `prefix`. With `folders_only`, leaf objects are dropped.
    pub async fn list_objects(
        &self,
        prefix: &str,
        folders_only: bool,
    ) -> Result<Vec<StorageObject>> {
        log::debug!(
            "list_objects provider={:?} prefix={} folders_only={}",
            self.provider,
            prefix,
            folders_only
        );
        let lister = OpenDalLister::new(self.operator.clone());
        wrap_err!(
            lister.list(prefix, folders_only).await,
            ListObjectsFailed {
                prefix: prefix.to_string()
            }
        )
    }

    pub async fn folder_exists(&self, name: &str) -> Result<bool> {
        OpenDalLister::new(self.operator.clone())
            .folder_exists(name)
            .await
    }

    pub async fn object_exists(&self, key: &str) -> Result<bool> {
        OpenDalStater::new(self.operator.clone()).exists(key).await
    }

    pub async fn get_file_metadata(&self, key: &str) -> Result<ObjectMeta> {
        log::debug!("get_file_metadata provider={:?} key={}", self.provider, key);
        OpenDalStater::new(self.operator.clone()).stat(key).await
    }

    pub async fn delete_object(&self, key: &str) -> Result<()> {
        log::debug!("delete_object provider={:?} key={}", self.provider, key);
        OpenDalDeleter::new(self.operator.clone())
            .delete_object(key)
            .await
    }

    /// Empty a folder but keep its marker. Returns the number of deleted keys.
    pub async fn delete_folder_data(&self, name: &str) -> Result<usize> {
        log::debug!("delete_folder_data provider={:?} name={}", self.provider, name);
        OpenDalDeleter::new(self.operator.clone())
            .delete_folder_data(name)
            .await
    }

    pub async fn get_file_link(&self, key: &str, expiration: Duration) -> Result<String> {
        log::debug!(
            "get_file_link provider={:?} key={} expiration={:?}",
            self.provider,
            key,
            expiration
        );
        OpenDalPresigner::new(self.operator.clone())
            .link(key, expiration)
            .await
    }
}
