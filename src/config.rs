use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::error::{InvalidCredentialsFileSnafu, ReadCredentialsFileSnafu, Result};
use crate::storage::constants::{DEFAULT_FS_ROOT, DEFAULT_PROVIDER};
use crate::storage::{StorageConfig, StorageProvider};

/// Access key, secret key, region and bucket for one storage account.
///
/// Every field is optional while credentials are being gathered; the
/// per-provider requirements are enforced by [`StorageConfig::resolve`].
/// The JSON form also accepts the historical key spellings
/// (`"access key"`, `"secret key"`, `"bucket_name"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, alias = "access key")]
    pub access_key_id: Option<String>,
    #[serde(default, alias = "secret key")]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, alias = "bucket_name")]
    pub bucket: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            region: Some(region.into()),
            bucket: Some(bucket.into()),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Fill every absent or blank field from `fallback`. Blank values on
    /// either side count as absent, so an empty secret never reaches a builder.
    pub fn or(self, fallback: Credentials) -> Self {
        Self {
            access_key_id: present(self.access_key_id).or(present(fallback.access_key_id)),
            secret_access_key: present(self.secret_access_key)
                .or(present(fallback.secret_access_key)),
            region: present(self.region).or(present(fallback.region)),
            bucket: present(self.bucket).or(present(fallback.bucket)),
            endpoint: present(self.endpoint).or(present(fallback.endpoint)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Read credentials from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).context(ReadCredentialsFileSnafu {
            path: path.to_path_buf(),
        })?;
        serde_json::from_str(&raw).context(InvalidCredentialsFileSnafu {
            path: path.to_path_buf(),
        })
    }

    /// Gather provider specific credentials through `lookup`.
    ///
    /// The generic `STORAGE_*` names are consulted first, then the names the
    /// provider's own tooling uses (`AWS_*`, `OSS_*`, `MINIO_*`).
    pub fn from_lookup<F>(provider_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|key| present(lookup(*key)));

        match provider_name.to_lowercase().as_str() {
            "oss" => Self {
                bucket: first(&["STORAGE_BUCKET", "OSS_BUCKET"]),
                access_key_id: first(&["STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID"]),
                secret_access_key: first(&["STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET"]),
                region: first(&["STORAGE_REGION", "OSS_REGION"]),
                endpoint: first(&["STORAGE_ENDPOINT", "OSS_ENDPOINT"]),
            },
            "minio" => Self {
                bucket: first(&["STORAGE_BUCKET", "MINIO_BUCKET"]),
                access_key_id: first(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"]),
                secret_access_key: first(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"]),
                region: first(&["STORAGE_REGION", "MINIO_DEFAULT_REGION"]),
                endpoint: first(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"]),
            },
            _ => Self {
                bucket: first(&["STORAGE_BUCKET", "AWS_S3_BUCKET"]),
                access_key_id: first(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]),
                secret_access_key: first(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"]),
                region: first(&["STORAGE_REGION", "AWS_DEFAULT_REGION"]),
                endpoint: first(&["STORAGE_ENDPOINT"]),
            },
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Provider selection and default credentials, read once at start-up.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub provider_name: String,
    pub credentials: Credentials,
    pub root_path: String,
}

impl Defaults {
    /// Build defaults through `lookup`, layering the environment over the
    /// credentials file named by `STORAGE_CREDENTIALS_FILE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider_name =
            lookup("STORAGE_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let mut credentials = Credentials::from_lookup(&provider_name, &lookup);
        if let Some(file) = lookup("STORAGE_CREDENTIALS_FILE") {
            log::debug!("loading default credentials from {file}");
            credentials = credentials.or(Credentials::from_json_file(&file)?);
        }

        let root_path = lookup("STORAGE_ROOT_PATH").unwrap_or_else(|| DEFAULT_FS_ROOT.to_string());

        Ok(Self {
            provider_name,
            credentials,
            root_path,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

/// Resolve the storage configuration: `explicit` credentials first, the
/// process environment and credentials file for whatever they leave out.
pub fn load_storage_config(
    provider: Option<&str>,
    explicit: Option<Credentials>,
) -> Result<StorageConfig> {
    let defaults = Defaults::from_env()?;
    resolve_with_defaults(provider, explicit, defaults)
}

pub fn resolve_with_defaults(
    provider: Option<&str>,
    explicit: Option<Credentials>,
    defaults: Defaults,
) -> Result<StorageConfig> {
    let provider_name = provider.unwrap_or(defaults.provider_name.as_str());
    let provider_kind = StorageProvider::from_str(provider_name)?;

    if let StorageProvider::Fs = provider_kind {
        return Ok(StorageConfig::fs(defaults.root_path));
    }

    let mut config = StorageConfig::resolve(provider_kind, explicit, defaults.credentials)?;
    if provider_name.eq_ignore_ascii_case("minio") && config.endpoint.is_none() {
        config.endpoint = Some(crate::storage::constants::DEFAULT_MINIO_ENDPOINT.to_string());
    }
    Ok(config)
}
