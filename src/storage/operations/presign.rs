use crate::error::{ObjectNotFoundSnafu, PresignUnsupportedSnafu, Result};
use crate::storage::utils::path::object_key;
use opendal::Operator;
use snafu::ensure;
use std::time::Duration;

/// Trait for handing out time-limited download links.
pub trait Presigner {
    /// Pre-sign a GET request for `key`, valid for `expiration`.
    async fn link(&self, key: &str, expiration: Duration) -> Result<String>;
}

pub struct OpenDalPresigner {
    operator: Operator,
}

impl OpenDalPresigner {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Presigner for OpenDalPresigner {
    async fn link(&self, key: &str, expiration: Duration) -> Result<String> {
        let info = self.operator.info();
        ensure!(
            info.full_capability().presign_read,
            PresignUnsupportedSnafu {
                provider: info.scheme().to_string()
            }
        );

        let key = object_key(key);
        ensure!(
            self.operator.exists(&key).await?,
            ObjectNotFoundSnafu { key }
        );

        let request = self.operator.presign_read(&key, expiration).await?;
        Ok(request.uri().to_string())
    }
}
