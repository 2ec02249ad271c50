// Folder creation operation trait and implementation
use crate::error::Result;
use crate::storage::utils::path::folder_key;
use opendal::Operator;

/// Trait for creating folder markers in storage.
pub trait Mkdirer {
    /// Create a folder marker, doing nothing if it is already there.
    ///
    /// # Arguments
    /// * `name` - Folder name, with or without the trailing separator
    /// * `parents` - Also create a marker for every missing ancestor
    ///
    /// # Returns
    /// * `Result<bool>` - Whether a new marker was written
    async fn mkdir(&self, name: &str, parents: bool) -> Result<bool>;
}

/// Implementation of Mkdirer for OpenDAL Operator.
pub struct OpenDalMkdirer {
    operator: Operator,
}

impl OpenDalMkdirer {
    /// Create a new mkdirer with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Write one marker unless it already exists.
    async fn create_marker(&self, key: &str) -> Result<bool> {
        if self.operator.exists(key).await? {
            log::info!("Folder already present: {key}");
            return Ok(false);
        }

        self.operator.create_dir(key).await?;
        log::info!("Folder created: {key}");
        Ok(true)
    }

    /// Marker keys for every ancestor of `key`, shallowest first, `key` last.
    fn ancestor_keys(key: &str) -> Vec<String> {
        let components: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        (1..=components.len())
            .map(|i| format!("{}/", components[..i].join("/")))
            .collect()
    }
}

impl Mkdirer for OpenDalMkdirer {
    async fn mkdir(&self, name: &str, parents: bool) -> Result<bool> {
        let key = folder_key(name);
        if key.is_empty() {
            log::info!("The bucket root always exists");
            return Ok(false);
        }

        if !parents {
            return self.create_marker(&key).await;
        }

        let mut created = false;
        for marker in Self::ancestor_keys(&key) {
            created |= self.create_marker(&marker).await?;
        }
        Ok(created)
    }
}
