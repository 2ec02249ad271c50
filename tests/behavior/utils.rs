use assert_cmd::prelude::*;
use bucketeer::error::Result;
use bucketeer::storage::{StorageClient, StorageConfig};
use libtest_mimic::{Failed, Trial};
use rand::Rng;
use rand::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, OnceLock};
use tempfile::TempDir;
use uuid::Uuid;

pub static TEST_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

// Storage root shared by the library client and the spawned binary
static TEST_STORAGE_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Directories owned by the harness; removed when `main` drops them.
pub struct TestDirs {
    pub storage: TempDir,
    pub local: TempDir,
}

pub async fn init_test_service(dirs: &TestDirs) -> Result<StorageClient> {
    let root = dirs.storage.path().to_path_buf();
    let _ = TEST_STORAGE_ROOT.set(root.clone());
    let _ = TEST_FIXTURE.local_dir.set(dirs.local.path().to_path_buf());

    let config = StorageConfig::fs(root.to_string_lossy().to_string());
    StorageClient::new(config).await
}

pub fn storage_root() -> &'static Path {
    TEST_STORAGE_ROOT
        .get()
        .expect("storage root is set before tests run")
}

pub struct Fixture {
    pub local_dir: OnceLock<PathBuf>,
}

impl Fixture {
    pub const fn new() -> Self {
        Self {
            local_dir: OnceLock::new(),
        }
    }

    /// A folder name no other test uses.
    pub fn new_folder_name(&self) -> String {
        format!("folder-{}", Uuid::new_v4())
    }

    /// Random content of a size picked from `range`.
    pub fn new_content(&self, range: std::ops::Range<usize>) -> Vec<u8> {
        let mut rng = rand::rng();
        let size = rng.random_range(range);
        let mut content = vec![0; size];
        rng.fill_bytes(&mut content);
        content
    }

    /// Write `content` to a fresh local file and return its path.
    pub fn new_local_file(&self, file_name: &str, content: &[u8]) -> PathBuf {
        let dir = self
            .local_dir
            .get()
            .expect("local dir is set before tests run")
            .join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub static TEST_FIXTURE: Fixture = Fixture::new();

/// Upload random content under `key` and return the content.
pub async fn put_random(client: &StorageClient, key: &str) -> Result<Vec<u8>> {
    let content = TEST_FIXTURE.new_content(1..64 * 1024);
    let local = TEST_FIXTURE.new_local_file("payload.bin", &content);
    client.upload_file(&local, Some(key), false).await?;
    Ok(content)
}

pub async fn list_keys(client: &StorageClient, prefix: &str, folders_only: bool) -> Result<Vec<String>> {
    Ok(client
        .list_objects(prefix, folders_only)
        .await?
        .iter()
        .map(|o| o.key().to_string())
        .collect())
}

pub fn build_async_trial<F, Fut>(name: &str, client: &StorageClient, f: F) -> Trial
where
    F: FnOnce(StorageClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send,
{
    let handle = TEST_RUNTIME.handle().clone();
    let client = client.clone();

    Trial::test(format!("behavior::{name}"), move || {
        handle
            .block_on(f(client))
            .map_err(|err| Failed::from(err.to_string()))
    })
}

#[macro_export]
macro_rules! async_trials {
    ($client:ident, $($test:ident),*) => {
        vec![$(build_async_trial(stringify!($test), $client, $test),)*]
    };
}

/// A bucketeer Command with a clean environment pointed at the test storage root.
pub fn bucketeer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bucketeer").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "warn")
        .env("STORAGE_PROVIDER", "fs")
        .env("STORAGE_ROOT_PATH", storage_root());
    cmd
}

/// A bucketeer Command with no configuration at all.
pub fn bare_bucketeer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bucketeer").unwrap();
    cmd.env_clear().env("RUST_LOG", "warn");
    cmd
}
