use clap::{Parser, Subcommand};
use snafu::ensure;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Credentials;
use crate::error::{FolderNotFoundSnafu, InvalidPathSnafu, Result};
use crate::storage::StorageClient;
use crate::storage::constants::DEFAULT_LINK_EXPIRATION_SECS;
use crate::utils::confirm_folder_cleanup;

#[derive(Debug, Parser)]
#[command(
    name = "bucketeer",
    version,
    about = "Folder, upload, move and listing shortcuts for object storage"
)]
pub struct Args {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Explicit credentials; anything left out falls back to the default configuration.
#[derive(Debug, Default, clap::Args)]
pub struct ConnectionArgs {
    /// Storage provider: s3, minio, oss or fs
    #[arg(long, env = "STORAGE_PROVIDER")]
    pub provider: Option<String>,

    #[arg(long, env = "STORAGE_BUCKET")]
    pub bucket: Option<String>,

    #[arg(long, env = "STORAGE_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    #[arg(long, env = "STORAGE_ACCESS_KEY_SECRET", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    #[arg(long, env = "STORAGE_REGION")]
    pub region: Option<String>,

    #[arg(long, env = "STORAGE_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl ConnectionArgs {
    /// Explicit credentials, or `None` when no flag was given at all.
    pub fn credentials(&self) -> Option<Credentials> {
        let credentials = Credentials {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            endpoint: self.endpoint.clone(),
        };
        (!credentials.is_empty()).then_some(credentials)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the service accepts the credentials
    Check,

    /// Create a folder marker
    Mkdir {
        name: String,
        /// Also create every missing parent folder
        #[arg(short = 'p', long)]
        parents: bool,
    },

    /// Upload a local file
    Put {
        local_path: PathBuf,
        /// Destination key, defaults to the file name
        name: Option<String>,
        /// Overwrite an existing object
        #[arg(long)]
        replace: bool,
    },

    /// Move an object or a folder
    Mv { src: String, dest: String },

    /// Copy an object or a folder
    Cp { src: String, dest: String },

    /// List keys under a folder
    Ls {
        #[arg(default_value = "")]
        prefix: String,
        /// Only show folder markers
        #[arg(long)]
        folders: bool,
        /// Show type, size and modification time
        #[arg(short = 'l', long)]
        long: bool,
        /// Print a JSON array instead of text
        #[arg(long, conflicts_with = "long")]
        json: bool,
    },

    /// Show metadata of an object
    Stat { key: String },

    /// Delete an object or an empty folder (names ending with '/')
    Rm {
        key: String,
        /// Delete everything inside the folder but keep the folder itself
        #[arg(long)]
        contents: bool,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Print a pre-signed download link
    Link {
        key: String,
        /// Link lifetime in seconds
        #[arg(long, default_value_t = DEFAULT_LINK_EXPIRATION_SECS)]
        expires: u64,
    },
}

/// Decide whether `src` names a folder: explicit trailing '/', or no object
/// at that exact key but keys below it.
async fn is_folder_source(client: &StorageClient, src: &str) -> Result<bool> {
    if src.ends_with('/') {
        return Ok(true);
    }
    if client.object_exists(src).await? {
        return Ok(false);
    }
    client.folder_exists(src).await
}

pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    match args.command {
        Command::Check => {
            if client.check_credentials().await {
                println!("Credentials and client successfully validated");
            } else {
                println!("NOTE: Credentials are not validated");
            }
        }
        Command::Mkdir { name, parents } => {
            let created = if parents {
                client.create_folder_all(&name).await?
            } else {
                client.create_folder(&name).await?
            };
            if created {
                println!("Created folder: {name}");
            } else {
                println!("Folder already exists: {name}");
            }
        }
        Command::Put {
            local_path,
            name,
            replace,
        } => {
            client
                .upload_file(&local_path, name.as_deref(), replace)
                .await?;
        }
        Command::Mv { src, dest } => {
            if is_folder_source(&client, &src).await? {
                let moved = client.move_folder(&src, &dest).await?;
                println!("Moved folder {src} → {dest} ({moved} object(s))");
            } else {
                client.move_file(&src, &dest).await?;
                println!("Moved {src} → {dest}");
            }
        }
        Command::Cp { src, dest } => {
            if is_folder_source(&client, &src).await? {
                let copied = client.copy_folder(&src, &dest).await?;
                println!("Copied folder {src} → {dest} ({copied} object(s))");
            } else {
                client.copy_file(&src, &dest).await?;
                println!("Copied {src} → {dest}");
            }
        }
        Command::Ls {
            prefix,
            folders,
            long,
            json,
        } => {
            let objects = client.list_objects(&prefix, folders).await?;
            if json {
                let rendered = serde_json::to_string(&objects)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                println!("{rendered}");
            } else {
                for object in &objects {
                    if long {
                        println!("{object}");
                    } else {
                        println!("{}", object.key());
                    }
                }
            }
        }
        Command::Stat { key } => {
            let meta = client.get_file_metadata(&key).await?;
            println!("{meta}");
        }
        Command::Rm {
            key,
            contents,
            force,
        } => {
            if contents {
                ensure!(
                    !key.trim_matches('/').is_empty(),
                    InvalidPathSnafu { path: key.clone() }
                );
                ensure!(
                    client.folder_exists(&key).await?,
                    FolderNotFoundSnafu { path: key.clone() }
                );
                let entries = client.list_objects(&key, false).await?.len();
                if !confirm_folder_cleanup(&key, entries, force)? {
                    println!("Aborted");
                    return Ok(());
                }
                let deleted = client.delete_folder_data(&key).await?;
                println!("Deleted {deleted} item(s) inside {key}");
            } else {
                client.delete_object(&key).await?;
                println!("Deleted: {key}");
            }
        }
        Command::Link { key, expires } => {
            let url = client
                .get_file_link(&key, Duration::from_secs(expires))
                .await?;
            println!("{url}");
        }
    }
    Ok(())
}
