use clap::Parser;

use bucketeer::cli;
use bucketeer::error::Result;
use bucketeer::storage::StorageClient;

use bucketeer::cli::Args;
use bucketeer::config::load_storage_config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config(
        args.connection.provider.as_deref(),
        args.connection.credentials(),
    )?;
    let client = StorageClient::new(config).await?;
    cli::run(args, client).await?;
    Ok(())
}
