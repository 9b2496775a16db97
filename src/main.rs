use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudflare_images::{Credentials, ImagesClient, ListImagesParams};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "cf-images")]
#[command(about = "Manage images stored in Cloudflare Images")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload an image file, replacing any stored image with the same ID.
    Upload {
        /// Path to the image file.
        file: PathBuf,
        /// Image ID; a random UUID is generated when omitted.
        #[arg(long)]
        id: Option<String>,
    },
    /// Fetch metadata for an image.
    Get { id: String },
    /// Delete an image.
    Delete { id: String },
    /// List stored images.
    List {
        #[arg(long, default_value_t = 1000)]
        per_page: u32,
        #[arg(long, default_value = "desc")]
        sort_order: String,
        #[arg(long)]
        continuation_token: Option<String>,
    },
    /// Show account usage statistics.
    Stats,
    /// Print the delivery URL for an image. No network access.
    Url {
        id: String,
        #[arg(long, default_value = "public")]
        variant: String,
    },
    /// Fetch a short-lived batch token.
    BatchToken,
}

async fn run(client: &ImagesClient, command: Command) -> Result<()> {
    let response = match command {
        Command::Upload { file, id } => {
            let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let content = std::fs::read(&file)?;
            info!("Uploading {} as {}", file.display(), id);
            client.upsert(&id, &content).await?
        }
        Command::Get { id } => client.get(&id).await?,
        Command::Delete { id } => client.delete(&id).await?,
        Command::List {
            per_page,
            sort_order,
            continuation_token,
        } => {
            let mut params = ListImagesParams::default()
                .with_per_page(per_page)
                .with_sort_order(sort_order);
            if let Some(token) = continuation_token {
                params = params.with_continuation_token(token);
            }
            client.list_images(params).await?
        }
        Command::Stats => client.get_usage_statistics().await?,
        Command::Url { id, variant } => {
            println!("{}", client.delivery_url(&id, &variant));
            return Ok(());
        }
        Command::BatchToken => client.get_batch_token().await?,
    };

    let status = response.status();
    let body = response.text().await?;
    println!("{}", body);
    if !status.is_success() {
        anyhow::bail!("request failed with status {}", status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudflare_images=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let client = ImagesClient::new(credentials)?;

    match run(&client, args.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
