use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use folio_cms::cms::CmsClient;
use folio_cms::config;
use folio_cms::handlers::{self, AppState};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override `app.listen_addr`
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let client = CmsClient::from_config(&cfg.cms).context("failed to set up CMS client")?;
    info!(?client, "cms client ready");
    let state = AppState::new(Arc::new(client), cfg.contact.form_id.clone());

    let addr = args.listen.unwrap_or_else(|| cfg.app.listen_addr.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, handlers::router(state)).await?;
    Ok(())
}
