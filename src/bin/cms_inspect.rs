use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use folio_cms::cms::CmsClient;
use folio_cms::{config, content, menu};

#[derive(Parser, Debug)]
#[command(about = "Print what the adapter maps out of the configured CMS")]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List pages that have a slug
    Pages,
    /// Show one page
    Page { slug: String },
    /// List projects that have a slug
    Projects,
    /// Show one project with its gallery
    Project { slug: String },
    /// Show a navigation menu (defaults to `cms.menu_id`)
    Menu { menu_id: Option<String> },
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let client = CmsClient::from_config(&cfg.cms)?;

    match args.command {
        Command::Pages => print(&content::fetch_all_pages(&client).await?),
        Command::Page { slug } => {
            let page = content::fetch_page_by_slug(&client, &slug)
                .await?
                .with_context(|| format!("no page with slug '{}'", slug))?;
            print(&page)
        }
        Command::Projects => print(&content::fetch_projects(&client).await?),
        Command::Project { slug } => {
            let project = content::fetch_project_by_slug(&client, &slug)
                .await?
                .with_context(|| format!("no project with slug '{}'", slug))?;
            print(&project)
        }
        Command::Menu { menu_id } => {
            let menu_id = menu_id.unwrap_or_else(|| cfg.cms.menu_id.clone());
            print(&menu::fetch_menu(&client, &menu_id).await)
        }
    }
}
