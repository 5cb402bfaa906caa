mod backend_bridge;
mod controller;
mod ui;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, DraftField, FormController, HttpBookApi, ListController, Settings,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Browse and add books in a remote catalog")]
struct Cli {
    /// Base URL of the catalog API; overrides bookshelf.toml and APP__API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the book list.
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Submit a new book.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        publish_date: String,
        #[arg(long)]
        price: String,
    },
    /// Interactive list/search/add session.
    Shell,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }

    match cli.command {
        Command::Shell => ui::shell::run(settings),
        Command::List { search, page } => block_on(list_once(settings, search, page)),
        Command::Add {
            name,
            description,
            publish_date,
            price,
        } => block_on(add_once(
            settings,
            [
                (DraftField::Name, name),
                (DraftField::Description, description),
                (DraftField::PublishDate, publish_date),
                (DraftField::Price, price),
            ],
        )),
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(future)
}

async fn list_once(settings: Settings, search: String, page: u32) -> Result<()> {
    if page == 0 {
        bail!("--page starts at 1");
    }
    let api = HttpBookApi::new(&settings).context("failed to build book API client")?;
    let list = ListController::new(Arc::new(api), settings.page_size);

    let snapshot = list.set_query(search, page - 1).await;
    if let Some(error) = snapshot.error {
        bail!(error);
    }
    println!("{}", ui::table::render_snapshot(&snapshot));
    Ok(())
}

async fn add_once(settings: Settings, fields: [(DraftField, String); 4]) -> Result<()> {
    let api = HttpBookApi::new(&settings).context("failed to build book API client")?;
    let mut form = FormController::new(Arc::new(api), || {
        tracing::debug!("book created; no list view to refresh");
    });

    for (field, value) in fields {
        form.set_field(field, &value)
            .with_context(|| format!("invalid {field}"))?;
    }

    if form.submit().await.is_err() {
        let message = form.draft().error.clone().unwrap_or_default();
        bail!(message);
    }
    println!("Book added successfully");
    Ok(())
}
