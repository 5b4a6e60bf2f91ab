use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use ucp_works::abort::AbortController;
use ucp_works::app::catalog_loader::{LoadOutcome, RevealKind, WorkCatalogLoader};
use ucp_works::app::ports::AddressPort;
use ucp_works::app::share::{Notifier, ShareOutcome, ShareService};
use ucp_works::config::Config;
use ucp_works::constants::{FEATURED_COUNT, SHORT_EXCERPT_WORDS};
use ucp_works::domain::WorkItem;
use ucp_works::infra::address::InMemoryAddress;
use ucp_works::infra::host_share::{NoNativeShare, TerminalClipboard};
use ucp_works::infra::sanity_client::SanityClient;
use ucp_works::infra::session_store::FileSessionStore;
use ucp_works::render::blocks::{parse_blocks, render_text};
use ucp_works::render::render_works_page;
use ucp_works::{logging, observability};

#[derive(Parser)]
#[command(name = "ucp_works")]
#[command(about = "Browse and render the UCP marine works portfolio")]
#[command(version)]
struct Cli {
    /// Only show the session snapshot; skip the content store
    #[arg(long, global = true)]
    offline: bool,

    /// Print a Prometheus metrics snapshot before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List works, newest first
    List {
        /// Press "See more" this many times
        #[arg(long, default_value_t = 0)]
        more: usize,
    },
    /// Show the newest works, as featured on the home page
    Featured,
    /// Show one work in full
    Show { slug: String },
    /// Produce the shareable link for a work
    Share {
        slug: String,
        /// Write the link here instead of stdout
        #[arg(long)]
        clipboard_file: Option<PathBuf>,
    },
    /// Render the works page as HTML
    Render {
        /// Select a work, as the `?work=` parameter would
        #[arg(long)]
        work: Option<String>,
        /// Press "See more" this many times
        #[arg(long, default_value_t = 0)]
        more: usize,
        /// Press "Show more works" this many times
        #[arg(long, default_value_t = 0)]
        sidebar_more: usize,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn build_loader(config: &Config) -> anyhow::Result<(WorkCatalogLoader, Arc<InMemoryAddress>)> {
    let store = Arc::new(SanityClient::new(&config.content_store)?);
    let session = Arc::new(FileSessionStore::new(&config.site.session_dir));
    let address = Arc::new(InMemoryAddress::for_page(&config.site.origin, &config.site.catalog_path)?);
    let loader = WorkCatalogLoader::new(store, session, address.clone()).with_cache_key(config.site.cache_key.clone());
    Ok((loader, address))
}

/// Cached snapshot first, then revalidation. Ctrl-C aborts the fetch.
async fn load(loader: &mut WorkCatalogLoader, offline: bool) {
    if loader.hydrate_from_cache() {
        println!("📦 Showing {} cached works", loader.catalog().len());
    }
    if offline {
        return;
    }

    let controller = AbortController::new();
    let signal = controller.signal();
    let ctrl_c = tokio::spawn(controller.abort_on(tokio::signal::ctrl_c()));

    match loader.refresh(&signal).await {
        LoadOutcome::Fresh(n) => info!("Catalog refreshed with {} works", n),
        LoadOutcome::Failed => {
            if let Some(message) = loader.error() {
                println!("⚠️  {}", message);
            }
        }
        LoadOutcome::Aborted => warn!("Catalog fetch aborted"),
    }
    ctrl_c.abort();
}

/// `10 Jan 2024` for well-formed dates, the authored text otherwise.
fn display_date(work: &WorkItem) -> String {
    match work.parsed_date() {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => work.date.clone(),
    }
}

fn print_card(work: &WorkItem) {
    println!("• {} [{}] {}", work.title, work.category, display_date(work));
    println!("  {}", work.short_excerpt(SHORT_EXCERPT_WORDS));
    println!("  slug: {}", work.slug);
}

fn print_detail(work: &WorkItem) {
    println!("\n{}", work.title);
    println!("{} · {}", work.category, display_date(work));
    if let Some(duration) = &work.duration {
        println!("Duration: {}", duration);
    }
    if !work.excerpt.is_empty() {
        println!("\n{}", work.excerpt);
    }
    let details = render_text(&parse_blocks(&work.details));
    if !details.is_empty() {
        println!("\n{}", details);
    }
    if work.has_gallery() {
        println!("\nGallery:");
        for src in &work.images {
            println!("  {}", src);
        }
    }
    let description = render_text(&parse_blocks(&work.full_description));
    if !description.is_empty() {
        println!("\n{}", description);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let metrics_handle = if cli.metrics {
        Some(observability::metrics::init().map_err(|e| anyhow::anyhow!("{}", e))?)
    } else {
        None
    };

    let config = Config::load().context("loading configuration")?;
    let (mut loader, address) = build_loader(&config)?;

    match cli.command {
        Commands::List { more } => {
            load(&mut loader, cli.offline).await;
            for _ in 0..more {
                loader.reveal_more(RevealKind::Primary);
            }
            println!("\n🚢 Work Portfolio ({} of {})", loader.displayed_works().len(), loader.catalog().len());
            for work in loader.displayed_works() {
                print_card(work);
            }
            if loader.can_reveal_more(RevealKind::Primary) {
                println!("\n(use --more to see more)");
            }
        }
        Commands::Featured => {
            load(&mut loader, cli.offline).await;
            println!("\n⭐ Featured Works");
            for work in loader.featured(FEATURED_COUNT) {
                print_card(work);
            }
        }
        Commands::Show { slug } => {
            load(&mut loader, cli.offline).await;
            loader.select_item(&slug);
            match loader.selected() {
                Some(work) => print_detail(work),
                None => println!("❌ No work with slug '{}'", slug),
            }
            println!("\n{}:", loader.sidebar_heading());
            for work in loader.sidebar_works() {
                println!("  - {} ({})", work.title, work.date);
            }
        }
        Commands::Share { slug, clipboard_file } => {
            load(&mut loader, cli.offline).await;
            loader.select_item(&slug);
            let clipboard = match clipboard_file {
                Some(path) => TerminalClipboard::file(path),
                None => TerminalClipboard::stdout(),
            };
            let share = ShareService::new(
                Arc::new(NoNativeShare),
                Arc::new(clipboard),
                Notifier::default(),
                config.site.origin.clone(),
                config.site.catalog_path.clone(),
            );
            match share.share_item(loader.selected()).await {
                None => println!("❌ No work with slug '{}'", slug),
                Some(outcome) => {
                    if let Some(note) = share.notifier().current() {
                        let icon = if outcome == ShareOutcome::Failed { "❌" } else { "✅" };
                        println!("{} {}", icon, note.message);
                    }
                }
            }
        }
        Commands::Render { work, more, sidebar_more, out } => {
            load(&mut loader, cli.offline).await;
            if let Some(slug) = work {
                loader.select_item(&slug);
            }
            for _ in 0..more {
                loader.reveal_more(RevealKind::Primary);
            }
            for _ in 0..sidebar_more {
                loader.reveal_more(RevealKind::Sidebar);
            }
            let html = render_works_page(&loader, &config.site, None)?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, html).await?;
                    println!("✅ Wrote {} for {}", path.display(), address.href());
                }
                None => println!("{}", html),
            }
        }
    }

    if let Some(handle) = metrics_handle {
        println!("\n{}", handle.render());
    }
    Ok(())
}
