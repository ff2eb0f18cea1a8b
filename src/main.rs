//! winevino: supermarket wine catalog browser.
//!
//! Single-binary Tokio application that:
//! 1. Loads the published wine list, reusing a cached copy for a day
//! 2. Merges in the user's own ratings, pairings, and notes
//! 3. Filters, sorts, and pages the list for display
//! 4. Edits the local ratings and notes

mod config;

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use catalog_client::{HttpWineFetcher, LoadOrigin};
use common::config::Variant;
use common::{pairing_emoji, EnrichedWine, Error, FileStore, KeyValueStore};
use pipeline::{AnnotationUpdate, Catalog, CatalogView, SortKey, ViewState};

/// Wine catalog browser
#[derive(Parser)]
#[command(name = "winevino", about = "Browse and annotate the supermarket wine catalog")]
struct Cli {
    /// Front-end variant whose data file and link scheme to use.
    #[arg(long, global = true, value_parser = config::parse_variant)]
    variant: Option<Variant>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the catalog, served from cache when it is fresh.
    List(ViewArgs),
    /// Drop the cached list, fetch it again, and show it.
    Refresh(ViewArgs),
    /// Rate a wine 1-5; 0 clears the rating.
    Rate {
        name: String,
        #[arg(allow_negative_numbers = true)]
        score: i64,
    },
    /// Edit a wine's pairings and notes.
    Annotate {
        name: String,
        /// Pairing tag; repeat to set several. Replaces the current tags.
        #[arg(long = "pairing")]
        pairings: Vec<String>,
        /// Remove every pairing tag.
        #[arg(long, conflicts_with = "pairings")]
        clear_pairings: bool,
        #[arg(long)]
        description: Option<String>,
    },
    /// Print the detail page URL for a wine.
    Link { name: String },
    /// Forget local data.
    Reset {
        #[arg(value_enum)]
        scope: ResetScope,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetScope {
    /// Personal ratings only.
    Ratings,
    /// Pairings and notes only.
    Notes,
    /// Everything, cached wine list included.
    All,
}

#[derive(Args)]
struct ViewArgs {
    /// Case-insensitive match on name, type, or store.
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long = "type", default_value = pipeline::engine::ALL)]
    wine_type: String,
    #[arg(long)]
    pairing: Option<String>,
    #[arg(long, default_value = pipeline::engine::ALL)]
    store: String,
    /// score, price-low, price-high, or personal-score; anything else keeps
    /// payload order.
    #[arg(long, default_value = "score")]
    sort: String,
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Print the page as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn state(&self) -> ViewState {
        ViewState {
            search: self.search.clone(),
            wine_type: self.wine_type.clone(),
            pairing: self.pairing.clone(),
            store: self.store.clone(),
            sort: SortKey::parse(&self.sort),
            page: self.page,
        }
    }
}

fn format_row(wine: &EnrichedWine) -> String {
    let r = &wine.record;
    let score = r.vivino_score.as_deref().unwrap_or("-");
    let personal = if wine.personal_score > 0 {
        format!("{}/5", wine.personal_score)
    } else {
        "-".to_string()
    };
    let pairings = r
        .pairings
        .iter()
        .flatten()
        .map(|tag| pairing_emoji(tag).unwrap_or(tag.as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{:<40} {:<10} {:<14} €{:>7}  vivino {:>4}  mine {:>3}  {}",
        r.name, r.wine_type, r.store, r.price, score, personal, pairings
    )
}

fn print_view(view: &CatalogView, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&view.wines)?);
        return Ok(());
    }

    for wine in &view.wines {
        println!("{}", format_row(wine));
    }
    let source = match view.origin {
        LoadOrigin::Cache => "cache",
        LoadOrigin::Network => "network",
    };
    println!(
        "{} wines, page {}/{}{} ({})",
        view.matched,
        view.page,
        view.page_count,
        if view.has_more { ", more available" } else { "" },
        source
    );
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Error> {
    let cfg = config::load_config(cli.variant)?;
    info!(
        "Variant {:?}, data from {} (cache {}s)",
        cfg.variant, cfg.data_url, cfg.cache_duration_secs
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&cfg.storage_path)?);
    let fetcher = HttpWineFetcher::new(&cfg)?;
    let catalog = Catalog::new(cfg, fetcher, store);

    match cli.command {
        Command::List(args) => {
            let view = catalog.view(&args.state(), Utc::now()).await;
            show(view, args.json)
        }
        Command::Refresh(args) => {
            let view = catalog.refresh(&args.state(), Utc::now()).await;
            show(view, args.json)
        }
        Command::Rate { name, score } => {
            catalog.annotations().set_personal_score(&name, score)?;
            println!("Rated {:?}: {}/5", name, score);
            Ok(())
        }
        Command::Annotate {
            name,
            pairings,
            clear_pairings,
            description,
        } => {
            let pairings = if clear_pairings {
                Some(Vec::new())
            } else if pairings.is_empty() {
                None
            } else {
                Some(pairings)
            };
            let updated = catalog
                .annotations()
                .update_annotation(&name, AnnotationUpdate { pairings, description })?;
            println!(
                "{:?}: pairings [{}], notes {:?}",
                name,
                updated.pairings.join(", "),
                updated.description
            );
            Ok(())
        }
        Command::Link { name } => {
            println!("{}", catalog.detail_url(&name)?);
            Ok(())
        }
        Command::Reset { scope } => match scope {
            ResetScope::Ratings => catalog.annotations().reset_ratings(),
            ResetScope::Notes => catalog.annotations().reset_notes(),
            ResetScope::All => catalog.annotations().factory_reset(),
        },
    }
}

fn show(view: Result<CatalogView, Error>, json: bool) -> Result<(), Error> {
    match view {
        Ok(view) => print_view(&view, json),
        // Another load owns the cache; its result wins.
        Err(Error::LoadInFlight) => {
            warn!("Catalog load already in progress, skipping");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "winevino=info,catalog_client=info,pipeline=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e.is_network() {
            error!("Catalog fetch failed, cached data left untouched: {}", e);
        } else {
            error!("{}", e);
        }
        std::process::exit(1);
    }
}
