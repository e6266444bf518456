//! Command-line front end for address resolution.
//!
//! Resolves addresses into political places and map items, refreshes stored
//! places, and browses the cached region tree. Results are printed as JSON on
//! stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use politicalplaces::config::Config;
use politicalplaces::{
    GeoType, GoogleGeocoder, MapItem, PlaceInput, PlaceStore, PoliticalPlace,
    PoliticalPlaceResolver,
};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve addresses into a hierarchy of political places")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Geocoding API key (falls back to GOOGLE_MAPS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Result language
    #[arg(long)]
    language: Option<String>,

    /// Database directory
    #[arg(long)]
    db: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get or create the political place for an address
    Address {
        address: String,

        /// Place id already chosen for this address
        #[arg(long)]
        place_id: Option<String>,

        /// "lat,lng" already chosen for this address
        #[arg(long)]
        geocode: Option<String>,
    },
    /// Resolve a single map item of a given level
    Item {
        address: String,

        /// country, administrative_area_level_1, locality, ...
        #[arg(long)]
        geo_type: String,
    },
    /// Resolve a single map item from a provider place id
    PlaceId { place_id: String },
    /// Geocode a stored place again and relink its items
    Refresh { id: u64 },
    /// Relink a stored place's items from its level names
    Relink { id: u64 },
    /// List every map item by URL
    Tree,
    /// Show the map item at a relative URL and its children
    Browse { url: String },
}

#[derive(Serialize)]
struct PlaceReport<'a> {
    place: &'a PoliticalPlace,
    items: Vec<MapItem>,
}

#[derive(Serialize)]
struct BrowseReport {
    item: MapItem,
    children: Vec<MapItem>,
}

fn init_logging(verbose: bool) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(key) = &args.api_key {
        config.geocoder.api_key = key.clone();
    } else if config.geocoder.api_key.is_empty() {
        if let Ok(key) = std::env::var("GOOGLE_MAPS_API_KEY") {
            config.geocoder.api_key = key;
        }
    }
    if let Some(language) = &args.language {
        config.geocoder.language = language.clone();
    }
    if let Some(db) = &args.db {
        config.store.path = db.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn place_items(store: &PlaceStore, place: &PoliticalPlace) -> Result<Vec<MapItem>> {
    let mut items = Vec::new();
    for level in GeoType::all() {
        if let Some(id) = place.item(*level) {
            if let Some(item) = store.map_item(id)? {
                items.push(item);
            }
        }
    }
    Ok(items)
}

fn print_place(store: &PlaceStore, place: &PoliticalPlace) -> Result<()> {
    print_json(&PlaceReport {
        place,
        items: place_items(store, place)?,
    })
}

fn stored_place(store: &PlaceStore, id: u64) -> Result<PoliticalPlace> {
    store
        .political_place(id)?
        .with_context(|| format!("No political place #{}", id))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = load_config(&args)?;
    let store = PlaceStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store at {}", config.store.path.display()))?;
    let geocoder = GoogleGeocoder::new(&config.geocoder).context("Failed to build geocoder")?;
    let resolver = PoliticalPlaceResolver::new(Arc::new(geocoder), store.clone());

    match args.command {
        Command::Address {
            address,
            place_id,
            geocode,
        } => {
            let input = PlaceInput {
                address,
                geocode,
                place_id,
            };
            let place = resolver.resolve_input(&input).await?;
            print_place(&store, &place)?;
        }
        Command::Item { address, geo_type } => {
            let geo_type: GeoType = geo_type.parse()?;
            let item = resolver
                .map_items()
                .update_or_create_from_address(&address, geo_type)
                .await?;
            print_json(&item)?;
        }
        Command::PlaceId { place_id } => {
            let item = resolver
                .map_items()
                .update_or_create_from_place_id(&place_id)
                .await?;
            print_json(&item)?;
        }
        Command::Refresh { id } => {
            let mut place = stored_place(&store, id)?;
            resolver.refresh_data(&mut place).await?;
            print_place(&store, &place)?;
        }
        Command::Relink { id } => {
            let mut place = stored_place(&store, id)?;
            resolver.link_map_items(&mut place).await?;
            store.save_place(&mut place)?;
            print_place(&store, &place)?;
        }
        Command::Tree => {
            let mut items = store.map_items()?;
            items.sort_by(|a, b| a.relative_url().cmp(&b.relative_url()));
            info!("{} map items", items.len());
            print_json(&items)?;
        }
        Command::Browse { url } => {
            let item = store
                .map_item_by_url(&url)?
                .with_context(|| format!("Nothing at {}", url))?;
            let children = store.children(item.id)?;
            print_json(&BrowseReport { item, children })?;
        }
    }

    store.flush()?;
    Ok(())
}
