mod output;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use pocadex_core::config::AppConfig;
use pocadex_core::import::import_directory;
use pocadex_core::models::{
    Condition, NewPhotocard, NewUserPhotocard, PhotocardFilter, UserPhotocardUpdate,
};
use pocadex_core::storage::Storage;
use pocadex_parse::{Category, Member, ReleaseStructure, ReleaseType, Version};
use tracing_subscriber::EnvFilter;

use crate::output::{DecodeOutcome, Printer};

#[derive(Parser)]
#[command(name = "pocadex", version, about = "Photocard catalog and collection manager")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview what a card file name decodes to
    Decode {
        #[arg(required = true)]
        filenames: Vec<String>,
    },

    /// Add one card to the catalog, optionally correcting decoded fields
    Create {
        filename: String,

        /// Catalog image URL
        #[arg(long)]
        image_url: String,

        #[arg(long)]
        album_name: Option<String>,

        #[arg(long, conflicts_with = "no_store")]
        store: Option<String>,

        /// Clear the decoded store
        #[arg(long)]
        no_store: bool,

        #[arg(long)]
        version: Option<Version>,

        #[arg(long)]
        member: Option<Member>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Decode every image in a directory and add it to the catalog
    Import {
        dir: PathBuf,

        /// Prefix for catalog image URLs (defaults to config)
        #[arg(long)]
        image_base_url: Option<String>,

        /// Only look at the top level of DIR
        #[arg(long)]
        no_recursive: bool,
    },

    /// Search the catalog
    Catalog {
        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        release_type: Option<ReleaseType>,

        #[arg(long)]
        release_structure: Option<ReleaseStructure>,

        #[arg(long)]
        member: Option<Member>,

        #[arg(long)]
        version: Option<Version>,

        /// Album name substring
        #[arg(long)]
        album: Option<String>,

        /// Store substring
        #[arg(long)]
        store: Option<String>,
    },

    /// Manage a user's collection
    Collection {
        /// Collection owner (defaults to general.default_user)
        #[arg(long)]
        user: Option<String>,

        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// Add a catalog card to the collection
    Add {
        photocard_id: i64,

        /// Your own photo of the card
        #[arg(long)]
        image_url: String,

        #[arg(long)]
        condition: Option<Condition>,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long)]
        acquired: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List the collection, newest first
    List,

    /// Show one collection entry
    Show { id: i64 },

    /// Change condition, acquisition date or notes
    Update {
        id: i64,

        #[arg(long)]
        condition: Option<Condition>,

        /// Acquisition date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_acquired")]
        acquired: Option<NaiveDate>,

        #[arg(long)]
        clear_acquired: bool,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long)]
        clear_notes: bool,
    },

    /// Remove an entry from the collection
    Remove { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load config")?;

    let out = Printer::new(cli.json);

    match cli.command {
        Commands::Decode { filenames } => {
            let outcomes: Vec<DecodeOutcome> = filenames
                .iter()
                .map(|name| DecodeOutcome::new(name, pocadex_parse::decode(name)))
                .collect();
            out.decode_outcomes(&outcomes)?;

            let failed = outcomes.iter().filter(|o| o.is_error()).count();
            if failed > 0 {
                bail!("{failed} of {} filenames could not be decoded", outcomes.len());
            }
        }

        Commands::Create {
            filename,
            image_url,
            album_name,
            store,
            no_store,
            version,
            member,
            category,
        } => {
            let mut card = NewPhotocard::decode(&filename, image_url)
                .with_context(|| format!("Failed to decode {filename:?}"))?;
            if let Some(album_name) = album_name {
                card.album_name = album_name;
            }
            if no_store {
                card.store = None;
            } else if let Some(store) = store {
                card.store = Some(store);
            }
            if let Some(version) = version {
                card.version = version;
            }
            if let Some(member) = member {
                card.member = member;
            }
            if let Some(category) = category {
                card.category = category;
            }
            card.rederive();

            let db = open_storage(cli.db_path)?;
            let created = db.create_photocard(&card).context("Failed to create photocard")?;
            out.photocards(std::slice::from_ref(&created), "")?;
        }

        Commands::Import {
            dir,
            image_base_url,
            no_recursive,
        } => {
            let mut import = config.import.clone();
            if image_base_url.is_some() {
                import.image_base_url = image_base_url;
            }
            if no_recursive {
                import.recursive = false;
            }

            let db = open_storage(cli.db_path)?;
            let report = import_directory(&db, &dir, &import)
                .with_context(|| format!("Import of {} failed", dir.display()))?;
            out.import_report(&report)?;
        }

        Commands::Catalog {
            category,
            release_type,
            release_structure,
            member,
            version,
            album,
            store,
        } => {
            let filter = PhotocardFilter {
                category,
                release_type,
                release_structure,
                member,
                version,
                album_name: album,
                store,
            };
            let db = open_storage(cli.db_path)?;
            let cards = db.list_photocards(&filter).context("Catalog query failed")?;
            out.photocards(&cards, empty_catalog_message(&filter))?;
        }

        Commands::Collection { user, action } => {
            let user = user.unwrap_or(config.general.default_user);
            let db = open_storage(cli.db_path)?;
            run_collection(&db, &out, &user, action)?;
        }
    }

    Ok(())
}

fn run_collection(db: &Storage, out: &Printer, user: &str, action: CollectionAction) -> Result<()> {
    match action {
        CollectionAction::Add {
            photocard_id,
            image_url,
            condition,
            acquired,
            notes,
        } => {
            let input = NewUserPhotocard {
                condition: condition.unwrap_or_default(),
                acquired_date: acquired.map(start_of_day),
                notes,
                ..NewUserPhotocard::new(user, photocard_id, image_url)
            };
            let entry = db.add_to_collection(&input).context("Failed to add to collection")?;
            out.collection_entry(&entry)?;
        }

        CollectionAction::List => {
            let rows = db.get_user_collection(user)?;
            out.collection(&rows)?;
        }

        CollectionAction::Show { id } => {
            let Some(row) = db.get_user_photocard(id, user)? else {
                bail!("Collection entry {id} not found for user {user:?}");
            };
            out.collection(std::slice::from_ref(&row))?;
        }

        CollectionAction::Update {
            id,
            condition,
            acquired,
            clear_acquired,
            notes,
            clear_notes,
        } => {
            let update = UserPhotocardUpdate {
                condition,
                acquired_date: if clear_acquired {
                    Some(None)
                } else {
                    acquired.map(|d| Some(start_of_day(d)))
                },
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
                ..UserPhotocardUpdate::new(id, user)
            };
            let entry = db.update_user_photocard(&update).context("Update failed")?;
            out.collection_entry(&entry)?;
        }

        CollectionAction::Remove { id } => {
            if !db.remove_from_collection(id, user)? {
                bail!("Collection entry {id} not found for user {user:?}");
            }
            out.message(&format!("Removed collection entry {id}"))?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pocadex_parse={level},pocadex_core={level},pocadex_cli={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve database path: CLI > platform data dir.
fn open_storage(db_path: Option<PathBuf>) -> Result<Storage> {
    let path = db_path.unwrap_or_else(AppConfig::db_path);
    AppConfig::ensure_parent(&path)?;
    tracing::info!(path = %path.display(), "Opening database");
    Storage::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn empty_catalog_message(filter: &PhotocardFilter) -> &'static str {
    if filter.is_empty() {
        "Catalog is empty."
    } else {
        "No photocards match the filter."
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
