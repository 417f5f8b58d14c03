use anyhow::Result;
use cinesearch::app::App;
use cinesearch::config::Config;
use cinesearch::favorites::FavoritesSortKey;
use cinesearch::filters::{ListFilter, ListSortKey, SortOrder, TypeFilter};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cinesearch", about = "Search OMDb and keep a list of favorite movies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search movies by title
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// all, movie, series or episode
        #[arg(long = "type", default_value = "all")]
        media_type: TypeFilter,
        #[arg(long)]
        year_from: Option<i32>,
        #[arg(long)]
        year_to: Option<i32>,
        /// year or title
        #[arg(long, default_value = "year")]
        sort: ListSortKey,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },
    /// Show full details for an IMDb id
    Details { id: String },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Show recent searches
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Show or toggle the theme preference
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites (dateAdded, title or year)
    List {
        #[arg(long)]
        sort: Option<FavoritesSortKey>,
        #[arg(long)]
        order: Option<SortOrder>,
    },
    Add { id: String },
    Remove { id: String },
    Clear,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let mut app = App::from_config(&config)?;

    let output = match cli.command {
        Command::Search {
            query,
            page,
            media_type,
            year_from,
            year_to,
            sort,
            order,
        } => {
            let filter = ListFilter {
                media_type,
                year_from,
                year_to,
                sort_by: sort,
                order,
            };
            app.search(&query, page, &filter).await?
        }
        Command::Details { id } => app.details(&id).await?,
        Command::Favorites { action } => match action {
            FavoritesAction::List { sort, order } => app.list_favorites(sort, order)?,
            FavoritesAction::Add { id } => app.add_favorite(&id).await?,
            FavoritesAction::Remove { id } => app.remove_favorite(&id),
            FavoritesAction::Clear => app.clear_favorites(),
        },
        Command::History { clear } => {
            if clear {
                app.history.clear();
                "Search history cleared.".to_string()
            } else {
                app.history()
            }
        }
        Command::Theme { toggle } => {
            let theme = if toggle {
                app.toggle_theme()?
            } else {
                app.preferences.theme()
            };
            format!("Theme: {theme}")
        }
    };
    println!("{}", output.trim_end());
    Ok(())
}
