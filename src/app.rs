//! Wiring of client, stores and session, plus the terminal rendering of
//! their state.
use crate::config::Config;
use crate::errors::CategorizedError;
use crate::favorites::{FavoritesSortKey, FavoritesStore};
use crate::filters::{self, ListFilter, SortOrder};
use crate::history::SearchHistory;
use crate::models::{FavoriteEntry, MetascoreBand, MovieDetail, MovieSummary};
use crate::omdb::{MovieDirectory, OmdbClient};
use crate::pagination::{self, PageItem};
use crate::preferences::{Preferences, Theme};
use crate::session::{SearchSession, SearchStatus};
use crate::storage::{FileStore, KeyValueStore};
use anyhow::{bail, Result};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

pub const MIN_QUERY_LEN: usize = 3;
const PAGE_SIBLINGS: u32 = 1;

pub struct App {
    directory: Option<Arc<dyn MovieDirectory>>,
    pub favorites: FavoritesStore,
    pub history: SearchHistory,
    pub preferences: Preferences,
    pub session: SearchSession,
}

impl App {
    pub fn new(directory: Arc<dyn MovieDirectory>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_parts(Some(directory), storage)
    }

    /// Favorites, history and preferences only. Directory lookups fail.
    pub fn local(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_parts(None, storage)
    }

    fn with_parts(
        directory: Option<Arc<dyn MovieDirectory>>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            directory,
            favorites: FavoritesStore::load(storage.clone()),
            history: SearchHistory::load(storage.clone()),
            preferences: Preferences::new(storage),
            session: SearchSession::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = Arc::new(FileStore::open(&config.data_dir)?);
        info!("Using data directory {}", storage.dir().display());
        if config.api_key.is_none() {
            debug!("No OMDb key configured, directory lookups disabled");
            return Ok(Self::local(storage));
        }
        let directory = Arc::new(OmdbClient::from_config(config)?);
        Ok(Self::new(directory, storage))
    }

    fn directory(&self) -> Result<Arc<dyn MovieDirectory>> {
        match &self.directory {
            Some(directory) => Ok(directory.clone()),
            None => bail!("OMDB_API_KEY not set; searching and fetching details need an OMDb key"),
        }
    }

    /// Run a search and render the filtered page, or the categorized failure.
    pub async fn search(&mut self, query: &str, page: u32, filter: &ListFilter) -> Result<String> {
        let query = validate_query(query)?;
        let directory = self.directory()?;
        self.history.record(query);
        self.session.run_search(directory.as_ref(), query, page).await;
        Ok(self.render_session(filter))
    }

    pub async fn details(&self, id: &str) -> Result<String> {
        match self.directory()?.details(id.trim()).await {
            Ok(detail) => Ok(render_detail(&detail, self.favorites.is_favorite(id.trim()))),
            Err(e) => Ok(render_error(&e)),
        }
    }

    pub async fn add_favorite(&mut self, id: &str) -> Result<String> {
        let id = id.trim();
        if self.favorites.is_favorite(id) {
            return Ok(format!("{id} is already in your favorites."));
        }
        let cached = self.session.results().iter().find(|m| m.id == id).cloned();
        let movie = match cached {
            Some(movie) => movie,
            None => match self.directory()?.details(id).await {
                Ok(detail) => detail.summary,
                Err(e) => return Ok(render_error(&e)),
            },
        };
        let line = format!("Added {} to favorites.", describe(&movie));
        self.favorites.add(movie);
        Ok(line)
    }

    pub fn remove_favorite(&mut self, id: &str) -> String {
        if self.favorites.remove(id.trim()) {
            format!("Removed {} from favorites.", id.trim())
        } else {
            format!("{} is not in your favorites.", id.trim())
        }
    }

    pub fn clear_favorites(&mut self) -> String {
        let count = self.favorites.len();
        self.favorites.clear();
        format!("Cleared {count} favorites.")
    }

    /// List favorites. An explicit sort is remembered for later listings.
    pub fn list_favorites(
        &self,
        key: Option<FavoritesSortKey>,
        order: Option<SortOrder>,
    ) -> Result<String> {
        let entries = match key {
            Some(key) => {
                let order = order.unwrap_or_else(|| key.default_order());
                self.preferences.set_favorites_sort(key, order)?;
                self.favorites.list_sorted(key, order)
            }
            None => {
                let (stored_key, stored_order) = self.preferences.favorites_sort();
                self.favorites
                    .list_sorted_named(&stored_key, order.unwrap_or(stored_order))
            }
        };
        Ok(render_favorites(&entries))
    }

    pub fn history(&self) -> String {
        if self.history.entries().is_empty() {
            return "No recent searches.".to_string();
        }
        self.history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        self.preferences.toggle_theme()
    }

    pub fn render_session(&self, filter: &ListFilter) -> String {
        match self.session.status() {
            SearchStatus::Idle => "Search for a movie to get started.".to_string(),
            SearchStatus::Loading => "Searching...".to_string(),
            SearchStatus::Error => self
                .session
                .error()
                .map(render_error)
                .unwrap_or_else(|| "Search failed.".to_string()),
            SearchStatus::Success => {
                let shown = filters::apply(self.session.results(), filter);
                let mut out = String::new();
                for movie in &shown {
                    let star = if self.favorites.is_favorite(&movie.id) { "*" } else { " " };
                    let _ = writeln!(out, "{star} {}  {}", movie.id, describe(movie));
                }
                if shown.len() != self.session.results().len() {
                    let _ = writeln!(
                        out,
                        "({} of {} on this page match the filters)",
                        shown.len(),
                        self.session.results().len()
                    );
                }
                let page = self.session.page();
                out.push_str(&render_pagination(
                    page,
                    self.session.total_pages(),
                    self.session.total_results(),
                ));
                let mut nav = Vec::new();
                if self.session.has_previous() {
                    nav.push(format!("--page {} for the previous page", page - 1));
                }
                if self.session.has_next() {
                    nav.push(format!("--page {} for the next page", page + 1));
                }
                if !nav.is_empty() {
                    let _ = writeln!(out, "Use {}.", nav.join(", "));
                }
                out
            }
        }
    }
}

/// Queries shorter than [`MIN_QUERY_LEN`] characters never reach the directory.
pub fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        bail!("Please enter at least {MIN_QUERY_LEN} characters to search.");
    }
    Ok(query)
}

fn describe(movie: &MovieSummary) -> String {
    format!("{} ({}) [{}]", movie.title, movie.year, movie.media_type)
}

pub fn render_error(err: &CategorizedError) -> String {
    let mut out = format!("{}\n{}\n", err.title(), err.message);
    for s in &err.suggestions {
        let _ = writeln!(out, "  - {s}");
    }
    if err.is_retryable() {
        out.push_str("Run the command again to retry.\n");
    }
    out
}

fn render_pagination(page: u32, total_pages: u32, total_results: u32) -> String {
    let mut out = String::new();
    if let Some((start, end)) = pagination::result_range(page, total_results) {
        let _ = writeln!(out, "Showing {start}-{end} of {total_results} results");
    }
    if total_pages > 1 {
        let buttons: Vec<String> = pagination::page_window(page, total_pages, PAGE_SIBLINGS)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(p) if p == page => format!("[{p}]"),
                PageItem::Page(p) => p.to_string(),
                PageItem::Gap => "...".to_string(),
            })
            .collect();
        let _ = writeln!(out, "Pages: {}", buttons.join(" "));
    }
    out
}

pub fn render_detail(detail: &MovieDetail, favorite: bool) -> String {
    let mut out = String::new();
    let heart = if favorite { " *" } else { "" };
    let _ = writeln!(out, "{}{}", describe(&detail.summary), heart);
    let genres = detail.genres();
    if !genres.is_empty() {
        let _ = writeln!(out, "Genres: {}", genres.join(" | "));
    }
    let fields = [
        ("Rated", detail.rated.as_deref()),
        ("Released", detail.released.as_deref()),
        ("Director", detail.director.as_deref()),
        ("Writer", detail.writer.as_deref()),
        ("Country", detail.country.as_deref()),
        ("Language", detail.language.as_deref()),
        ("Box office", detail.box_office.as_deref()),
        ("Production", detail.production.as_deref()),
        ("Awards", detail.awards.as_deref()),
    ];
    if let Some(minutes) = detail.runtime_minutes() {
        let _ = writeln!(out, "Runtime: {}h {:02}m", minutes / 60, minutes % 60);
    }
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
    let actors = detail.actors_list();
    if !actors.is_empty() {
        let _ = writeln!(out, "Cast: {}", actors.join(", "));
    }
    if let Some(rating) = detail.imdb_rating.as_deref() {
        let votes = detail
            .imdb_votes
            .as_deref()
            .map(|v| format!(" ({v} votes)"))
            .unwrap_or_default();
        let _ = writeln!(out, "IMDb: {rating}/10{votes}");
    }
    if let Some((pct, fresh)) = detail.rotten_tomatoes() {
        let verdict = if fresh { "fresh" } else { "rotten" };
        let _ = writeln!(out, "Rotten Tomatoes: {pct}% ({verdict})");
    }
    if let (Some(score), Some(band)) = (detail.metascore.as_deref(), detail.metascore_band()) {
        let label = match band {
            MetascoreBand::Favorable => "favorable",
            MetascoreBand::Mixed => "mixed",
            MetascoreBand::Unfavorable => "unfavorable",
        };
        let _ = writeln!(out, "Metacritic: {score} ({label})");
    }
    if let Some(plot) = detail.plot.as_deref() {
        let _ = writeln!(out, "\n{plot}");
    }
    out
}

fn render_favorites(entries: &[FavoriteEntry]) -> String {
    if entries.is_empty() {
        return "No favorites yet. Add one with `favorites add <imdb id>`.".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{}  {}  added {}",
                e.movie.id,
                describe(&e.movie),
                e.added_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
