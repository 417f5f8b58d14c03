use crate::filters::{self, SortOrder};
use crate::models::{FavoriteEntry, MovieSummary};
use crate::storage::{self, KeyValueStore, FAVORITES_KEY};
use anyhow::anyhow;
use chrono::{DateTime, SubsecRound, Utc};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoritesSortKey {
    #[default]
    DateAdded,
    Title,
    Year,
}

impl FavoritesSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoritesSortKey::DateAdded => "dateAdded",
            FavoritesSortKey::Title => "title",
            FavoritesSortKey::Year => "year",
        }
    }

    /// Order used when this key is first selected.
    pub fn default_order(&self) -> SortOrder {
        match self {
            FavoritesSortKey::Title => SortOrder::Asc,
            FavoritesSortKey::DateAdded | FavoritesSortKey::Year => SortOrder::Desc,
        }
    }
}

impl FromStr for FavoritesSortKey {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dateAdded" | "date-added" | "date" => Ok(FavoritesSortKey::DateAdded),
            "title" => Ok(FavoritesSortKey::Title),
            "year" => Ok(FavoritesSortKey::Year),
            other => Err(anyhow!("unknown favorites sort '{}'", other)),
        }
    }
}

/// Favorites collection, written through to storage on every mutation.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    /// Loads the persisted collection; absent or corrupt data starts empty.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut entries: Vec<FavoriteEntry> =
            storage::load_json(storage.as_ref(), FAVORITES_KEY).unwrap_or_default();
        let before = entries.len();
        let mut seen = std::collections::HashSet::new();
        entries.retain(|e| seen.insert(e.movie.id.clone()));
        if entries.len() != before {
            warn!("Dropped {} duplicate stored favorites", before - entries.len());
        }
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.movie.id == id)
    }

    /// Returns false when the movie was already a favorite.
    pub fn add(&mut self, movie: MovieSummary) -> bool {
        self.add_at(movie, Utc::now())
    }

    pub fn add_at(&mut self, movie: MovieSummary, added_at: DateTime<Utc>) -> bool {
        if self.is_favorite(&movie.id) {
            return false;
        }
        info!("Adding '{}' ({}) to favorites", movie.title, movie.id);
        self.entries.push(FavoriteEntry {
            movie,
            // stored as epoch millis
            added_at: added_at.trunc_subsecs(3),
        });
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.movie.id != id);
        if self.entries.len() == before {
            return false;
        }
        info!("Removed {} from favorites", id);
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn list_sorted(&self, key: FavoritesSortKey, order: SortOrder) -> Vec<FavoriteEntry> {
        let mut list = self.entries.clone();
        list.sort_by(|a, b| {
            let ordering = match key {
                FavoritesSortKey::DateAdded => a.added_at.cmp(&b.added_at),
                FavoritesSortKey::Title => {
                    filters::compare_titles(&a.movie.title, &b.movie.title)
                }
                FavoritesSortKey::Year => a
                    .movie
                    .year_number()
                    .unwrap_or(0)
                    .cmp(&b.movie.year_number().unwrap_or(0)),
            };
            order.apply(ordering)
        });
        list
    }

    /// Like [`list_sorted`](Self::list_sorted) for a stored key name; an
    /// unknown name yields the collection in insertion order.
    pub fn list_sorted_named(&self, key: &str, order: SortOrder) -> Vec<FavoriteEntry> {
        match key.parse::<FavoritesSortKey>() {
            Ok(key) => self.list_sorted(key, order),
            Err(_) => self.entries.clone(),
        }
    }

    fn persist(&self) {
        if let Err(e) = storage::save_json(self.storage.as_ref(), FAVORITES_KEY, &self.entries) {
            warn!("Failed to persist favorites: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn movie(id: &str, title: &str, year: &str) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            poster_url: None,
            media_type: MediaType::Movie,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn ids(list: &[FavoriteEntry]) -> Vec<&str> {
        list.iter().map(|e| e.movie.id.as_str()).collect()
    }

    fn store_with_three() -> FavoritesStore {
        let mut store = FavoritesStore::load(Arc::new(MemoryStore::new()));
        store.add_at(movie("t1", "alien", "1979"), at(300));
        store.add_at(movie("t2", "Blade Runner", "1982"), at(100));
        store.add_at(movie("t3", "Arrival", "N/A"), at(200));
        store
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut store = FavoritesStore::load(Arc::new(MemoryStore::new()));
        assert!(store.add(movie("t1", "Alien", "1979")));
        let snapshot = store.entries().to_vec();
        assert!(!store.add(movie("t1", "Alien (renamed)", "1979")));
        assert_eq!(store.entries(), snapshot.as_slice());
    }

    #[test]
    fn remove_and_clear() {
        let mut store = store_with_three();
        assert!(store.remove("t2"));
        assert!(!store.remove("t2"));
        assert!(!store.is_favorite("t2"));
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn sorts_by_each_key() {
        let store = store_with_three();
        assert_eq!(
            ids(&store.list_sorted(FavoritesSortKey::DateAdded, SortOrder::Desc)),
            vec!["t1", "t3", "t2"]
        );
        assert_eq!(
            ids(&store.list_sorted(FavoritesSortKey::Title, SortOrder::Asc)),
            vec!["t1", "t3", "t2"]
        );
        assert_eq!(
            ids(&store.list_sorted(FavoritesSortKey::Year, SortOrder::Asc)),
            vec!["t3", "t1", "t2"]
        );
    }

    #[test]
    fn sorting_is_a_permutation() {
        let store = store_with_three();
        for key in [
            FavoritesSortKey::DateAdded,
            FavoritesSortKey::Title,
            FavoritesSortKey::Year,
        ] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let mut sorted = ids(&store.list_sorted(key, order))
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                sorted.sort();
                assert_eq!(sorted, vec!["t1", "t2", "t3"]);
            }
        }
    }

    #[test]
    fn unknown_sort_name_keeps_insertion_order() {
        let store = store_with_three();
        assert_eq!(
            ids(&store.list_sorted_named("rating", SortOrder::Asc)),
            vec!["t1", "t2", "t3"]
        );
        assert_eq!(
            ids(&store.list_sorted_named("year", SortOrder::Desc)),
            vec!["t2", "t1", "t3"]
        );
    }

    #[test]
    fn empty_store_sorts_to_empty() {
        let store = FavoritesStore::load(Arc::new(MemoryStore::new()));
        assert!(store
            .list_sorted(FavoritesSortKey::Title, SortOrder::Asc)
            .is_empty());
    }

    #[test]
    fn reload_yields_the_same_collection() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = FavoritesStore::load(storage.clone());
        store.add(movie("t1", "Alien", "1979"));
        store.add(movie("t2", "Heat", "1995"));
        let reloaded = FavoritesStore::load(storage);
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(FAVORITES_KEY, "[{\"movie\": 42}").unwrap();
        let store = FavoritesStore::load(storage);
        assert!(store.is_empty());
    }

    /// Reads succeed with nothing stored, every write fails.
    #[derive(Default)]
    struct ReadOnlyDisk {
        writes: AtomicUsize,
    }

    impl KeyValueStore for ReadOnlyDisk {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            self.writes.fetch_add(1, AtomicOrdering::SeqCst);
            Err(anyhow!("disk full"))
        }

        fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    #[test]
    fn failed_writes_keep_the_in_memory_change() {
        let disk = Arc::new(ReadOnlyDisk::default());
        let mut store = FavoritesStore::load(disk.clone());

        assert!(store.add(movie("t1", "Alien", "1979")));
        assert!(store.is_favorite("t1"));
        assert_eq!(disk.writes.load(AtomicOrdering::SeqCst), 1);

        store.add(movie("t2", "Heat", "1995"));
        assert!(store.remove("t1"));
        assert!(!store.is_favorite("t1"));
        assert_eq!(ids(store.entries()), vec!["t2"]);

        store.clear();
        assert!(store.is_empty());
        // one attempt per mutation, never retried
        assert_eq!(disk.writes.load(AtomicOrdering::SeqCst), 4);
    }
}
