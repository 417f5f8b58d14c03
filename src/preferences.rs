use crate::favorites::FavoritesSortKey;
use crate::filters::SortOrder;
use crate::storage::{
    self, KeyValueStore, FAVORITES_SORT_BY_KEY, FAVORITES_SORT_ORDER_KEY, THEME_KEY,
};
use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(anyhow!("theme must be 'dark' or 'light'")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain-string preferences. Unreadable values fall back to defaults.
pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn theme(&self) -> Theme {
        self.read(THEME_KEY).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Stored favorites sort as the raw key name plus order.
    pub fn favorites_sort(&self) -> (String, SortOrder) {
        let key = storage::load_string(self.storage.as_ref(), FAVORITES_SORT_BY_KEY)
            .unwrap_or_else(|| FavoritesSortKey::default().as_str().to_string());
        let order = self.read(FAVORITES_SORT_ORDER_KEY).unwrap_or_default();
        (key, order)
    }

    pub fn set_favorites_sort(&self, key: FavoritesSortKey, order: SortOrder) -> Result<()> {
        self.storage.set(FAVORITES_SORT_BY_KEY, key.as_str())?;
        self.storage.set(FAVORITES_SORT_ORDER_KEY, order.as_str())
    }

    fn read<T: FromStr>(&self, key: &str) -> Option<T> {
        storage::load_string(self.storage.as_ref(), key).and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn theme_defaults_to_dark_and_toggles() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn malformed_values_fall_back() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(THEME_KEY, "sepia").unwrap();
        storage.set(FAVORITES_SORT_ORDER_KEY, "sideways").unwrap();
        let prefs = Preferences::new(storage);
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.favorites_sort(), ("dateAdded".to_string(), SortOrder::Desc));
    }

    #[test]
    fn favorites_sort_round_trips() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        prefs
            .set_favorites_sort(FavoritesSortKey::Title, SortOrder::Asc)
            .unwrap();
        assert_eq!(prefs.favorites_sort(), ("title".to_string(), SortOrder::Asc));
    }
}
