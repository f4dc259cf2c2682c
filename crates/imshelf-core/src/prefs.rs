//! User preferences persisted alongside the ledger

use crate::store::{KvStore, StoreError};

pub const THEME_KEY: &str = "theme";

/// Color theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Load the saved theme. Absent or unrecognized values fall back to
/// light. Accepts both the raw token and a JSON-quoted string.
pub fn load_theme(store: &dyn KvStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => match raw.trim().trim_matches('"') {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        },
        _ => Theme::Light,
    }
}

pub fn save_theme(store: &dyn KvStore, theme: Theme) -> Result<(), StoreError> {
    store.put(THEME_KEY, theme.as_str())
}
