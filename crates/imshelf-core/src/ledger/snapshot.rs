//! Backup document parsing for favorites import

use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// The payload is not shaped like an export document. Nothing was
    /// applied.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a favorites import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportReport {
    /// Favorites newly added by the merge.
    pub added: usize,
    /// Favorites after the merge.
    pub total: usize,
}

/// Accept the export document or any JSON object carrying a `favorites`
/// array of strings. Anything else is invalid; validation happens before
/// any entry is applied.
pub(crate) fn parse_favorites(json: &str) -> Result<Vec<String>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ImportError::InvalidFormat(format!("not JSON: {}", e)))?;

    let favorites = value
        .get("favorites")
        .and_then(|f| f.as_array())
        .ok_or_else(|| ImportError::InvalidFormat("expected a favorites array".to_string()))?;

    favorites
        .iter()
        .map(|entry| {
            entry.as_str().map(str::to_string).ok_or_else(|| {
                ImportError::InvalidFormat("favorites entries must be strings".to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_export_document() {
        let json = r#"{"favorites": ["gut-1", "gbook-a"], "counts": {}, "progress": {}}"#;
        let favorites = parse_favorites(json).unwrap();
        assert_eq!(favorites, vec!["gut-1", "gbook-a"]);
    }

    #[test]
    fn test_parse_bare_favorites_object() {
        let json = r#"{"favorites": []}"#;
        assert!(parse_favorites(json).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_missing_favorites() {
        assert!(matches!(
            parse_favorites(r#"{"counts": {}}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_array_favorites() {
        assert!(matches!(
            parse_favorites(r#"{"favorites": "gut-1"}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_string_entries() {
        assert!(matches!(
            parse_favorites(r#"{"favorites": ["gut-1", 7]}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(
            parse_favorites("favorites: gut-1"),
            Err(ImportError::InvalidFormat(_))
        ));
    }
}
