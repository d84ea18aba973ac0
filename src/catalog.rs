use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

/// The preloaded set of movies available for recommendation
///
/// Validated on construction: non-empty, and every entry has a title and a
/// summary. Entry order is the position order used by the similarity index.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Validates and wraps a list of entries
    pub fn from_entries(entries: Vec<CatalogEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        for (position, entry) in entries.iter().enumerate() {
            entry.validate(position)?;
        }
        Ok(Self { entries })
    }

    /// Loads a JSON array of catalog entries from disk
    pub fn load<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Catalog(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_entries(entries)?;

        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            thumbnails = catalog.thumbnails().len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries in position order, ready for embedding
    pub fn summaries(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.summary.as_str()).collect()
    }

    /// Case-insensitive title membership
    pub fn contains_title(&self, title: &str) -> bool {
        let needle = title.trim().to_lowercase();
        self.entries
            .iter()
            .any(|entry| entry.title.trim().to_lowercase() == needle)
    }

    /// Thumbnail URLs of entries that have one, in catalog order
    pub fn thumbnails(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.thumbnail.as_deref())
            .collect()
    }
}
