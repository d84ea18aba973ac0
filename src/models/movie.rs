use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};

/// A movie in the local catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Display title
    pub title: String,
    /// Plot summary; this is what gets embedded
    pub summary: String,
    /// Genre names, compared case-sensitively
    #[serde(default)]
    pub genres: BTreeSet<String>,
    /// Poster thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl CatalogEntry {
    /// Creates a catalog entry without a thumbnail
    pub fn new<I, S>(title: impl Into<String>, summary: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            summary: summary.into(),
            genres: genres.into_iter().map(Into::into).collect(),
            thumbnail: None,
        }
    }

    /// Checks the fields that must be present before the entry can be embedded
    pub fn validate(&self, position: usize) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Catalog(format!(
                "entry {} has an empty title",
                position
            )));
        }
        if self.summary.trim().is_empty() {
            return Err(AppError::Catalog(format!(
                "entry {} ('{}') has an empty summary",
                position, self.title
            )));
        }
        if let Some(thumbnail) = &self.thumbnail {
            if thumbnail.trim().is_empty() {
                return Err(AppError::Catalog(format!(
                    "entry {} ('{}') has an empty thumbnail URL",
                    position, self.title
                )));
            }
        }
        Ok(())
    }
}

/// Movie metadata returned by a metadata provider for a user query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    /// Provider-specific movie ID
    pub id: u64,
    pub title: String,
    pub summary: String,
    /// Genre names in provider order
    pub genres: Vec<String>,
}

/// A title-search hit, used for suggestions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
}
