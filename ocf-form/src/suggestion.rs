//! Company suggestion lookup
//!
//! The controller only sees the [`SuggestionProvider`] trait. It awaits a
//! query and may abandon it at any time by dropping the future, so
//! implementations must tolerate cancellation at every await point.

use async_trait::async_trait;
use ocf_common::Suggestion;
use thiserror::Error;
use tracing::debug;

/// Lookup failure
///
/// The controller treats any failure as an empty result and never retries
/// on its own.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Suggestion source unavailable: {0}")]
    Unavailable(String),

    #[error("Suggestion lookup failed: {0}")]
    Failed(String),
}

/// Source of company name suggestions
///
/// May be called any number of times; results for different calls carry no
/// ordering guarantee. There is no timeout on the controller side: wrap the
/// provider if one is needed.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &'static str {
        "suggestion-provider"
    }

    async fn query(&self, text: &str) -> Result<Vec<Suggestion>, ProviderError>;
}

/// In-memory company catalog
///
/// Case-insensitive substring match on the company name. Queries of
/// `min_query_chars` characters or fewer return nothing.
#[derive(Debug, Clone)]
pub struct CatalogSuggestionProvider {
    companies: Vec<Suggestion>,
    min_query_chars: usize,
}

impl CatalogSuggestionProvider {
    pub fn new(companies: Vec<Suggestion>) -> Self {
        Self {
            companies,
            min_query_chars: 3,
        }
    }

    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    fn lookup(&self, text: &str) -> Vec<Suggestion> {
        if text.chars().count() <= self.min_query_chars {
            return Vec::new();
        }
        let needle = text.to_lowercase();
        self.companies
            .iter()
            .filter(|company| company.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Default for CatalogSuggestionProvider {
    fn default() -> Self {
        Self::new(vec![
            Suggestion::new(11, "PT Bank Nasional"),
            Suggestion::new(12, "PT Bank BACA"),
            Suggestion::new(13, "PT Bank Sendiri"),
            Suggestion::new(22, "PT Digital Solusi"),
            Suggestion::new(33, "PT Teknologi Nusantara"),
        ])
    }
}

#[async_trait]
impl SuggestionProvider for CatalogSuggestionProvider {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn query(&self, text: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let matches = self.lookup(text);
        debug!(query = text, matches = matches.len(), "Catalog lookup");
        Ok(matches)
    }
}
