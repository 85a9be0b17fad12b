//! Search tool implementation
//!
//! Runs the matcher over the current catalog snapshot and truncates to the
//! display limit.

use crate::catalog::Product;
use crate::cli::SearchArgs;
use crate::error::AppError;
use crate::search::SearchMatch;
use crate::state::AppState;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

/// One search result as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub category: String,
    pub product: Product,
    pub matched_keyword: String,
    pub similarity: f64,
}

impl From<SearchMatch<'_>> for SearchHit {
    fn from(m: SearchMatch<'_>) -> Self {
        Self {
            category: m.category.to_string(),
            product: m.product.clone(),
            matched_keyword: m.matched_keyword,
            similarity: m.similarity,
        }
    }
}

/// Shared implementation for search (used by HTTP and CLI)
pub fn execute_search(state: &AppState, args: &SearchArgs) -> Result<Vec<SearchHit>, AppError> {
    let catalog = state.store.snapshot()?;
    let limit = args.limit.unwrap_or(state.config.display_limit);

    let hits: Vec<SearchHit> = state
        .matcher
        .search_catalog(&catalog, &state.config.searchable_categories, &args.query)
        .into_iter()
        .take(limit)
        .map(SearchHit::from)
        .collect();

    debug!(
        "Search '{}' returned {} hits (limit {})",
        args.query,
        hits.len(),
        limit
    );

    Ok(hits)
}

/// Render hits as markdown for CLI output
pub fn format_search_results(hits: &[SearchHit], query: &str) -> String {
    let mut md = format!("# Search Results · \"{}\" · {} products\n\n", query.trim(), hits.len());

    if hits.is_empty() {
        md.push_str("No matching products.\n");
        return md;
    }

    for (rank, hit) in hits.iter().enumerate() {
        md.push_str(&format!(
            "{}. **{}** ({}/{}) · matched `{}` · {:.0}%\n",
            rank + 1,
            hit.product.name,
            hit.category,
            hit.product.id,
            hit.matched_keyword,
            hit.similarity * 100.0
        ));
    }

    md
}
