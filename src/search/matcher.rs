//! Product matcher
//!
//! Entries are derived from a catalog snapshot for every query and dropped
//! with it; nothing is cached between queries, so results always reflect the
//! last committed catalog mutation.

use super::keywords;
use super::similarity::similarity;
use crate::catalog::{Catalog, Product};
use crate::error::normalize_text;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Reference similarity cutoff; kept matches must score strictly above it
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Queries shorter than this (in chars, after normalization) match nothing
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Derived search record for one live product
#[derive(Debug, Clone)]
pub struct SearchableEntry<'a> {
    pub category: &'a str,
    pub product: &'a Product,
    pub keywords: BTreeSet<String>,
}

#[cfg(test)]
impl SearchableEntry<'_> {
    pub fn name(&self) -> &str {
        &self.product.name
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }
}

/// One ranked match
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch<'a> {
    pub category: &'a str,
    pub product: &'a Product,
    pub matched_keyword: String,
    pub similarity: f64,
}

/// Derive entries for every product of the searchable categories
///
/// Category order follows `searchable`, then insertion order within each
/// category. Unknown categories contribute nothing.
pub fn derive_entries<'a>(catalog: &'a Catalog, searchable: &[String]) -> Vec<SearchableEntry<'a>> {
    searchable
        .iter()
        .filter_map(|category| catalog.entry(category))
        .flat_map(|(category, products)| {
            products.iter().map(move |product| SearchableEntry {
                category,
                product,
                keywords: keywords::generate(&product.name),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Matcher {
    threshold: f64,
    min_query_len: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_MIN_QUERY_LEN)
    }
}

impl Matcher {
    pub fn new(threshold: f64, min_query_len: usize) -> Self {
        Self {
            threshold,
            min_query_len,
        }
    }

    /// Rank entries against `query`, best first, one match per product name
    pub fn search<'a>(&self, entries: &[SearchableEntry<'a>], query: &str) -> Vec<SearchMatch<'a>> {
        let query = normalize_text(query);
        if query.chars().count() < self.min_query_len {
            return Vec::new();
        }

        let mut candidates: Vec<SearchMatch<'a>> = entries
            .iter()
            .flat_map(|entry| {
                let query = query.as_str();
                entry.keywords.iter().filter_map(move |keyword| {
                    let score = similarity(query, keyword);
                    (score > self.threshold).then(|| SearchMatch {
                        category: entry.category,
                        product: entry.product,
                        matched_keyword: keyword.clone(),
                        similarity: score,
                    })
                })
            })
            .collect();

        // Stable: ties keep catalog order
        candidates.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut seen = HashSet::new();
        candidates.retain(|m| seen.insert(m.product.name.as_str()));

        debug!(
            "Query {:?} matched {} products across {} entries",
            query,
            candidates.len(),
            entries.len()
        );

        candidates
    }

    /// Derive entries from `catalog` and search them in one step
    pub fn search_catalog<'a>(
        &self,
        catalog: &'a Catalog,
        searchable: &[String],
        query: &str,
    ) -> Vec<SearchMatch<'a>> {
        let entries = derive_entries(catalog, searchable);
        self.search(&entries, query)
    }
}
