//! Catalog data model

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// A product listed in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display name, never empty
    pub name: String,
    /// Unique within its category only
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Already-resolved image reference (URL or server path)
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Input for creating a product; the store assigns `id` when absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Full category -> ordered product list mapping; insertion order is display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: IndexMap<String, Vec<Product>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Insert an empty category; returns false if it already existed
    pub fn ensure_category(&mut self, category: &str) -> bool {
        if self.has_category(category) {
            return false;
        }
        self.categories.insert(category.to_string(), Vec::new());
        true
    }

    pub fn products(&self, category: &str) -> Option<&[Product]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Category name borrowed from the catalog, with its products
    pub fn entry(&self, category: &str) -> Option<(&str, &[Product])> {
        self.categories
            .get_key_value(category)
            .map(|(name, products)| (name.as_str(), products.as_slice()))
    }

    pub(crate) fn products_mut(&mut self, category: &str) -> Option<&mut Vec<Product>> {
        self.categories.get_mut(category)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Product])> {
        self.categories
            .iter()
            .map(|(name, products)| (name.as_str(), products.as_slice()))
    }

    pub fn total_products(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
