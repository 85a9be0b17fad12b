//! Catalog read operations

use crate::catalog::{Catalog, Product};
use crate::error::AppError;
use crate::state::AppState;
use tracing::debug;

/// Full category -> products mapping
pub fn execute_catalog(state: &AppState) -> Result<Catalog, AppError> {
    let catalog = state.store.snapshot()?;
    debug!("Catalog read: {} products", catalog.total_products());
    Ok(catalog)
}

/// Ordered products of one category
pub fn execute_list(state: &AppState, category: &str) -> Result<Vec<Product>, AppError> {
    state.store.list(category)
}

/// Render one product as a markdown list item
pub fn format_product(product: &Product) -> String {
    let mut md = format!("- **{}** `{}`", product.name, product.id);
    if let Some(description) = &product.description {
        md.push_str(&format!(" · {}", description));
    }
    if let Some(image) = &product.image_url {
        md.push_str(&format!(" · ![image]({})", image));
    }
    md.push('\n');
    md
}

/// Render one category section
pub fn format_category(category: &str, products: &[Product]) -> String {
    let mut md = format!("## {} · {} products\n\n", category, products.len());
    for product in products {
        md.push_str(&format_product(product));
    }
    md.push('\n');
    md
}

/// Render the whole catalog
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut md = format!("# Catalog · {} products\n\n", catalog.total_products());
    for (category, products) in catalog.iter() {
        md.push_str(&format_category(category, products));
    }
    md
}
