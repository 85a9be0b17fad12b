//! Product write operations
//!
//! The admin code is checked first, before any field validation or store
//! access.

use crate::catalog::{NewProduct, Product};
use crate::cli::{AddArgs, ProductRef};
use crate::error::{require_field, AppError};
use crate::state::AppState;
use tracing::debug;
use url::Url;

/// Create a product in `args.category`
pub fn execute_add(
    state: &AppState,
    presented_code: Option<&str>,
    args: AddArgs,
) -> Result<Product, AppError> {
    state.guard.check(presented_code)?;
    validate_image_ref(args.image_url.as_deref())?;

    let new = NewProduct {
        id: args.id,
        name: args.name,
        description: args.description,
        image_url: args.image_url,
    };
    let product = state.store.add(&args.category, new)?;

    debug!("Added product {}/{}", args.category.trim(), product.id);
    Ok(product)
}

/// Delete the product identified by `target`
pub fn execute_remove(
    state: &AppState,
    presented_code: Option<&str>,
    target: &ProductRef,
) -> Result<Product, AppError> {
    state.guard.check(presented_code)?;
    let category = require_field("category", Some(target.category.as_str()))?;
    let id = require_field("id", Some(target.id.as_str()))?;

    let product = state.store.remove(&category, &id)?;

    debug!("Removed product {}/{}", category, product.id);
    Ok(product)
}

/// Image references come from the upload collaborator: an absolute http(s)
/// URL or a server path
fn validate_image_ref(image: Option<&str>) -> Result<(), AppError> {
    let Some(image) = image.map(str::trim).filter(|i| !i.is_empty()) else {
        return Ok(());
    };

    if image.starts_with('/') {
        return Ok(());
    }

    match Url::parse(image) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::Validation(format!(
            "imageUrl must be an http(s) URL or absolute path, got {}",
            image
        ))),
    }
}
