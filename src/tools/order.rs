//! Product selection hand-off
//!
//! Selecting a product yields a messaging link with a prefilled enquiry; the
//! conversation itself happens outside this server.

use crate::catalog::Product;
use crate::cli::ProductRef;
use crate::error::AppError;
use crate::state::AppState;
use serde::Serialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLink {
    pub category: String,
    pub product: Product,
    pub url: String,
}

pub fn execute_order(state: &AppState, target: &ProductRef) -> Result<OrderLink, AppError> {
    let product = state
        .store
        .list(&target.category)?
        .into_iter()
        .find(|p| p.id == target.id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No product with id {} in {}",
                target.id, target.category
            ))
        })?;

    let url = order_url(
        &state.config.order_link,
        state.config.order_phone.as_deref(),
        &product,
    )?;
    debug!("Order link for {}/{}: {}", target.category, product.id, url);

    Ok(OrderLink {
        category: target.category.clone(),
        product,
        url,
    })
}

/// `{base}{phone}?text=<message>`; a leading `+` on the phone is dropped
pub fn order_url(base: &str, phone: Option<&str>, product: &Product) -> Result<String, AppError> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::Internal(format!("Invalid order link {}: {}", base, e)))?;

    let phone = phone.map(|p| p.trim().replace('+', ""));
    if let Some(phone) = phone.filter(|p| !p.is_empty()) {
        url = url
            .join(&phone)
            .map_err(|e| AppError::Internal(format!("Invalid order phone {}: {}", phone, e)))?;
    }

    let message = format!("I want the {} {}.", product.name, product.id);
    url.set_query(Some(&format!("text={}", urlencoding::encode(&message))));

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    fn blender() -> Product {
        Product {
            name: "High-Speed Blender".to_string(),
            id: "4152".to_string(),
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn test_order_url_with_phone() {
        let url = order_url("https://wa.me/", Some("+15550100"), &blender()).unwrap();
        assert_eq!(
            url,
            "https://wa.me/15550100?text=I%20want%20the%20High-Speed%20Blender%204152."
        );
    }

    #[test]
    fn test_order_url_without_phone() {
        let url = order_url("https://wa.me/", None, &blender()).unwrap();
        assert!(url.starts_with("https://wa.me/?text="));
    }

    #[test]
    fn test_execute_order() {
        let (state, _dir) = test_state();
        let target = ProductRef {
            category: "other".to_string(),
            id: "4152".to_string(),
        };
        let link = execute_order(&state, &target).unwrap();
        assert_eq!(link.product.name, "High-Speed Blender");
        assert!(link.url.starts_with("https://wa.me/15550100?text="));
    }

    #[test]
    fn test_execute_order_unknown_product() {
        let (state, _dir) = test_state();
        let target = ProductRef {
            category: "other".to_string(),
            id: "404".to_string(),
        };
        assert!(matches!(
            execute_order(&state, &target),
            Err(AppError::NotFound(_))
        ));
    }
}
