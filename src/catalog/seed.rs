//! Default catalog written when no data file exists yet

use super::types::{Catalog, Product};

/// Starter record per known category: (category, name, id)
const SEED_PRODUCTS: &[(&str, &str, &str)] = &[
    ("fridges", "Premium Refrigerator", "1001"),
    ("cloth-washers", "Front Load Washer", "2001"),
    ("acs", "Split AC Unit", "3001"),
    ("fans", "Ceiling Fan", "4001"),
    ("dish-washers", "Built-in Dishwasher", "5001"),
    ("other", "High-Speed Blender", "4152"),
];

/// Build the default catalog in `categories` order
///
/// Known categories get their starter product; any other configured category
/// starts empty.
pub fn default_catalog(categories: &[String]) -> Catalog {
    let mut catalog = Catalog::new();

    for category in categories {
        catalog.ensure_category(category);
        if let (Some(product), Some(products)) =
            (seed_product(category), catalog.products_mut(category))
        {
            products.push(product);
        }
    }

    catalog
}

fn seed_product(category: &str) -> Option<Product> {
    SEED_PRODUCTS
        .iter()
        .find(|(c, _, _)| *c == category)
        .map(|(_, name, id)| Product {
            name: name.to_string(),
            id: id.to_string(),
            description: None,
            image_url: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_get_starter_product() {
        let categories = vec!["other".to_string(), "fridges".to_string()];
        let catalog = default_catalog(&categories);

        let other = catalog.products("other").unwrap();
        assert_eq!(other[0].name, "High-Speed Blender");
        assert_eq!(other[0].id, "4152");
        assert_eq!(catalog.products("fridges").unwrap()[0].id, "1001");
    }

    #[test]
    fn test_unknown_category_starts_empty() {
        let categories = vec!["fans".to_string(), "garden".to_string()];
        let catalog = default_catalog(&categories);

        assert_eq!(catalog.total_products(), 1);
        assert!(catalog.products("garden").unwrap().is_empty());
        let names: Vec<&str> = catalog.category_names().collect();
        assert_eq!(names, ["fans", "garden"]);
    }
}
