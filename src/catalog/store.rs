//! Catalog store: the authoritative category -> products mapping
//!
//! Reads take a snapshot under a read lock. Mutations are serialized by a
//! dedicated mutex and follow stage -> persist -> commit: the new state is
//! built on a copy, written to disk, and only then swapped in. A failed write
//! therefore leaves the in-memory catalog untouched.

use super::persist;
use super::seed;
use super::types::{Catalog, NewProduct, Product};
use crate::error::{require_field, AppError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANGE_FEED_CAPACITY: usize = 64;

/// Kind of committed catalog mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Change feed event, emitted after the mutation is durable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogChange {
    pub kind: ChangeKind,
    pub category: String,
    pub product: Product,
}

pub struct CatalogStore {
    path: PathBuf,
    state: RwLock<Catalog>,
    writer: Mutex<()>,
    changes: broadcast::Sender<CatalogChange>,
}

impl CatalogStore {
    /// Open the store backed by `path`
    ///
    /// A missing file is created from the seed catalog. Configured categories
    /// absent from an existing file are added empty and persisted.
    pub fn open(path: impl AsRef<Path>, categories: &[String]) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let catalog = match persist::load(&path)? {
            Some(mut catalog) => {
                let mut added = false;
                for category in categories {
                    added |= catalog.ensure_category(category);
                }
                if added {
                    persist::write_atomic(&path, &catalog)?;
                    info!("Added missing categories to {}", path.display());
                }
                catalog
            }
            None => {
                let catalog = seed::default_catalog(categories);
                persist::write_atomic(&path, &catalog)?;
                info!("Created default catalog at {}", path.display());
                catalog
            }
        };

        debug!(
            "Catalog store ready: {} products in {} categories",
            catalog.total_products(),
            catalog.category_names().count()
        );

        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Ok(Self {
            path,
            state: RwLock::new(catalog),
            writer: Mutex::new(()),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe to committed add/remove events
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogChange> {
        self.changes.subscribe()
    }

    /// Full category -> list mapping as of the last committed mutation
    pub fn snapshot(&self) -> Result<Catalog, AppError> {
        let state = self
            .state
            .read()
            .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))?;
        Ok(state.clone())
    }

    /// Ordered products of one category
    pub fn list(&self, category: &str) -> Result<Vec<Product>, AppError> {
        let state = self
            .state
            .read()
            .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))?;
        state
            .products(category)
            .map(<[Product]>::to_vec)
            .ok_or_else(|| AppError::NotFound(format!("Unknown category: {}", category)))
    }

    /// Append a product to `category`, assigning an id when none is given
    pub fn add(&self, category: &str, new: NewProduct) -> Result<Product, AppError> {
        let name = require_field("name", Some(new.name.as_str()))?;
        let category = require_field("category", Some(category))?;

        self.mutate(|catalog| {
            let products = catalog.products_mut(&category).ok_or_else(|| {
                AppError::Validation(format!("Unknown category: {}", category))
            })?;

            let id = match new.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) if products.iter().any(|p| p.id == id) => {
                    return Err(AppError::Validation(format!(
                        "Product id {} already exists in {}",
                        id, category
                    )));
                }
                Some(id) => id.to_string(),
                None => next_id(products),
            };

            let product = Product {
                name,
                id,
                description: non_blank(new.description),
                image_url: non_blank(new.image_url),
            };
            products.push(product.clone());

            Ok(CatalogChange {
                kind: ChangeKind::Added,
                category: category.clone(),
                product,
            })
        })
    }

    /// Remove the first product in `category` whose id matches exactly
    pub fn remove(&self, category: &str, id: &str) -> Result<Product, AppError> {
        self.mutate(|catalog| {
            let products = catalog
                .products_mut(category)
                .ok_or_else(|| AppError::NotFound(format!("Unknown category: {}", category)))?;

            let index = products.iter().position(|p| p.id == id).ok_or_else(|| {
                AppError::NotFound(format!("No product with id {} in {}", id, category))
            })?;

            Ok(CatalogChange {
                kind: ChangeKind::Removed,
                category: category.to_string(),
                product: products.remove(index),
            })
        })
    }

    /// Serialized read-modify-persist-write
    fn mutate<F>(&self, apply: F) -> Result<Product, AppError>
    where
        F: FnOnce(&mut Catalog) -> Result<CatalogChange, AppError>,
    {
        let _writer = self
            .writer
            .lock()
            .map_err(|_| AppError::Internal("catalog writer lock poisoned".to_string()))?;

        let mut staged = self.snapshot()?;
        let change = apply(&mut staged)?;

        if let Err(e) = persist::write_atomic(&self.path, &staged) {
            warn!(
                "Catalog write failed, {:?} of {}/{} not committed: {}",
                change.kind, change.category, change.product.id, e
            );
            return Err(e.into());
        }

        {
            let mut state = self
                .state
                .write()
                .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))?;
            *state = staged;
        }

        debug!(
            "Catalog {:?}: {}/{} ({})",
            change.kind, change.category, change.product.id, change.product.name
        );

        let product = change.product.clone();
        // No subscribers is not an error
        let _ = self.changes.send(change);
        Ok(product)
    }
}

/// Millisecond timestamp id, bumped until unique within the category
fn next_id(products: &[Product]) -> String {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while products.iter().any(|p| p.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn categories() -> Vec<String> {
        vec!["other".to_string(), "fridges".to_string()]
    }

    fn open_store(dir: &TempDir) -> CatalogStore {
        CatalogStore::open(dir.path().join("catalog.json"), &categories()).unwrap()
    }

    #[test]
    fn test_open_creates_seed_file() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.path().exists());
        assert_eq!(store.list("other").unwrap().len(), 1);
        assert_eq!(store.list("fridges").unwrap().len(), 1);
    }

    #[test]
    fn test_open_adds_missing_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        CatalogStore::open(&path, &["other".to_string()]).unwrap();

        let store = CatalogStore::open(&path, &categories()).unwrap();
        assert!(store.list("fridges").unwrap().is_empty());

        let on_disk = persist::load(&path).unwrap().unwrap();
        assert!(on_disk.has_category("fridges"));
    }

    #[test]
    fn test_categories_keep_configured_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let configured: Vec<String> = ["fridges", "cloth-washers", "acs", "fans", "other"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let store = CatalogStore::open(&path, &configured).unwrap();
        store.add("acs", NewProduct::named("Window AC")).unwrap();

        let reopened = CatalogStore::open(&path, &configured).unwrap();
        let snapshot = reopened.snapshot().unwrap();
        let names: Vec<&str> = snapshot.category_names().collect();
        assert_eq!(names, ["fridges", "cloth-washers", "acs", "fans", "other"]);
    }

    #[test]
    fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let added = store
            .add("other", NewProduct::named("Steam Cooker").with_description("6L"))
            .unwrap();

        let products = store.list("other").unwrap();
        assert_eq!(products.iter().filter(|p| **p == added).count(), 1);
        assert_eq!(products.last(), Some(&added));
        assert!(!added.id.is_empty());
        assert_eq!(added.description.as_deref(), Some("6L"));
    }

    #[test]
    fn test_add_persists_before_returning() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let added = store.add("other", NewProduct::named("Toaster")).unwrap();

        let on_disk = persist::load(store.path()).unwrap().unwrap();
        assert!(on_disk.products("other").unwrap().contains(&added));
    }

    #[test]
    fn test_add_requires_name_and_category() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(matches!(
            store.add("other", NewProduct::named("  ")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.add("", NewProduct::named("Toaster")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.add("garden", NewProduct::named("Mower")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_add_keeps_supplied_id_and_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let added = store
            .add("other", NewProduct::named("Toaster").with_id("toaster-1"))
            .unwrap();
        assert_eq!(added.id, "toaster-1");

        let dup = store.add("other", NewProduct::named("Other").with_id("toaster-1"));
        assert!(matches!(dup, Err(AppError::Validation(_))));

        // Same id in another category is fine
        store
            .add("fridges", NewProduct::named("Dryer").with_id("toaster-1"))
            .unwrap();
    }

    #[test]
    fn test_generated_ids_unique_within_category() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let a = store.add("other", NewProduct::named("A")).unwrap();
        let b = store.add("other", NewProduct::named("B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let added = store.add("other", NewProduct::named("Toaster")).unwrap();

        let removed = store.remove("other", &added.id).unwrap();
        assert_eq!(removed, added);
        assert!(!store.list("other").unwrap().contains(&added));

        let on_disk = persist::load(store.path()).unwrap().unwrap();
        assert!(!on_disk.products("other").unwrap().contains(&added));
    }

    #[test]
    fn test_remove_missing_leaves_list_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let before = store.list("other").unwrap();

        assert!(matches!(
            store.remove("other", "no-such-id"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.remove("garden", "1"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.list("other").unwrap(), before);
    }

    #[test]
    fn test_list_unknown_category() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(matches!(store.list("garden"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_failed_persist_does_not_commit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let before = store.snapshot().unwrap();

        // A directory squatting on the temp path makes the write fail
        std::fs::create_dir(dir.path().join("catalog.json.tmp")).unwrap();

        let result = store.add("other", NewProduct::named("Toaster"));
        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_change_feed() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let mut rx = store.subscribe();

        let added = store.add("other", NewProduct::named("Toaster")).unwrap();
        store.remove("other", &added.id).unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, ChangeKind::Added);
        assert_eq!(first.product, added);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.kind, ChangeKind::Removed);
        assert_eq!(second.category, "other");
    }

    #[test]
    fn test_concurrent_adds_never_lose_entries() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .add("other", NewProduct::named(format!("Product {}", i)))
                        .unwrap()
                })
            })
            .collect();

        let added: Vec<Product> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let products = store.list("other").unwrap();
        assert_eq!(products.len(), 1 + added.len());
        for product in &added {
            assert!(products.contains(product));
        }

        let reopened = CatalogStore::open(store.path(), &categories()).unwrap();
        assert_eq!(reopened.list("other").unwrap(), products);
    }
}
