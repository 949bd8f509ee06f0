//! Client-side shopping cart.
//!
//! The cart is the authoritative record of what a client intends to buy. It
//! holds at most one entry per product, never an entry with zero units, and
//! writes its full contents to client storage after every mutation so it
//! survives a restart.
//!
//! Mutations never fail. Out-of-range input is normalized (a non-positive
//! quantity removes the entry) and a storage write failure is logged.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use stockroom_core::{LineItem, OrderTotals, Product, ProductId};

use crate::storage::{ClientStorage, keys};

/// A shopping cart persisted to client storage.
pub struct Cart {
    entries: Vec<LineItem>,
    storage: Arc<dyn ClientStorage>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Load the cart from storage.
    ///
    /// Absent or unreadable storage yields an empty cart. Entries that break
    /// the cart invariants (zero units, duplicate products) are dropped.
    #[must_use]
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        let entries = match storage.get(keys::CART) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<LineItem>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable saved cart");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved cart");
                Vec::new()
            }
        };

        let mut cart = Self {
            entries: Vec::with_capacity(entries.len()),
            storage,
        };
        for entry in entries {
            if entry.quantity > 0 && cart.entry(entry.product_id).is_none() {
                cart.entries.push(entry);
            }
        }
        debug!(entries = cart.entries.len(), "Cart loaded");
        cart
    }

    /// Add units of a product.
    ///
    /// An existing entry grows and keeps its original `price_at_add`. A new
    /// entry captures the product's current price. Adding zero units does
    /// nothing.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
        } else {
            self.entries.push(LineItem {
                product_id: product.id,
                quantity,
                price_at_add: product.price,
            });
        }
        self.persist();
    }

    /// Overwrite an entry's quantity; zero or negative removes it.
    ///
    /// Products not in the cart are ignored.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = quantity;
            self.persist();
        }
    }

    /// Remove a product's entry. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != product_id);
        if self.entries.len() != before {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Subtotal at current catalog prices.
    ///
    /// Entries whose product is missing from `catalog` (deleted since it was
    /// added) contribute nothing.
    #[must_use]
    pub fn total(&self, catalog: &[Product]) -> Decimal {
        self.entries
            .iter()
            .filter_map(|entry| {
                catalog
                    .iter()
                    .find(|product| product.id == entry.product_id)
                    .map(|product| product.price * Decimal::from(entry.quantity))
            })
            .sum()
    }

    /// Subtotal, tax and total at current catalog prices.
    #[must_use]
    pub fn summary(&self, catalog: &[Product]) -> OrderTotals {
        OrderTotals::from_subtotal(self.total(catalog))
    }

    /// The entry for a product, if any.
    #[must_use]
    pub fn entry(&self, product_id: ProductId) -> Option<&LineItem> {
        self.entries
            .iter()
            .find(|entry| entry.product_id == product_id)
    }

    /// All entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[LineItem] {
        &self.entries
    }

    /// Entries as order line items.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.entries.clone()
    }

    /// Total units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.entries
            .iter_mut()
            .find(|entry| entry.product_id == product_id)
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(crate::storage::StorageError::from)
            .and_then(|raw| self.storage.set(keys::CART, &raw));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn product(id: i32, price: Decimal) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            sku: format!("SKU-{id}"),
            category: "General".to_owned(),
            price,
            quantity: 10,
            low_stock_threshold: 2,
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_cart() -> (Cart, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (Cart::load(storage.clone()), storage)
    }

    fn saved_entries(storage: &MemoryStorage) -> Vec<LineItem> {
        serde_json::from_str(&storage.get(keys::CART).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_add_same_product_merges_and_keeps_first_price() {
        let (mut cart, _) = empty_cart();
        let mut mug = product(1, Decimal::new(1000, 2));

        cart.add(&mug, 2);
        mug.price = Decimal::new(1500, 2);
        cart.add(&mug, 3);

        assert_eq!(cart.entries().len(), 1);
        let entry = cart.entry(mug.id).unwrap();
        assert_eq!(entry.quantity, 5);
        assert_eq!(entry.price_at_add, Decimal::new(1000, 2));
    }

    #[test]
    fn test_add_zero_units_is_noop() {
        let (mut cart, storage) = empty_cart();
        cart.add(&product(1, Decimal::ONE), 0);
        assert!(cart.is_empty());
        assert_eq!(storage.get(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_set_quantity_overwrites_without_touching_price() {
        let (mut cart, _) = empty_cart();
        let mut mug = product(1, Decimal::new(1000, 2));
        cart.add(&mug, 1);
        mug.price = Decimal::new(1, 0);

        cart.set_quantity(mug.id, 7);

        let entry = cart.entry(mug.id).unwrap();
        assert_eq!(entry.quantity, 7);
        assert_eq!(entry.price_at_add, Decimal::new(1000, 2));
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        let (mut cart, _) = empty_cart();
        let a = product(1, Decimal::ONE);
        let b = product(2, Decimal::ONE);
        cart.add(&a, 3);
        cart.add(&b, 3);

        cart.set_quantity(a.id, 0);
        cart.set_quantity(b.id, -4);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_of_absent_product_is_noop() {
        let (mut cart, _) = empty_cart();
        cart.set_quantity(ProductId::new(99), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let (mut cart, _) = empty_cart();
        cart.add(&product(1, Decimal::ONE), 1);
        cart.remove(ProductId::new(42));
        assert_eq!(cart.entries().len(), 1);
    }

    #[test]
    fn test_clear() {
        let (mut cart, storage) = empty_cart();
        cart.add(&product(1, Decimal::ONE), 1);
        cart.add(&product(2, Decimal::ONE), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert!(saved_entries(&storage).is_empty());
    }

    #[test]
    fn test_total_of_empty_cart_is_zero() {
        let (cart, _) = empty_cart();
        assert_eq!(cart.total(&[product(1, Decimal::TEN)]), Decimal::ZERO);
    }

    #[test]
    fn test_total_ignores_products_missing_from_catalog() {
        let (mut cart, _) = empty_cart();
        cart.add(&product(1, Decimal::TEN), 2);
        assert_eq!(cart.total(&[]), Decimal::ZERO);
        assert_eq!(cart.total(&[product(2, Decimal::TEN)]), Decimal::ZERO);
    }

    #[test]
    fn test_total_uses_current_catalog_price() {
        let (mut cart, _) = empty_cart();
        cart.add(&product(1, Decimal::new(1000, 2)), 2);
        cart.add(&product(2, Decimal::new(250, 2)), 1);

        let catalog = vec![product(1, Decimal::new(1200, 2)), product(2, Decimal::new(250, 2))];
        assert_eq!(cart.total(&catalog), Decimal::new(2650, 2));

        let summary = cart.summary(&catalog);
        assert_eq!(summary.tax, Decimal::new(265, 2));
        assert_eq!(summary.total, Decimal::new(2915, 2));
    }

    #[test]
    fn test_add_saturates_at_u32_max() {
        let (mut cart, storage) = empty_cart();
        let bulk = product(1, Decimal::ONE);
        cart.add(&bulk, u32::MAX - 1);
        cart.add(&bulk, 5);

        assert_eq!(cart.entry(bulk.id).unwrap().quantity, u32::MAX);
        assert_eq!(saved_entries(&storage).first().unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_set_quantity_above_u32_range_is_capped() {
        let (mut cart, _) = empty_cart();
        let bulk = product(1, Decimal::ONE);
        cart.add(&bulk, 1);

        cart.set_quantity(bulk.id, i64::MAX);

        assert_eq!(cart.entry(bulk.id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_item_count_and_total_past_u32_range() {
        let (mut cart, _) = empty_cart();
        let a = product(1, Decimal::new(1999, 2));
        let b = product(2, Decimal::new(1, 2));
        cart.add(&a, 3_000_000_000);
        cart.add(&b, 3_000_000_000);
        cart.add(&b, u32::MAX);

        assert_eq!(cart.item_count(), 3_000_000_000 + u64::from(u32::MAX));

        let expected = Decimal::new(1999, 2) * Decimal::from(3_000_000_000_u32)
            + Decimal::new(1, 2) * Decimal::from(u32::MAX);
        assert_eq!(cart.total(&[a, b]), expected);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (mut cart, storage) = empty_cart();
        let a = product(1, Decimal::ONE);

        cart.add(&a, 2);
        assert_eq!(saved_entries(&storage)[0].quantity, 2);

        cart.set_quantity(a.id, 5);
        assert_eq!(saved_entries(&storage)[0].quantity, 5);

        cart.remove(a.id);
        assert!(saved_entries(&storage).is_empty());
    }

    #[test]
    fn test_reload_restores_entries() {
        let (mut cart, storage) = empty_cart();
        cart.add(&product(1, Decimal::new(999, 2)), 3);
        cart.add(&product(2, Decimal::ONE), 1);

        let reloaded = Cart::load(storage);
        assert_eq!(reloaded.entries(), cart.entries());
        assert_eq!(reloaded.item_count(), 4);
    }

    #[test]
    fn test_load_tolerates_corrupt_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::CART, "{not a cart").unwrap();
        assert!(Cart::load(storage).is_empty());
    }

    #[test]
    fn test_load_drops_invalid_entries() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                keys::CART,
                r#"[
                    {"product_id": 1, "quantity": 0, "price_at_add": "1.00"},
                    {"product_id": 2, "quantity": 1, "price_at_add": "2.00"},
                    {"product_id": 2, "quantity": 4, "price_at_add": "3.00"}
                ]"#,
            )
            .unwrap();

        let cart = Cart::load(storage);
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entry(ProductId::new(2)).unwrap().quantity, 1);
    }

    struct ReadOnlyStorage;

    impl ClientStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn test_mutations_survive_storage_failure() {
        let mut cart = Cart::load(Arc::new(ReadOnlyStorage));
        cart.add(&product(1, Decimal::ONE), 1);
        assert_eq!(cart.item_count(), 1);
    }
}
