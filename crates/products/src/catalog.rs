//! SKU-indexed product lookup.

use std::collections::HashMap;

use warehouse_core::{DomainError, DomainResult, Sku};

use crate::product::Product;

/// Read-only index over product reference data.
///
/// Two lookups are provided because callers differ: box-stock seeding joins on
/// the exact SKU, while everything user-facing matches case-insensitively.
/// When several products share a key, the first one in input order wins.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    exact: HashMap<Sku, usize>,
    folded: HashMap<String, usize>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut exact = HashMap::with_capacity(products.len());
        let mut folded = HashMap::with_capacity(products.len());

        for (idx, p) in products.iter().enumerate() {
            exact.entry(p.sku.clone()).or_insert(idx);
            folded.entry(p.sku.normalized()).or_insert(idx);
        }

        Self {
            products,
            exact,
            folded,
        }
    }

    /// Build a catalog, rejecting SKUs that collide case-insensitively.
    pub fn try_new(products: Vec<Product>) -> DomainResult<Self> {
        let catalog = Self::new(products);
        catalog.check_unique()?;
        Ok(catalog)
    }

    /// Fails on the first pair of SKUs that differ only by case.
    pub fn check_unique(&self) -> DomainResult<()> {
        if self.folded.len() == self.products.len() {
            return Ok(());
        }
        let mut seen = HashMap::new();
        for p in &self.products {
            if let Some(prev) = seen.insert(p.sku.normalized(), &p.sku) {
                return Err(DomainError::invariant(format!(
                    "duplicate SKU: {prev} and {}",
                    p.sku
                )));
            }
        }
        Ok(())
    }

    /// Exact-case SKU lookup.
    pub fn find_exact(&self, sku: &Sku) -> Option<&Product> {
        self.exact.get(sku).map(|&idx| &self.products[idx])
    }

    /// Case-insensitive SKU lookup.
    pub fn find_by_sku(&self, sku: &Sku) -> Option<&Product> {
        self.folded
            .get(&sku.normalized())
            .map(|&idx| &self.products[idx])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
