//! Known product catalog.
//!
//! A prefilled `product_interest` that matches one of these names exactly
//! renders as a locked field; anything else falls back to the selector.

/// Products the showroom sells, in selector display order.
pub const DEFAULT_PRODUCTS: [&str; 4] = [
    "The Cloud Sofa",
    "Classic Chesterfield",
    "Artisan Oak Table",
    "Velvet Armchair",
];

/// Closed set of canonical product names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCatalog {
    products: Vec<String>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self {
            products: DEFAULT_PRODUCTS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl ProductCatalog {
    /// Build a catalog from configured names. An empty list keeps the
    /// defaults; duplicates and blank names are dropped.
    pub fn from_products(products: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(products.len());
        for product in products {
            let trimmed = product.trim();
            if !trimmed.is_empty() && !unique.iter().any(|p| p == trimmed) {
                unique.push(trimmed.to_string());
            }
        }
        if unique.is_empty() {
            return Self::default();
        }
        Self { products: unique }
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, name: &str) -> bool {
        self.products.iter().any(|p| p == name)
    }

    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
