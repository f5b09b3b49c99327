//! Product catalog queries.

use store::{Product, ProductCatalog, Result};

/// Read-only access to the product catalog.
pub struct CatalogService<P: ProductCatalog> {
    catalog: P,
}

impl<P: ProductCatalog> CatalogService<P> {
    /// Creates a new catalog service.
    pub fn new(catalog: P) -> Self {
        Self { catalog }
    }

    /// Returns every product ordered by ID.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.catalog.list_products().await?;
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }
}
