use thiserror::Error;

use crate::db_types::{NewProduct, Product, UserId};

/// Behaviour of the catalog store. Products have no edit operation: they are listed once and removed either by
/// their owner or by a checkout that sells them.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;

    /// Returns the full catalog, ordered by product id.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogApiError>;

    /// Returns the products listed by the given username. Unknown usernames yield an empty list.
    async fn fetch_products_for_user(&self, username: &str) -> Result<Vec<Product>, CatalogApiError>;

    /// Removes a product, but only if `requester` is its owner. Returns the deleted product.
    async fn delete_product(&self, id: i64, requester: &UserId) -> Result<Product, CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("A product with this title is already listed")]
    TitleTaken,
    #[error("Price cannot be negative")]
    InvalidPrice,
    #[error("Unauthorised request")]
    NotOwner,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(de) = &e {
            if de.is_unique_violation() {
                return CatalogApiError::TitleTaken;
            }
        }
        CatalogApiError::DatabaseError(e.to_string())
    }
}
