use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewProduct, Product, UserId},
    traits::{CatalogApiError, CatalogManagement},
};

/// Listing, browsing and removing products.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        if product.price.is_negative() {
            return Err(CatalogApiError::InvalidPrice);
        }
        let product = self.db.insert_product(product).await?;
        debug!("🛍️ Product [{}] listed at {} by {}", product.title, product.price, product.user_id);
        Ok(product)
    }

    pub async fn product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        self.db.fetch_product(id).await
    }

    pub async fn all_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_all_products().await
    }

    pub async fn products_for_user(&self, username: &str) -> Result<Vec<Product>, CatalogApiError> {
        self.db.fetch_products_for_user(username).await
    }

    /// Removes a listing on behalf of `requester`. Fails with [`CatalogApiError::NotOwner`] if the product
    /// belongs to someone else.
    pub async fn remove_product(&self, id: i64, requester: &UserId) -> Result<Product, CatalogApiError> {
        let product = self.db.delete_product(id, requester).await?;
        debug!("🛍️ Product [{}] delisted by its owner", product.title);
        Ok(product)
    }
}
