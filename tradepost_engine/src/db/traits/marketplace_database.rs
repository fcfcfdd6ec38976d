use thiserror::Error;

use crate::db_types::{CheckoutReceipt, ProductSnapshot, UserId};
use crate::traits::{CatalogManagement, OrderManagement, UserManagement};

/// The highest level of behaviour for backends supporting the Tradepost server.
///
/// Beyond the per-store contracts it inherits, this trait owns the checkout flow: the single transaction that
/// converts cart snapshots into ledger entries and removes the sold products.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase: Clone + UserManagement + CatalogManagement + OrderManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Converts the given cart snapshots into order-ledger entries, all-or-nothing.
    ///
    /// In a single atomic transaction:
    /// * one `Bought` order is created for `buyer_id`, shared by every line item in the batch;
    /// * for each entry, one `Sold` order is created for the seller named in the snapshot (one per entry, even
    ///   when several entries share a seller);
    /// * two identical denormalized order items are written, one against the Sold order and one against the
    ///   shared Bought order;
    /// * the product row is deleted. If it is already gone, another checkout won the race and the whole batch
    ///   rolls back with [`CheckoutError::ProductConflict`].
    ///
    /// An empty entry list is a no-op and returns an empty receipt without touching the store.
    async fn checkout(
        &self,
        buyer_id: &UserId,
        entries: &[ProductSnapshot],
    ) -> Result<CheckoutReceipt, CheckoutError>;

    async fn close(&mut self) -> Result<(), CheckoutError>;
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Product {0} is no longer available")]
    ProductConflict(i64),
    #[error("Seller {0} does not exist")]
    SellerNotFound(UserId),
    #[error("Buyer {0} does not exist")]
    BuyerNotFound(UserId),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutError::DatabaseError(e.to_string())
    }
}
