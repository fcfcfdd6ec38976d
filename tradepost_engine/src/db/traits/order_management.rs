use thiserror::Error;

use crate::db_types::{OrderWithItems, UserId};

/// Read-only access to the order ledger. Orders are written exclusively by
/// [`MarketplaceDatabase::checkout`](super::MarketplaceDatabase::checkout).
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the user's orders (both Sold and Bought), `created_at` ascending, with their line items nested.
    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<OrderWithItems>, OrderApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
