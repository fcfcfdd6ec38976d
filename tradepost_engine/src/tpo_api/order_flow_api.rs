use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CheckoutReceipt, OrderWithItems, ProductSnapshot, UserId},
    traits::{CheckoutError, MarketplaceDatabase, OrderApiError},
};

/// Checkout and order-history access.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: MarketplaceDatabase
{
    /// Runs the atomic checkout for the buyer's cart snapshots. See
    /// [`MarketplaceDatabase::checkout`] for the transaction contract.
    pub async fn checkout(
        &self,
        buyer_id: &UserId,
        entries: &[ProductSnapshot],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let receipt = self.db.checkout(buyer_id, entries).await?;
        if let Some(order) = &receipt.order {
            info!("🛒️ Order #{} placed by {buyer_id} ({} items)", order.id, receipt.items.len());
        }
        Ok(receipt)
    }

    /// The user's full order history, oldest first, Sold and Bought interleaved.
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<OrderWithItems>, OrderApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }
}
