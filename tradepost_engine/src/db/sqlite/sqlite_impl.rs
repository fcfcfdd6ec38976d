//! `SqliteDatabase` is a concrete implementation of a Tradepost marketplace backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders, products, users};
use crate::{
    db_types::{
        CheckoutReceipt,
        NewProduct,
        NewUser,
        OrderStatusType,
        OrderWithItems,
        Product,
        ProductSnapshot,
        User,
        UserId,
    },
    traits::{
        CatalogApiError,
        CatalogManagement,
        CheckoutError,
        MarketplaceDatabase,
        OrderApiError,
        OrderManagement,
        UserApiError,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_username(username, &mut conn).await
    }

    async fn fetch_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product_list = products::fetch_all_products(&mut conn).await?;
        Ok(product_list)
    }

    async fn fetch_products_for_user(&self, username: &str) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let product_list = products::fetch_products_for_user(username, &mut conn).await?;
        Ok(product_list)
    }

    /// The fetch, ownership check and delete run in one transaction so a concurrent checkout cannot interleave
    /// between the check and the removal.
    async fn delete_product(&self, id: i64, requester: &UserId) -> Result<Product, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let product = products::delete_product_checked(id, requester, &mut *tx).await?;
        tx.commit().await?;
        Ok(product)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<OrderWithItems>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order_list = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        let mut result = Vec::with_capacity(order_list.len());
        for order in order_list {
            let items = orders::fetch_items_for_order(order.id, &mut conn).await?;
            result.push(OrderWithItems { order, items });
        }
        Ok(result)
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Takes the buyer's cart snapshots and, in a single atomic transaction:
    /// * creates one `Bought` order for the buyer, shared across all line items,
    /// * per entry, creates a `Sold` order for the seller plus the two denormalized order items,
    /// * deletes the product row, treating an already-deleted row as a concurrent sale.
    ///
    /// Any failure rolls the whole batch back; the loser of a product race sees
    /// [`CheckoutError::ProductConflict`] and no partial writes.
    async fn checkout(
        &self,
        buyer_id: &UserId,
        entries: &[ProductSnapshot],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if entries.is_empty() {
            debug!("🛒️ Checkout for {buyer_id} called with an empty cart. Nothing to do.");
            return Ok(CheckoutReceipt::empty());
        }
        let mut tx = self.pool.begin().await?;
        let buyer = users::fetch_user_by_id(buyer_id, &mut *tx)
            .await
            .map_err(|e| CheckoutError::DatabaseError(e.to_string()))?
            .ok_or_else(|| CheckoutError::BuyerNotFound(buyer_id.clone()))?;
        let bought = orders::insert_order(&buyer.id, OrderStatusType::Bought, &mut *tx).await?;
        trace!("🛒️ Bought order #{} opened for {}", bought.id, buyer.username);
        let mut items = Vec::with_capacity(entries.len());
        let mut sold_order_ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let seller = users::fetch_user_by_id(&entry.user_id, &mut *tx)
                .await
                .map_err(|e| CheckoutError::DatabaseError(e.to_string()))?
                .ok_or_else(|| CheckoutError::SellerNotFound(entry.user_id.clone()))?;
            let sold = orders::insert_order(&seller.id, OrderStatusType::Sold, &mut *tx).await?;
            orders::insert_order_item(sold.id, entry, &mut *tx).await?;
            let item = orders::insert_order_item(bought.id, entry, &mut *tx).await?;
            if !products::delete_product_row(entry.id, &mut *tx).await? {
                // Dropping the transaction rolls back everything written so far.
                debug!("🛒️ Product {} vanished mid-checkout. Rolling the batch back.", entry.id);
                return Err(CheckoutError::ProductConflict(entry.id));
            }
            trace!("🛒️ Product [{}] sold by {} via order #{}", entry.title, seller.username, sold.id);
            sold_order_ids.push(sold.id);
            items.push(item);
        }
        tx.commit().await?;
        debug!("🛒️ Checkout complete: order #{} with {} items for {buyer_id}", bought.id, items.len());
        Ok(CheckoutReceipt { order: Some(bought), items, sold_order_ids })
    }

    async fn close(&mut self) -> Result<(), CheckoutError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment (or the default).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies the embedded schema migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
