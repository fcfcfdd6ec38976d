//! Interface contracts for marketplace database backends.
//!
//! The module defines the behaviour a storage backend needs to expose in order to act as a backend for the
//! Tradepost server.
//!
//! * [`UserManagement`] covers the identity store: creating users and looking them up.
//! * [`CatalogManagement`] covers product listings, including the ownership check on deletion.
//! * [`OrderManagement`] provides read-only access to the order ledger.
//! * [`MarketplaceDatabase`] is the top-level contract and owns the checkout transaction, the only multi-entity
//!   write in the system.
mod catalog_management;
mod marketplace_database;
mod order_management;
mod user_management;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use marketplace_database::{CheckoutError, MarketplaceDatabase};
pub use order_management::{OrderApiError, OrderManagement};
pub use user_management::{UserApiError, UserManagement};
