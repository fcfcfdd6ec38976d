//! # Tradepost engine
//!
//! The engine holds everything the marketplace knows how to do, independent of any HTTP surface:
//!
//! * identity: account creation and credential checking ([`AuthApi`]),
//! * catalog: listing, browsing and delisting products ([`CatalogApi`]),
//! * orders: the atomic checkout and the permanent order ledger ([`OrderFlowApi`]).
//!
//! The API objects are generic over the backend traits in [`traits`], so the server can run against the SQLite
//! implementation in production and against mocks in its endpoint tests.
mod db;

pub mod db_types;
pub mod helpers;
mod tpo_api;

pub use db::traits;
#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use tpo_api::{
    auth_api::{AuthApi, MIN_USERNAME_LENGTH},
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
};
