//! SQLite database module for the Tradepost marketplace.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
