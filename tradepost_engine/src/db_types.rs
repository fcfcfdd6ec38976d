use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use tradepost_common::{Cents, Secret};

//--------------------------------------        UserId        --------------------------------------------------------
/// An opaque user identifier: 32 hex characters assigned at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------         User         --------------------------------------------------------
/// A registered user. The password hash is wrapped in [`Secret`] so that it never leaks into log output; response
/// projections enumerate the exposed fields explicitly and omit it entirely.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: Secret<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: Secret<String>,
}

impl NewUser {
    pub fn new<S: Into<String>>(username: S, password_hash: String) -> Self {
        Self { username: username.into(), password_hash: Secret::new(password_hash) }
    }
}

//--------------------------------------       Product        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub user_id: UserId,
    pub title: String,
    pub price: Cents,
    pub category: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub user_id: UserId,
    pub title: String,
    pub price: Cents,
    pub category: String,
    pub description: String,
    pub image: String,
}

//----------------------------------      ProductSnapshot        -----------------------------------------------------
/// A copy of a product's listing fields, taken when the product is added to a cart.
///
/// Snapshots are what the cart holds and what checkout consumes. Whole-value equality drives cart deduplication:
/// two snapshots are the same cart entry iff every field matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: i64,
    /// The seller's user id, carried so that checkout can attribute the Sold order.
    pub user_id: UserId,
    pub title: String,
    pub price: Cents,
    pub category: String,
    pub description: String,
    pub image: String,
}

impl From<Product> for ProductSnapshot {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            title: p.title,
            price: p.price,
            category: p.category,
            description: p.description,
            image: p.image,
        }
    }
}

//----------------------------------      OrderStatusType        -----------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The ledger entry from the seller's perspective.
    Sold,
    /// The ledger entry from the buyer's perspective.
    Bought,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Sold => write!(f, "Sold"),
            OrderStatusType::Bought => write!(f, "Bought"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sold" => Ok(Self::Sold),
            "Bought" => Ok(Self::Bought),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Bought");
            OrderStatusType::Bought
        })
    }
}

//--------------------------------------        Order         --------------------------------------------------------
/// A permanent ledger record. Orders are created in pairs at checkout and never mutated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: UserId,
    pub status: OrderStatusType,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem        -------------------------------------------------------
/// A line item attached to exactly one order. Display fields are denormalized copies of the sold product, which no
/// longer exists by the time anyone reads this record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub title: String,
    pub image: String,
    pub price: Cents,
}

//--------------------------------------    OrderWithItems      ------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//--------------------------------------   CheckoutReceipt      ------------------------------------------------------
/// The result of a successful checkout: the buyer's order with its line items, plus the ids of the per-entry Sold
/// orders that were written in the same transaction. An empty checkout produces an empty receipt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckoutReceipt {
    pub order: Option<Order>,
    pub items: Vec<OrderItem>,
    pub sold_order_ids: Vec<i64>,
}

impl CheckoutReceipt {
    pub fn empty() -> Self {
        Self::default()
    }
}
