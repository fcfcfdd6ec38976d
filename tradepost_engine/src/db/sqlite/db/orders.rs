use sqlx::SqliteConnection;

use crate::db_types::{Order, OrderItem, OrderStatusType, ProductSnapshot, UserId};

pub async fn insert_order(
    user_id: &UserId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, status)
            VALUES ($1, $2)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(status)
    .fetch_one(conn)
    .await
}

/// Writes one denormalized line item for the given order, copying the display fields out of the cart snapshot.
pub async fn insert_order_item(
    order_id: i64,
    entry: &ProductSnapshot,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, title, image, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(entry.id)
    .bind(&entry.title)
    .bind(&entry.image)
    .bind(entry.price)
    .fetch_one(conn)
    .await
}

/// Fetches the user's orders, `created_at` ascending (id breaks ties within the same second).
pub async fn fetch_orders_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await
}
