use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product, UserId},
    traits::CatalogApiError,
};

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, CatalogApiError> {
    let product: Product = sqlx::query_as(
        r#"
            INSERT INTO products (user_id, title, price, category, description, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(&product.user_id)
    .bind(&product.title)
    .bind(product.price)
    .bind(&product.category)
    .bind(&product.description)
    .bind(&product.image)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Product [{}] listed with id {}", product.title, product.id);
    Ok(product)
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_all_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products ORDER BY id ASC").fetch_all(conn).await
}

pub async fn fetch_products_for_user(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT products.*
            FROM products JOIN users ON products.user_id = users.id
            WHERE users.username = $1
            ORDER BY products.id ASC
        "#,
    )
    .bind(username)
    .fetch_all(conn)
    .await
}

/// Removes a product on behalf of `requester`. Fails with [`CatalogApiError::NotOwner`] when the requester does
/// not own the listing, leaving the row in place.
pub async fn delete_product_checked(
    id: i64,
    requester: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Product, CatalogApiError> {
    let product = fetch_product(id, &mut *conn).await?.ok_or(CatalogApiError::ProductNotFound(id))?;
    if &product.user_id != requester {
        return Err(CatalogApiError::NotOwner);
    }
    sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    debug!("🗃️ Product [{}] removed by its owner", product.title);
    Ok(product)
}

/// Unconditionally deletes a product row, returning `false` if it was already gone. Checkout uses this inside its
/// transaction to detect a concurrent sale of the same product.
pub async fn delete_product_row(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
