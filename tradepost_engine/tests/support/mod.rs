//! Shared scaffolding for the engine integration tests.
//!
//! Every test gets its own throwaway SQLite file under the system temp directory, so tests can run in parallel
//! without stepping on each other.
#![allow(dead_code)]
use rand::Rng;
use tradepost_engine::{
    db_types::{NewProduct, Product, User, UserId},
    AuthApi,
    CatalogApi,
    SqliteDatabase,
};

pub fn random_db_url() -> String {
    let id: u64 = rand::thread_rng().gen();
    format!("sqlite://{}/tradepost-test-{id:016x}.db", std::env::temp_dir().display())
}

pub async fn new_test_database() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let db = SqliteDatabase::new_with_url(&random_db_url(), 5).await.expect("Could not create test database");
    db.migrate().await.expect("Migrations failed");
    db
}

pub async fn register_user(db: &SqliteDatabase, username: &str) -> User {
    AuthApi::new(db.clone()).register(username, "password123").await.expect("Could not register test user")
}

pub async fn list_product(db: &SqliteDatabase, seller: &UserId, title: &str, price: &str) -> Product {
    let product = NewProduct {
        user_id: seller.clone(),
        title: title.to_string(),
        price: price.parse().expect("Bad test price"),
        category: "general".to_string(),
        description: format!("{title} in good condition"),
        image: "0123456789abcdef0123456789abcdef.png".to_string(),
    };
    CatalogApi::new(db.clone()).add_product(product).await.expect("Could not list test product")
}
