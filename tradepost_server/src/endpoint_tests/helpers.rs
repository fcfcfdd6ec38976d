use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, web};
use chrono::{Duration, Utc};
use tradepost_common::Secret;
use tradepost_engine::{
    db_types::{Product, User, UserId},
    helpers::passwords,
};

use crate::sessions::SessionStore;

pub fn test_user(username: &str, password: &str) -> User {
    let hash = passwords::hash_password(password).expect("Could not hash test password");
    User { id: UserId::random(), username: username.to_string(), password_hash: Secret::new(hash), created_at: Utc::now() }
}

pub fn test_product(id: i64, owner: &UserId, title: &str) -> Product {
    Product {
        id,
        user_id: owner.clone(),
        title: title.to_string(),
        price: "10".parse().expect("Bad test price"),
        category: "general".to_string(),
        description: format!("{title} in good condition"),
        image: "0123456789abcdef0123456789abcdef.png".to_string(),
    }
}

pub fn session_store() -> web::Data<SessionStore> {
    web::Data::new(SessionStore::new(Duration::hours(1)))
}

pub fn status_and_body<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, String) {
    let (_, res) = res.into_parts();
    let status = res.status();
    let body = match res.into_body().try_into_bytes() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => panic!("Response body was not available"),
    };
    (status, body)
}
