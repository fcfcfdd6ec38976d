use actix_web::{
    cookie::Cookie,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use serde_json::json;
use tradepost_engine::{traits::UserApiError, AuthApi};

use super::{
    helpers::{session_store, status_and_body, test_user},
    mocks::MockUserStore,
};
use crate::{
    routes::{CurrentUserRoute, LoginRoute, RegisterRoute},
    sessions::{SessionStore, SESSION_COOKIE},
};

fn configure_app(
    user_store: MockUserStore,
    sessions: web::Data<SessionStore>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let auth_api = AuthApi::new(user_store);
        cfg.app_data(web::Data::new(auth_api))
            .app_data(sessions)
            .service(RegisterRoute::<MockUserStore>::new())
            .service(LoginRoute::<MockUserStore>::new())
            .service(CurrentUserRoute::<MockUserStore>::new());
    }
}

#[actix_web::test]
async fn short_usernames_cannot_register() {
    let _ = env_logger::try_init().ok();
    // Validation trips before the store is touched, so no expectations are needed.
    let app = App::new().configure(configure_app(MockUserStore::new(), session_store()));
    let app = test::init_service(app).await;
    let req = TestRequest::post().uri("/register").set_json(json!({"username": "bob", "password": "pw"})).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Username must be at least 4 characters"}"#);
}

#[actix_web::test]
async fn duplicate_usernames_cannot_register() {
    let mut user_store = MockUserStore::new();
    user_store.expect_create_user().returning(|_| Err(UserApiError::UsernameTaken));
    let app = App::new().configure(configure_app(user_store, session_store()));
    let app = test::init_service(app).await;
    let req =
        TestRequest::post().uri("/register").set_json(json!({"username": "alice", "password": "pw"})).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Username already taken!"}"#);
}

#[actix_web::test]
async fn registration_opens_a_session() {
    let user = test_user("alice", "hunter22");
    let mut user_store = MockUserStore::new();
    user_store.expect_create_user().returning(move |_| Ok(user.clone()));
    let app = App::new().configure(configure_app(user_store, session_store()));
    let app = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/register")
        .set_json(json!({"username": "alice", "password": "hunter22"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    let has_session = res.response().cookies().any(|c| c.name() == SESSION_COOKIE && !c.value().is_empty());
    assert!(has_session, "registration should set a session cookie");
    let (status, body) = status_and_body(res);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"success!"}"#);
}

#[actix_web::test]
async fn login_with_an_unknown_username() {
    let mut user_store = MockUserStore::new();
    user_store.expect_fetch_user_by_username().returning(|_| Ok(None));
    let app = App::new().configure(configure_app(user_store, session_store()));
    let app = test::init_service(app).await;
    let req = TestRequest::post().uri("/login").set_json(json!({"username": "ghost", "password": "pw"})).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Incorrect Username"}"#);
}

#[actix_web::test]
async fn login_with_the_wrong_password() {
    let user = test_user("alice", "hunter22");
    let mut user_store = MockUserStore::new();
    user_store.expect_fetch_user_by_username().returning(move |_| Ok(Some(user.clone())));
    let app = App::new().configure(configure_app(user_store, session_store()));
    let app = test::init_service(app).await;
    let req =
        TestRequest::post().uri("/login").set_json(json!({"username": "alice", "password": "wrong"})).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Incorrect password"}"#);
}

#[actix_web::test]
async fn login_with_valid_credentials() {
    let user = test_user("alice", "hunter22");
    let mut user_store = MockUserStore::new();
    user_store.expect_fetch_user_by_username().returning(move |_| Ok(Some(user.clone())));
    let app = App::new().configure(configure_app(user_store, session_store()));
    let app = test::init_service(app).await;
    let req =
        TestRequest::post().uri("/login").set_json(json!({"username": "alice", "password": "hunter22"})).to_request();
    let res = test::call_service(&app, req).await;
    let has_session = res.response().cookies().any(|c| c.name() == SESSION_COOKIE && !c.value().is_empty());
    assert!(has_session, "login should set a session cookie");
    let (status, body) = status_and_body(res);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"success"}"#);
}

#[actix_web::test]
async fn current_user_requires_a_session() {
    let app = App::new().configure(configure_app(MockUserStore::new(), session_store()));
    let app = test::init_service(app).await;
    let req = TestRequest::get().uri("/user").to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"You must be logged in to do that"}"#);
}

#[actix_web::test]
async fn current_user_projection_excludes_the_password_hash() {
    let user = test_user("alice", "hunter22");
    let user_id = user.id.clone();
    let mut user_store = MockUserStore::new();
    user_store.expect_fetch_user_by_id().returning(move |_| Ok(Some(user.clone())));
    let sessions = session_store();
    let token = sessions.start_session(user_id.clone());
    let app = App::new().configure(configure_app(user_store, sessions));
    let app = test::init_service(app).await;
    let req = TestRequest::get().uri("/user").cookie(Cookie::new(SESSION_COOKIE, token)).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alice"));
    assert!(body.contains(user_id.as_str()));
    assert!(!body.contains("argon2"), "the password hash must never be serialized: {body}");
}
