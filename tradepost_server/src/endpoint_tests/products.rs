use actix_web::{cookie::Cookie, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use tradepost_engine::{db_types::UserId, traits::CatalogApiError, CatalogApi};

use super::{
    helpers::{session_store, status_and_body, test_product},
    mocks::MockCatalog,
};
use crate::{
    routes::{AddProductRoute, ProductByIdRoute, ProductsRoute, RemoveProductRoute, UserProductsRoute},
    sessions::{SessionStore, SESSION_COOKIE},
    uploads::ImageStore,
};

fn configure_app(catalog: MockCatalog, sessions: web::Data<SessionStore>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let catalog_api = CatalogApi::new(catalog);
        let images = ImageStore::new(std::env::temp_dir(), 1024 * 1024);
        cfg.app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(images))
            .app_data(sessions)
            .service(ProductsRoute::<MockCatalog>::new())
            .service(ProductByIdRoute::<MockCatalog>::new())
            .service(UserProductsRoute::<MockCatalog>::new())
            .service(RemoveProductRoute::<MockCatalog>::new())
            .service(AddProductRoute::<MockCatalog>::new());
    }
}

#[actix_web::test]
async fn the_catalog_is_public() {
    let owner = UserId::random();
    let list = vec![test_product(1, &owner, "Lamp"), test_product(2, &owner, "Rug")];
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_all_products().returning(move || Ok(list.clone()));
    let app = test::init_service(App::new().configure(configure_app(catalog, session_store()))).await;
    let req = TestRequest::get().uri("/products").to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::OK);
    let products: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 2);
    assert_eq!(products[1]["title"], "Rug");
}

#[actix_web::test]
async fn unknown_products_are_404() {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_product().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(configure_app(catalog, session_store()))).await;
    let req = TestRequest::get().uri("/products/42").to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No product 42"}"#);
}

#[actix_web::test]
async fn removing_someone_elses_product_is_unauthorised() {
    let mut catalog = MockCatalog::new();
    catalog.expect_delete_product().returning(|_, _| Err(CatalogApiError::NotOwner));
    let sessions = session_store();
    let token = sessions.start_session(UserId::random());
    let app = test::init_service(App::new().configure(configure_app(catalog, sessions))).await;
    let req = TestRequest::get().uri("/remove-product/1").cookie(Cookie::new(SESSION_COOKIE, token)).to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Unauthorised request"}"#);
}

#[actix_web::test]
async fn removing_a_product_requires_a_session() {
    let app = test::init_service(App::new().configure(configure_app(MockCatalog::new(), session_store()))).await;
    let req = TestRequest::get().uri("/remove-product/1").to_request();
    let (status, _) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn uploads_without_a_file_part_are_rejected() {
    let sessions = session_store();
    let token = sessions.start_session(UserId::random());
    let app = test::init_service(App::new().configure(configure_app(MockCatalog::new(), sessions))).await;
    // A multipart body carrying only text fields, no file.
    let body = "--boundary\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nLamp\r\n--boundary--\r\n";
    let req = TestRequest::post()
        .uri("/add-product")
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .insert_header(("content-type", "multipart/form-data; boundary=boundary"))
        .set_payload(body)
        .to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"No file part in the upload"}"#);
}

#[actix_web::test]
async fn a_users_listings_are_public() {
    let owner = UserId::random();
    let list = vec![test_product(1, &owner, "Lamp")];
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_products_for_user().returning(move |_| Ok(list.clone()));
    let app = test::init_service(App::new().configure(configure_app(catalog, session_store()))).await;
    let req = TestRequest::get().uri("/user/alice/products").to_request();
    let (status, body) = status_and_body(test::call_service(&app, req).await);
    assert_eq!(status, StatusCode::OK);
    let products: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["title"], "Lamp");
}
