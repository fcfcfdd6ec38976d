use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use tradepost_engine::{AuthApi, CatalogApi, OrderFlowApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        add_to_cart,
        fetch_image,
        get_cart,
        health,
        logout,
        remove_from_cart,
        AddProductRoute,
        CheckoutRoute,
        CurrentUserRoute,
        GetOrdersRoute,
        LoginRoute,
        ProductByIdRoute,
        ProductsRoute,
        RegisterRoute,
        RemoveProductRoute,
        UserProductsRoute,
    },
    sessions::SessionStore,
    uploads::ImageStore,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let images = ImageStore::new(config.upload_dir.clone(), config.max_upload_bytes);
    images.ensure_dir().await?;
    info!("🚀️ Database and image store ready");
    let srv = create_server_instance(config, db, images)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    images: ImageStore,
) -> Result<Server, ServerError> {
    // Sessions and the image store are shared across workers; the API objects are cheap clones of the pool.
    let sessions = web::Data::new(SessionStore::new(config.session_ttl));
    let images = web::Data::new(images);
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tpo::access_log"))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(orders_api))
            .app_data(sessions.clone())
            .app_data(images.clone())
            .service(health)
            .service(logout)
            .service(get_cart)
            .service(add_to_cart)
            .service(remove_from_cart)
            .service(fetch_image)
            .service(CurrentUserRoute::<SqliteDatabase>::new())
            .service(UserProductsRoute::<SqliteDatabase>::new())
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(GetOrdersRoute::<SqliteDatabase>::new())
            .service(AddProductRoute::<SqliteDatabase>::new())
            .service(RemoveProductRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
