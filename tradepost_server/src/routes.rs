//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions, which get executed
//! concurrently by worker threads and thus don't block execution.
use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{cookie::Cookie, get, post, web, HttpRequest, HttpResponse, Responder};
use futures::{StreamExt, TryStreamExt};
use log::*;
use serde_json::json;
use tradepost_common::Cents;
use tradepost_engine::{
    db_types::{NewProduct, ProductSnapshot, UserId},
    traits::{CatalogManagement, MarketplaceDatabase, UserManagement},
    AuthApi,
    CatalogApi,
    OrderFlowApi,
};

use crate::{
    data_objects::Credentials,
    errors::ServerError,
    sessions::{SessionStore, SESSION_COOKIE},
    uploads::ImageStore,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Pulls the session token out of the request cookie, if there is one.
fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Resolves the request to a logged-in user, or fails with a 401.
fn require_user(req: &HttpRequest, sessions: &SessionStore) -> Result<(String, UserId), ServerError> {
    let token = session_token(req).ok_or(ServerError::Unauthenticated)?;
    let user_id = sessions.user_id(&token).ok_or(ServerError::Unauthenticated)?;
    Ok((token, user_id))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token).path("/").http_only(true).finish()
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Users   ----------------------------------------------------
route!(current_user => Get "/user" impl UserManagement);
/// Returns the logged-in user's public projection. The password hash is never part of a response; the fields
/// exposed here are enumerated deliberately.
pub async fn current_user<B: UserManagement>(
    req: HttpRequest,
    api: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let (_, user_id) = require_user(&req, &sessions)?;
    let user = api.fetch_user(&user_id).await?.ok_or(ServerError::Unauthenticated)?;
    Ok(HttpResponse::Ok().json(json!({
        "id": user.id,
        "username": user.username,
        "created": user.created_at,
    })))
}

route!(user_products => Get "/user/{username}/products" impl CatalogManagement);
pub async fn user_products<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = path.into_inner();
    debug!("💻️ GET products for user [{username}]");
    let products = api.products_for_user(&username).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(register => Post "/register" impl UserManagement);
/// Creates a new account and logs it straight in with a fresh session.
pub async fn register<B: UserManagement>(
    req: HttpRequest,
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let creds = body.into_inner();
    trace!("💻️ Received registration request for [{}]", creds.username);
    let user = api.register(&creds.username, &creds.password).await?;
    if let Some(old) = session_token(&req) {
        sessions.end_session(&old);
    }
    let token = sessions.start_session(user.id);
    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(json!({"status": "success!"})))
}

route!(login => Post "/login" impl UserManagement);
/// Checks credentials and opens a fresh session. Any previous session (and its cart) is discarded.
pub async fn login<B: UserManagement>(
    req: HttpRequest,
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let creds = body.into_inner();
    trace!("💻️ Received login request for [{}]", creds.username);
    let user = api.authenticate(&creds.username, &creds.password).await?;
    if let Some(old) = session_token(&req) {
        sessions.end_session(&old);
    }
    let token = sessions.start_session(user.id);
    Ok(HttpResponse::Ok().cookie(session_cookie(token)).json(json!({"status": "success"})))
}

#[get("/logout")]
pub async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> impl Responder {
    if let Some(token) = session_token(&req) {
        sessions.end_session(&token);
    }
    let mut expired = Cookie::new(SESSION_COOKIE, "");
    expired.make_removal();
    HttpResponse::Ok().cookie(expired).json(json!({"status": "success"}))
}

//----------------------------------------------   Cart   ----------------------------------------------------
#[get("/cart")]
pub async fn get_cart(req: HttpRequest, sessions: web::Data<SessionStore>) -> impl Responder {
    match session_token(&req).and_then(|t| sessions.cart(&t)) {
        Some(cart) => HttpResponse::Ok().json(cart),
        None => HttpResponse::Ok().json(json!({"status": "empty"})),
    }
}

#[post("/add-to-cart")]
pub async fn add_to_cart(
    req: HttpRequest,
    body: web::Json<ProductSnapshot>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let token = session_token(&req).ok_or(ServerError::CartUnavailable)?;
    let snapshot = body.into_inner();
    trace!("💻️ Adding [{}] to the cart", snapshot.title);
    sessions.add_to_cart(&token, snapshot)?;
    Ok(HttpResponse::Ok().json(json!({"status": "added"})))
}

#[get("/remove-from-cart/{index}")]
pub async fn remove_from_cart(
    req: HttpRequest,
    path: web::Path<usize>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let index = path.into_inner();
    let token = session_token(&req).ok_or(ServerError::CartUnavailable)?;
    let removed = sessions.remove_from_cart(&token, index)?;
    trace!("💻️ Removed [{}] from the cart", removed.title);
    // Capital S, as the original surface has always returned it.
    Ok(HttpResponse::Ok().json(json!({"Status": "deleted"})))
}

//----------------------------------------------   Orders   ----------------------------------------------------
route!(checkout => Post "/checkout" impl MarketplaceDatabase);
/// Converts the posted cart snapshots into order-ledger entries.
///
/// The engine runs the whole batch in a single transaction; the session cart is only cleared once that
/// transaction has committed, so a conflict leaves both the store and the cart untouched.
pub async fn checkout<B: MarketplaceDatabase>(
    req: HttpRequest,
    body: web::Json<Vec<ProductSnapshot>>,
    api: web::Data<OrderFlowApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let (token, buyer_id) = require_user(&req, &sessions)?;
    let entries = body.into_inner();
    let receipt = api.checkout(&buyer_id, &entries).await?;
    // An empty batch creates no order, so the session cart must survive it too.
    if receipt.order.is_some() {
        sessions.clear_cart(&token);
    }
    trace!("💻️ Checkout wrote {} items for {buyer_id}", receipt.items.len());
    Ok(HttpResponse::Ok().body("Success"))
}

route!(get_orders => Get "/get-orders" impl MarketplaceDatabase);
pub async fn get_orders<B: MarketplaceDatabase>(
    req: HttpRequest,
    api: web::Data<OrderFlowApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let (_, user_id) = require_user(&req, &sessions)?;
    let orders = api.orders_for_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Catalog   ----------------------------------------------------
route!(add_product => Post "/add-product" impl CatalogManagement);
/// Lists a new product from a multipart form (`file`, `title`, `price`, `category`, `description`).
///
/// The image is stored under a generated name before the product row is written, so the catalog never references
/// a file that does not exist.
pub async fn add_product<B: CatalogManagement>(
    req: HttpRequest,
    mut payload: Multipart,
    api: web::Data<CatalogApi<B>>,
    sessions: web::Data<SessionStore>,
    images: web::Data<ImageStore>,
) -> Result<HttpResponse, ServerError> {
    let (_, user_id) = require_user(&req, &sessions)?;
    let mut image: Option<String> = None;
    let mut fields: HashMap<String, String> = HashMap::new();
    while let Some(mut field) = payload.try_next().await.map_err(|e| ServerError::ValidationError(e.to_string()))? {
        let name = field.name().to_string();
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServerError::ValidationError(e.to_string()))?;
            if data.len() + chunk.len() > images.max_bytes() {
                return Err(ServerError::ValidationError("Upload exceeds the size limit".to_string()));
            }
            data.extend_from_slice(&chunk);
        }
        if name == "file" {
            let filename =
                field.content_disposition().get_filename().map(str::to_string).unwrap_or_default();
            image = Some(images.save(&filename, &data).await?);
        } else {
            let value = String::from_utf8(data)
                .map_err(|_| ServerError::ValidationError(format!("Field {name} is not valid UTF-8")))?;
            fields.insert(name, value);
        }
    }
    let image = image.ok_or(ServerError::MissingFilePart)?;
    let mut form_field = |name: &str| {
        fields.remove(name).ok_or_else(|| ServerError::ValidationError(format!("Missing form field: {name}")))
    };
    let title = form_field("title")?;
    let price = form_field("price")?
        .parse::<Cents>()
        .map_err(|e| ServerError::ValidationError(e.to_string()))?;
    let category = form_field("category")?;
    let description = form_field("description")?;
    api.add_product(NewProduct { user_id, title, price, category, description, image }).await?;
    Ok(HttpResponse::Ok().json(json!({"status": "success"})))
}

route!(remove_product => Get "/remove-product/{id}" impl CatalogManagement);
pub async fn remove_product<B: CatalogManagement>(
    req: HttpRequest,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ServerError> {
    let (_, user_id) = require_user(&req, &sessions)?;
    let id = path.into_inner();
    api.remove_product(id, &user_id).await?;
    Ok(HttpResponse::Ok().json(json!({"status": "deleted"})))
}

route!(products => Get "/products" impl CatalogManagement);
pub async fn products<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let products = api.all_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{id}" impl CatalogManagement);
pub async fn product_by_id<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let product = api.product(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("No product {id}")))?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Images   ----------------------------------------------------
#[get("/image/{filename}")]
pub async fn fetch_image(
    path: web::Path<String>,
    images: web::Data<ImageStore>,
) -> Result<HttpResponse, ServerError> {
    let filename = path.into_inner();
    let (bytes, content_type) = images.fetch(&filename).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
