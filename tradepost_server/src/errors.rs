use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use tradepost_engine::traits::{CatalogApiError, CheckoutError, OrderApiError, UserApiError};

use crate::sessions::CartError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("You must be logged in to do that")]
    Unauthenticated,
    #[error("{0}")]
    RegistrationRejected(String),
    #[error("{0}")]
    AuthenticationError(String),
    #[error("Unauthorised request")]
    InsufficientPermissions,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Item is already in the cart")]
    DuplicateCartEntry,
    #[error("No cart is available for this session")]
    CartUnavailable,
    #[error("No cart entry at index {0}")]
    InvalidIndex(usize),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    SaleConflict(String),
    #[error("No file part in the upload")]
    MissingFilePart,
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            // The reference surface returns 403 for short and duplicate usernames on /register.
            Self::RegistrationRejected(_) => StatusCode::FORBIDDEN,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            // Non-owner mutations come back as 401 rather than 403 on this surface.
            Self::InsufficientPermissions => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateCartEntry => StatusCode::BAD_REQUEST,
            Self::CartUnavailable => StatusCode::BAD_REQUEST,
            Self::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::SaleConflict(_) => StatusCode::CONFLICT,
            // Uploads without a file part are 401 on the reference surface, not 400.
            Self::MissingFilePart => StatusCode::UNAUTHORIZED,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::UsernameTooShort(_) | UserApiError::UsernameTaken => {
                Self::RegistrationRejected(e.to_string())
            },
            UserApiError::UserNotFound | UserApiError::InvalidCredentials => Self::AuthenticationError(e.to_string()),
            UserApiError::PasswordHash(e) => Self::BackendError(e),
            UserApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogApiError::TitleTaken | CatalogApiError::InvalidPrice => Self::ValidationError(e.to_string()),
            CatalogApiError::NotOwner => Self::InsufficientPermissions,
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::ProductConflict(_) => Self::SaleConflict(e.to_string()),
            CheckoutError::SellerNotFound(_) | CheckoutError::BuyerNotFound(_) => Self::NoRecordFound(e.to_string()),
            CheckoutError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CartError> for ServerError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::NoSession => Self::CartUnavailable,
            CartError::Duplicate => Self::DuplicateCartEntry,
            CartError::BadIndex(i) => Self::InvalidIndex(i),
        }
    }
}
