//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every domain failure raised by the auth and task services is one of its variants,
//! and every variant maps to exactly one HTTP status and one stable JSON body:
//!
//! ```json
//! { "error": "<kind>", "message": "<human readable text>" }
//! ```
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers and middleware
//! can return it directly. Server-side failures are logged with their detail and
//! answered with a generic message so internals never reach the client.
//! `From` implementations for `validator::ValidationErrors`, `bcrypt::BcryptError`,
//! `actix_web::error::BlockingError`, [`StoreError`] and [`TokenError`] allow
//! conversion with the `?` operator.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400). The client must fix the request.
    ValidationError(String),
    /// Registration with an email that already belongs to an account (HTTP 400).
    DuplicateEmail,
    /// A profile update tried to take an email owned by another account (HTTP 400).
    EmailTaken,
    /// A new password shorter than the minimum length (HTTP 400).
    WeakPassword,
    /// Login failed. Unknown email and wrong password are reported identically (HTTP 401).
    InvalidCredentials,
    /// Missing, invalid or expired token (HTTP 401).
    Unauthorized(String),
    /// The resource does not exist or does not belong to the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the persistence backend (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Machine readable kind, used as the `error` field of the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::DuplicateEmail => "duplicate_email",
            AppError::EmailTaken => "email_taken",
            AppError::WeakPassword => "weak_password",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateEmail => "Email already registered".into(),
            AppError::EmailTaken => "Email already in use".into(),
            AppError::WeakPassword => "Password must be at least 6 characters".into(),
            AppError::InvalidCredentials => "Invalid credentials".into(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                "Internal server error".into()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateEmail => write!(f, "Duplicate Email"),
            AppError::EmailTaken => write!(f, "Email Taken"),
            AppError::WeakPassword => write!(f, "Weak Password"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::DuplicateEmail
            | AppError::EmailTaken
            | AppError::WeakPassword => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.client_message(),
        }))
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("blocking task failed: {}", error))
    }
}

/// Every token failure means the caller has to authenticate again.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// `DuplicateEmail` is kept as is; callers that update an existing record
/// translate it to `EmailTaken` themselves.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}
