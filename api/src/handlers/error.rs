//! Domain error to HTTP response mapping
//!
//! Validation failures carry their specific message so a caller can fix the
//! input. Token failures deliberately collapse into one generic message:
//! the wire must not reveal whether a signature, expiry, or store check
//! failed.

use actix_web::HttpResponse;

use crate::dto::ErrorResponse;
use qr_core::errors::DomainError;

/// Generic message for every rejected token
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired access link";

/// Convert a domain error into the appropriate HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Validation(validation_error) => {
            log::warn!("Validation error: {}", validation_error);
            HttpResponse::BadRequest().json(ErrorResponse::new(
                "validation_error",
                validation_error.to_string(),
            ))
        }
        DomainError::Token(token_error) => {
            // Specific reason stays server-side
            log::warn!("Token rejected: {}", token_error);
            HttpResponse::Forbidden().json(ErrorResponse::new(
                "invalid_token",
                INVALID_TOKEN_MESSAGE,
            ))
        }
        DomainError::PermissionDenied => {
            log::warn!("Permission denied");
            HttpResponse::Forbidden().json(ErrorResponse::new(
                "permission_denied",
                "You do not have permission to perform this action",
            ))
        }
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal_error",
                "An internal server error occurred",
            ))
        }
    }
}
