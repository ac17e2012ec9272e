use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::validation::FieldError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Failures of the contact endpoint, each mapped to a status and JSON body
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("An error occurred while processing your request. Please try again.")]
    Store(#[from] StoreError),
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ContactError::InvalidBody | ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ContactError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ContactError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, ContactError::MethodNotAllowed) {
            response.insert_header(("Allow", "POST"));
        }

        response.json(ErrorResponse {
            error: self.to_string(),
            details,
        })
    }
}
