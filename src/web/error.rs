use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::waitlist::RegistrarError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("request body could not be parsed: {0}")]
    MalformedBody(String),

    #[error("registrar error: {0}")]
    Registrar(#[from] RegistrarError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::MalformedBody(detail) => (StatusCode::BAD_REQUEST, InvalidBody(detail.clone())),
            Error::Registrar(RegistrarError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, EmailRequired)
            }
            Error::Registrar(RegistrarError::Duplicate) => (StatusCode::CONFLICT, EmailTaken),
            Error::Registrar(RegistrarError::Store(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServiceError)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The only error information that reaches the client.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Email is required")]
    EmailRequired,
    #[display("This email is already registered")]
    EmailTaken,
    #[display("Invalid request body: {_0}")]
    InvalidBody(String),
    #[display("Server error. Please try again later.")]
    ServiceError,
}
