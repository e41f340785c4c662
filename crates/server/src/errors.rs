//! JSON error envelope and the 1:1 mapping from business errors to HTTP
//! statuses. Every error body has the shape
//! `{ "error": { "code", "message", "fields"? } }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::validation::FieldError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: u16,
    pub message: String,
    pub fields: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: u16, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into(), fields: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, 1001, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, 1404, message)
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: 1001,
            message: "validation failed".into(),
            fields: Some(fields),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": { "code": self.code, "message": self.message }
        });
        if let Some(fields) = &self.fields {
            body["error"]["fields"] = serde_json::to_value(fields).unwrap_or_default();
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        let status = match &e {
            AuthError::Validation(fields) => return ApiError::validation(fields.clone()),
            AuthError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountLocked => StatusCode::LOCKED,
            AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
            AuthError::TokenInvalid | AuthError::TokenExpired => StatusCode::BAD_REQUEST,
            AuthError::TokenAlreadyUsed => StatusCode::CONFLICT,
            AuthError::SessionExpired
            | AuthError::SessionRevoked
            | AuthError::SessionReuseDetected => StatusCode::UNAUTHORIZED,
            AuthError::Hashing(_) | AuthError::Token(_) | AuthError::Store(_) => {
                error!(code, err = %e, "auth internal error");
                return ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "internal error",
                );
            }
        };
        warn!(code, err = %e, "auth request rejected");
        ApiError::new(status, code, e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        use models::errors::ModelError;
        match e {
            ServiceError::Validation(msg) => ApiError::bad_request(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Model(ModelError::Validation(msg)) => ApiError::bad_request(msg),
            ServiceError::Model(ModelError::Conflict(msg)) => {
                ApiError::new(StatusCode::CONFLICT, 1409, msg)
            }
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                error!(err = %msg, "database error");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, 1500, "internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_statuses() {
        assert_eq!(ApiError::from(AuthError::EmailAlreadyRegistered).status, StatusCode::CONFLICT);
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::AccountLocked).status, StatusCode::LOCKED);
        assert_eq!(ApiError::from(AuthError::EmailNotVerified).status, StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(AuthError::TokenAlreadyUsed).status, StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(AuthError::SessionReuseDetected).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::Store("down".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_carries_fields() {
        let err = ApiError::from(AuthError::Validation(vec![FieldError::new(
            "password",
            "too weak",
        )]));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.fields.unwrap()[0].field, "password");
    }
}
