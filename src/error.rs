//! Error classification shared by the query layer and the HTTP handlers.
//!
//! Every query function resolves to [`ApiResult`]. Handlers return the error
//! untouched and actix renders it through [`ResponseError`], so there is one
//! place where a classification becomes a status code and a `{ "msg": ... }`
//! body.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use rusqlite::{ffi, ErrorCode};
use serde::Serialize;
use thiserror::Error;

/// Message used whenever a caller-supplied value has the wrong type.
pub const INVALID_DATA_TYPE: &str = "invalid data type in query";
pub const INVALID_REQUEST_BODY: &str = "invalid request body";
pub const PATH_NOT_FOUND: &str = "path not found";
pub const REFERENCED_MISSING: &str = "referenced resource does not exist";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A looked-up resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller input failed a type or whitelist check
    #[error("{0}")]
    InvalidInput(String),

    /// The store rejected a write because of a schema constraint
    #[error("{0}")]
    ConstraintViolation(String),

    /// No route matched the request
    #[error("path not found")]
    RouteNotFound,

    /// Unclassified store failure
    #[error("store error: {0}")]
    Store(#[source] rusqlite::Error),
}

impl ApiError {
    pub fn invalid_data_type() -> Self {
        ApiError::InvalidInput(INVALID_DATA_TYPE.to_string())
    }

    /// A foreign key on insert points at no existing row
    pub fn referenced_missing() -> Self {
        ApiError::ConstraintViolation(REFERENCED_MISSING.to_string())
    }

    /// Message exposed to the client. Store internals are never leaked.
    pub fn message(&self) -> String {
        match self {
            ApiError::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::IntegralValueOutOfRange(..)
            | rusqlite::Error::ToSqlConversionFailure(_) => ApiError::invalid_data_type(),
            rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::TypeMismatch => {
                ApiError::invalid_data_type()
            }
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ApiError::referenced_missing(),
                    ffi::SQLITE_CONSTRAINT_NOTNULL => {
                        ApiError::InvalidInput("missing required field".to_string())
                    }
                    _ => ApiError::ConstraintViolation("constraint violation".to_string()),
                }
            }
            _ => ApiError::Store(err),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    msg: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ConstraintViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("[API] {}", self);
        } else {
            log::debug!("[API] {} -> {}", status.as_u16(), self);
        }
        HttpResponse::build(status).json(ErrorBody {
            msg: self.message(),
        })
    }
}

// Extractor rejections at the HTTP boundary

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("[API] bad path parameter on {}: {}", req.path(), err);
    ApiError::invalid_data_type().into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("[API] bad query string on {}: {}", req.path(), err);
    ApiError::invalid_data_type().into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("[API] bad request body on {}: {}", req.path(), err);
    ApiError::InvalidInput(INVALID_REQUEST_BODY.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    fn sqlite_failure(code: ErrorCode, extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code,
                extended_code,
            },
            None,
        )
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("review id not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::RouteNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::invalid_data_type().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ConstraintViolation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Store(rusqlite::Error::QueryReturnedNoRows).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_foreign_key_failure_is_constraint_violation() {
        let err = ApiError::from(sqlite_failure(
            ErrorCode::ConstraintViolation,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
        ));
        assert!(matches!(err, ApiError::ConstraintViolation(_)));
        assert_eq!(err.message(), "referenced resource does not exist");
    }

    #[test]
    fn test_not_null_failure_is_invalid_input() {
        let err = ApiError::from(sqlite_failure(
            ErrorCode::ConstraintViolation,
            ffi::SQLITE_CONSTRAINT_NOTNULL,
        ));
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_type_mismatch_is_invalid_data_type() {
        let err = ApiError::from(sqlite_failure(ErrorCode::TypeMismatch, ffi::SQLITE_MISMATCH));
        assert_eq!(err.message(), INVALID_DATA_TYPE);
    }

    #[test]
    fn test_store_error_message_is_not_leaked() {
        let err = ApiError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(err.message(), "internal server error");
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = ApiError::RouteNotFound.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["msg"], PATH_NOT_FOUND);
    }
}
