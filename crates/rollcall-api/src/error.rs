//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rollcall_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store failure from a read path.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }

  /// Wrap a store failure from a write path: a schema-level uniqueness
  /// rejection (the loser of a check-then-insert race) becomes a conflict
  /// with `conflict_msg`, anything else an internal store error.
  pub fn from_write<E: StoreError>(e: E, conflict_msg: &str) -> Self {
    if e.is_unique_violation() {
      ApiError::Conflict(conflict_msg.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl From<rollcall_core::Error> for ApiError {
  fn from(e: rollcall_core::Error) -> Self {
    match e {
      rollcall_core::Error::Validation(m) => ApiError::BadRequest(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    // The published interface surfaces uniqueness conflicts as 400, same as
    // other bad requests.
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
