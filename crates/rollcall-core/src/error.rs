//! Error types for `rollcall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A payload field failed a presence, length, or nullability check.
  #[error("validation error: {0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
