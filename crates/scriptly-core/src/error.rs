//! Error types for `scriptly-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A wire identifier that cannot be converted to the store's native id
  /// type. Request-level error, never a crash.
  #[error("invalid identifier: {0:?}")]
  InvalidId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
