//! Error types for registration and resolution.

use thiserror::Error;

/// A boxed error as returned by factories and `Injectable::inject`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for the `fibre_di` library.
///
/// Resolving a contract that has no registration is *not* an error; the
/// resolution methods return `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid registration for '{contract}': {reason}")]
  InvalidRegistration { contract: String, reason: String },

  #[error("Unknown lifecycle '{0}', expected one of: singleton, transient, scoped")]
  UnknownLifecycle(String),

  #[error("Missing required dependency: {contract}")]
  MissingDependency { contract: String },

  #[error("Instance resolved for '{contract}' is not an Arc<{expected}>")]
  TypeMismatch {
    contract: String,
    expected: &'static str,
  },

  #[error("Failed to activate '{contract}': {source}")]
  Activation {
    contract: String,
    #[source]
    source: BoxError,
  },
}

impl Error {
  /// Wraps an error raised while constructing `contract`.
  ///
  /// Errors that already are a `fibre_di::Error` come from a nested
  /// resolution and are passed through untouched, so the caller sees the
  /// innermost failure instead of a chain of activation wrappers.
  pub(crate) fn activation(contract: String, source: BoxError) -> Self {
    match source.downcast::<Error>() {
      Ok(inner) => *inner,
      Err(source) => Error::Activation { contract, source },
    }
  }
}

/// A specialized `Result` type for `fibre_di` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
