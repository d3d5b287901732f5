//! Lifecycle policies.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// How instances of a registered contract are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifecycle {
  /// One instance for the lifetime of the container, shared by every scope.
  ///
  /// The instance is built in the scope of whichever resolution reaches it
  /// first. Scoped dependencies it resolves while being built come from that
  /// scope and stay with the singleton after the scope is superseded.
  Singleton,
  /// A fresh instance on every resolution. Never cached.
  Transient,
  /// One instance per scope.
  Scoped,
}

impl Lifecycle {
  pub fn as_str(&self) -> &'static str {
    match self {
      Lifecycle::Singleton => "singleton",
      Lifecycle::Transient => "transient",
      Lifecycle::Scoped => "scoped",
    }
  }
}

impl fmt::Display for Lifecycle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Lifecycle {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "singleton" => Ok(Lifecycle::Singleton),
      "transient" => Ok(Lifecycle::Transient),
      "scoped" => Ok(Lifecycle::Scoped),
      _ => Err(Error::UnknownLifecycle(s.to_owned())),
    }
  }
}
