//! Contract identities.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The stable key a registration is stored and resolved under.
///
/// A key is the `TypeId` of the contract (a concrete type or a `dyn Trait`)
/// plus an optional name. Two keys are equal when both parts match; the
/// recorded type name only feeds diagnostics.
#[derive(Clone)]
pub struct ContractKey {
  type_id: TypeId,
  type_name: &'static str,
  name: Option<String>,
}

impl ContractKey {
  /// The unnamed key for contract `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: None,
    }
  }

  /// A named key for contract `T`, distinct from `ContractKey::of::<T>()`.
  pub fn named<T: ?Sized + Any>(name: &str) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: Some(name.to_owned()),
    }
  }

  /// Returns this key with `name` attached.
  pub fn with_name(mut self, name: &str) -> Self {
    self.name = Some(name.to_owned());
    self
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

impl PartialEq for ContractKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for ContractKey {}

impl Hash for ContractKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Debug for ContractKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}

impl fmt::Display for ContractKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{}#{}", self.type_name, name),
      None => f.write_str(self.type_name),
    }
  }
}
