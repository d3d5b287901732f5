//! The resolution engine: lookup, lifecycle policy and construction.

use crate::container::Shared;
use crate::error::{Error, Result};
use crate::key::ContractKey;
use crate::lifecycle::Lifecycle;
use crate::registry::{Instance, Registration, Source};
use crate::scope::Scope;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Resolves contracts against one container and one scope.
///
/// Factories and activators receive a `Resolver` bound to the scope the
/// outer resolution runs in, so nested resolutions share its scoped instances
/// and the container's singletons.
///
/// A resolver borrows its container. It cannot be kept inside a resolved
/// instance, which would otherwise keep the container alive through its own
/// singletons or scopes:
///
/// ```compile_fail
/// use fibre_di::{Container, Resolver};
///
/// struct Holder(Resolver<'static>);
///
/// let container = Container::new();
/// container.register_scoped_factory(|resolver| Ok(Holder(resolver.clone())));
/// ```
#[derive(Clone)]
pub struct Resolver<'a> {
  shared: &'a Shared,
  scope: Scope,
}

impl<'a> Resolver<'a> {
  pub(crate) fn new(shared: &'a Shared, scope: Scope) -> Self {
    Self { shared, scope }
  }

  /// The scope this resolver caches scoped instances in.
  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  /// Resolves `key`, returning `Ok(None)` when nothing is registered for it.
  pub fn resolve_key(&self, key: &ContractKey) -> Result<Option<Instance>> {
    let Some(registration) = self.shared.registry.get(key) else {
      tracing::trace!(contract = %key, "no registration");
      return Ok(None);
    };

    let instance = match registration.descriptor().lifecycle() {
      Lifecycle::Singleton => registration
        .singleton()
        .get_or_try_init(|| self.construct(&registration))?
        .clone(),
      Lifecycle::Scoped => {
        let generation = registration.generation();
        match self.scope.get(key, generation) {
          Some(cached) => {
            tracing::trace!(contract = %key, scope = %self.scope.id(), "scoped cache hit");
            cached
          }
          None => {
            let fresh = self.construct(&registration)?;
            self.scope.put(key.clone(), generation, fresh)
          }
        }
      }
      Lifecycle::Transient => self.construct(&registration)?,
    };

    Ok(Some(instance))
  }

  /// Resolves `key` and downcasts the result to `Arc<T>`.
  pub fn resolve_with_key<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &ContractKey,
  ) -> Result<Option<Arc<T>>> {
    match self.resolve_key(key)? {
      Some(instance) => instance
        .downcast::<T>()
        .map(Some)
        .ok_or_else(|| Error::TypeMismatch {
          contract: key.to_string(),
          expected: std::any::type_name::<T>(),
        }),
      None => Ok(None),
    }
  }

  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    self.resolve_with_key::<T>(&ContractKey::of::<T>())
  }

  pub fn resolve_named<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>> {
    self.resolve_with_key::<T>(&ContractKey::named::<T>(name))
  }

  /// Like [`resolve`](Self::resolve), but a missing registration is an
  /// [`Error::MissingDependency`].
  pub fn require<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self.require_with_key::<T>(&ContractKey::of::<T>())
  }

  pub fn require_named<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self.require_with_key::<T>(&ContractKey::named::<T>(name))
  }

  fn require_with_key<T: ?Sized + Any + Send + Sync>(&self, key: &ContractKey) -> Result<Arc<T>> {
    self
      .resolve_with_key::<T>(key)?
      .ok_or_else(|| Error::MissingDependency {
        contract: key.to_string(),
      })
  }

  fn construct(&self, registration: &Registration) -> Result<Instance> {
    let descriptor = registration.descriptor();
    let key = descriptor.key();
    tracing::trace!(
      contract = %key,
      lifecycle = %descriptor.lifecycle(),
      source = descriptor.source().kind(),
      scope = %self.scope.id(),
      "constructing instance"
    );

    let built = match descriptor.source() {
      Source::Implementation(implementation) => self.shared.activator.activate(implementation, self),
      Source::Factory(factory) => factory.call(self),
    };
    let instance = built.map_err(|source| {
      tracing::warn!(contract = %key, error = %source, "activation failed");
      Error::activation(key.to_string(), source)
    })?;

    if instance.contract_type_id() != key.type_id() {
      return Err(Error::TypeMismatch {
        contract: key.to_string(),
        expected: key.type_name(),
      });
    }
    Ok(instance)
  }
}

impl fmt::Debug for Resolver<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Resolver").field("scope", &self.scope).finish()
  }
}
