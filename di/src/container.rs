//! The main `Container` struct and its associated methods.

use crate::activator::{Activator, DefaultActivator};
use crate::error::{BoxError, Result};
use crate::key::ContractKey;
use crate::lifecycle::Lifecycle;
use crate::registry::{Descriptor, Implements, Injectable, Instance, Registry};
use crate::resolver::Resolver;
use crate::scope::{Scope, ScopeTable};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub(crate) struct Shared {
  pub(crate) registry: Registry,
  pub(crate) scopes: ScopeTable,
  pub(crate) activator: Box<dyn Activator>,
}

/// The dependency injection container.
///
/// Holds the registrations for all contracts and the singletons they
/// produced, and tracks the current scope of every thread using it. It is
/// thread-safe and registrations may be added, replaced or removed at any
/// time. Cloning a `Container` yields another handle to the same container.
///
/// Dropping the last handle drops the singletons and the calling thread's
/// current scope. Other threads let go of their scope for this container when
/// they exit or next use a container.
#[derive(Clone)]
pub struct Container {
  shared: Arc<Shared>,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_activator(DefaultActivator)
  }
}

impl Container {
  /// Creates a new, empty `Container` using the [`DefaultActivator`].
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` that builds implementation types with
  /// `activator`.
  pub fn with_activator(activator: impl Activator) -> Self {
    Self {
      shared: Arc::new(Shared {
        registry: Registry::default(),
        scopes: ScopeTable::default(),
        activator: Box::new(activator),
      }),
    }
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, descriptor: Descriptor) {
    let key = descriptor.key().clone();
    let lifecycle = descriptor.lifecycle();
    let source = descriptor.source().kind();
    let replaced = self.shared.registry.insert(descriptor);
    tracing::debug!(contract = %key, %lifecycle, source, replaced, "registered contract");
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers a descriptor, replacing any earlier registration of its key.
  ///
  /// This is the type-erased entry point; it fails with
  /// [`Error::InvalidRegistration`](crate::Error::InvalidRegistration) when the
  /// descriptor's source does not produce the key's contract type.
  pub fn register(&self, descriptor: Descriptor) -> Result<()> {
    descriptor.validate()?;
    self.insert(descriptor);
    Ok(())
  }

  /// Registers implementation `T` for contract `I`.
  pub fn register_type<I, T>(&self, lifecycle: Lifecycle)
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    self.insert(Descriptor::implementation::<I, T>(lifecycle));
  }

  /// Registers `T` as its own contract.
  pub fn register_concrete<T: Injectable>(&self, lifecycle: Lifecycle) {
    self.insert(Descriptor::concrete::<T>(lifecycle));
  }

  pub fn register_factory<T: Any + Send + Sync>(
    &self,
    lifecycle: Lifecycle,
    factory: impl Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  ) {
    self.insert(Descriptor::factory(lifecycle, factory));
  }

  pub fn register_trait_factory<I: ?Sized + Any + Send + Sync>(
    &self,
    lifecycle: Lifecycle,
    factory: impl Fn(&Resolver) -> Result<Arc<I>, BoxError> + Send + Sync + 'static,
  ) {
    self.insert(Descriptor::trait_factory(lifecycle, factory));
  }

  /// Registers an already built value as a singleton.
  pub fn register_instance<T: Any + Send + Sync>(&self, instance: T) {
    self.insert(Descriptor::instance(instance));
  }

  pub fn register_singleton<I, T>(&self)
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    self.register_type::<I, T>(Lifecycle::Singleton);
  }

  pub fn register_transient<I, T>(&self)
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    self.register_type::<I, T>(Lifecycle::Transient);
  }

  pub fn register_scoped<I, T>(&self)
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    self.register_type::<I, T>(Lifecycle::Scoped);
  }

  pub fn register_singleton_factory<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  ) {
    self.register_factory(Lifecycle::Singleton, factory);
  }

  pub fn register_transient_factory<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  ) {
    self.register_factory(Lifecycle::Transient, factory);
  }

  pub fn register_scoped_factory<T: Any + Send + Sync>(
    &self,
    factory: impl Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  ) {
    self.register_factory(Lifecycle::Scoped, factory);
  }

  // --- Removal and Lookup ---

  /// Removes the registration for `key`. Returns whether one existed;
  /// removing an unknown contract is not an error.
  pub fn unregister_key(&self, key: &ContractKey) -> bool {
    let removed = self.shared.registry.remove(key);
    tracing::debug!(contract = %key, removed, "unregistered contract");
    removed
  }

  pub fn unregister<T: ?Sized + Any>(&self) -> bool {
    self.unregister_key(&ContractKey::of::<T>())
  }

  pub fn unregister_named<T: ?Sized + Any>(&self, name: &str) -> bool {
    self.unregister_key(&ContractKey::named::<T>(name))
  }

  pub fn is_registered_key(&self, key: &ContractKey) -> bool {
    self.shared.registry.contains(key)
  }

  pub fn is_registered<T: ?Sized + Any>(&self) -> bool {
    self.is_registered_key(&ContractKey::of::<T>())
  }

  /// The stored descriptor for `key`, if any.
  pub fn lookup(&self, key: &ContractKey) -> Option<Descriptor> {
    self
      .shared
      .registry
      .get(key)
      .map(|registration| registration.descriptor().clone())
  }

  pub fn lifecycle_of(&self, key: &ContractKey) -> Option<Lifecycle> {
    self.lookup(key).map(|descriptor| descriptor.lifecycle())
  }

  /// Number of registered contracts.
  pub fn len(&self) -> usize {
    self.shared.registry.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // --- Scopes ---

  /// Starts a new scope for the calling thread.
  ///
  /// Scoped resolutions on this thread get fresh instances from now on. The
  /// previous scope is no longer current; its instances live only as long as
  /// some [`Scope`] handle still references it. Other threads keep their own
  /// current scopes. Singletons and registrations are untouched.
  pub fn create_new_scope(&self) {
    let (scope, previous) = self.shared.scopes.replace();
    tracing::debug!(
      scope = %scope.id(),
      previous = ?previous.as_ref().map(Scope::id),
      "created new scope"
    );
  }

  /// The calling thread's current scope. Each thread starts out with a
  /// default scope, so resolving works before any `create_new_scope` call.
  pub fn current_scope(&self) -> Scope {
    self.shared.scopes.current()
  }

  /// Forgets the calling thread's current scope. Returns whether the thread
  /// had one. The next resolution on this thread starts a new default scope.
  pub fn release_scope(&self) -> bool {
    let released = self.shared.scopes.release();
    if let Some(scope) = &released {
      tracing::debug!(scope = %scope.id(), "released scope");
    }
    released.is_some()
  }

  /// A resolver bound to the calling thread's current scope.
  pub fn resolver(&self) -> Resolver<'_> {
    self.resolver_in(&self.current_scope())
  }

  /// A resolver bound to `scope`, usable from any thread.
  pub fn resolver_in(&self, scope: &Scope) -> Resolver<'_> {
    Resolver::new(&self.shared, scope.clone())
  }

  // --- Resolution ---

  /// Resolves a contract by key.
  ///
  /// Returns `Ok(None)` when the contract is not registered and an error only
  /// when building the instance fails.
  pub fn resolve_key(&self, key: &ContractKey) -> Result<Option<Instance>> {
    self.resolver().resolve_key(key)
  }

  pub fn resolve_with_key<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &ContractKey,
  ) -> Result<Option<Arc<T>>> {
    self.resolver().resolve_with_key::<T>(key)
  }

  /// Resolves contract `T` in the calling thread's current scope.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    self.resolver().resolve::<T>()
  }

  pub fn resolve_named<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>> {
    self.resolver().resolve_named::<T>(name)
  }

  pub fn require<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self.resolver().require::<T>()
  }

  pub fn require_named<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self.resolver().require_named::<T>(name)
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("registrations", &self.shared.registry.len())
      .finish()
  }
}
