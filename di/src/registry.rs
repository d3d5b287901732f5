//! Registration descriptors and the store that holds them.

use crate::error::{BoxError, Error, Result};
use crate::key::ContractKey;
use crate::lifecycle::Lifecycle;
use crate::resolver::Resolver;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Constructor = Arc<dyn Fn(&Resolver<'_>) -> Result<Instance, BoxError> + Send + Sync>;

fn constructor<F>(construct: F) -> Constructor
where
  F: Fn(&Resolver<'_>) -> Result<Instance, BoxError> + Send + Sync + 'static,
{
  Arc::new(construct)
}

/// A type-erased, shareable instance of some contract `I`.
///
/// Internally this boxes an `Arc<I>`, so `I` may be a trait object. Cloning an
/// `Instance` shares the same underlying object.
#[derive(Clone)]
pub struct Instance {
  type_id: TypeId,
  type_name: &'static str,
  value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
  pub fn new<I: ?Sized + Any + Send + Sync>(value: Arc<I>) -> Self {
    Self {
      type_id: TypeId::of::<I>(),
      type_name: std::any::type_name::<I>(),
      value: Arc::new(value),
    }
  }

  /// Returns the contained `Arc<I>` if this instance was built for contract `I`.
  pub fn downcast<I: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<I>> {
    self.value.downcast_ref::<Arc<I>>().cloned()
  }

  /// The `TypeId` of the contract this instance was built for.
  pub fn contract_type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn contract_type_name(&self) -> &'static str {
    self.type_name
  }

  /// Whether both handles point at the same object.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Arc::ptr_eq(&self.value, &other.value)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}

/// Compile-time proof that `Self` can serve contract `I`.
///
/// Every type implements its own contract. Trait contracts are declared with
/// the [`implements!`](crate::implements) macro.
pub trait Implements<I: ?Sized> {
  fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T> Implements<T> for T {
  fn upcast(self: Arc<Self>) -> Arc<T> {
    self
  }
}

/// A type the activator can build, pulling its own dependencies from the
/// resolver it is handed.
pub trait Injectable: Sized + Send + Sync + 'static {
  fn inject(resolver: &Resolver) -> Result<Self, BoxError>;
}

/// An implementation type registered for a contract, built by the container's
/// [`Activator`](crate::Activator).
#[derive(Clone)]
pub struct Implementation {
  type_id: TypeId,
  type_name: &'static str,
  provides: (TypeId, &'static str),
  construct: Constructor,
}

impl Implementation {
  /// Implementation `T` serving contract `I`.
  pub fn of<I, T>() -> Self
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      provides: (TypeId::of::<I>(), std::any::type_name::<I>()),
      construct: constructor(|resolver| {
        let value = T::inject(resolver)?;
        Ok(Instance::new::<I>(<T as Implements<I>>::upcast(Arc::new(value))))
      }),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Runs the type's own `Injectable::inject` and wraps the result.
  pub fn construct(&self, resolver: &Resolver) -> Result<Instance, BoxError> {
    (self.construct)(resolver)
  }
}

/// A user function that builds instances of a contract.
#[derive(Clone)]
pub struct Factory {
  provides: (TypeId, &'static str),
  call: Constructor,
}

impl Factory {
  /// A factory producing a concrete `T`, which is also the contract.
  pub fn new<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    Self {
      provides: (TypeId::of::<T>(), std::any::type_name::<T>()),
      call: constructor(move |resolver| {
        Ok(Instance::new(Arc::new(factory(resolver)?)))
      }),
    }
  }

  /// A factory producing a shared handle to contract `I`, usually a trait object.
  pub fn for_trait<I, F>(factory: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Resolver) -> Result<Arc<I>, BoxError> + Send + Sync + 'static,
  {
    Self {
      provides: (TypeId::of::<I>(), std::any::type_name::<I>()),
      call: constructor(move |resolver| {
        Ok(Instance::new::<I>(factory(resolver)?))
      }),
    }
  }

  /// A factory over erased instances. `provides` declares the contract the
  /// returned instances are built for; registration checks it against the key.
  pub fn erased<F>(provides: &ContractKey, factory: F) -> Self
  where
    F: Fn(&Resolver) -> Result<Instance, BoxError> + Send + Sync + 'static,
  {
    Self {
      provides: (provides.type_id(), provides.type_name()),
      call: constructor(factory),
    }
  }

  pub(crate) fn call(&self, resolver: &Resolver) -> Result<Instance, BoxError> {
    (self.call)(resolver)
  }
}

/// Where instances of a contract come from.
#[derive(Clone)]
pub enum Source {
  Implementation(Implementation),
  Factory(Factory),
}

impl Source {
  fn provides(&self) -> (TypeId, &'static str) {
    match self {
      Source::Implementation(implementation) => implementation.provides,
      Source::Factory(factory) => factory.provides,
    }
  }

  pub(crate) fn kind(&self) -> &'static str {
    match self {
      Source::Implementation(_) => "implementation",
      Source::Factory(_) => "factory",
    }
  }
}

impl fmt::Debug for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Source::Implementation(implementation) => {
        write!(f, "Implementation({})", implementation.type_name)
      }
      Source::Factory(factory) => write!(f, "Factory({})", factory.provides.1),
    }
  }
}

/// A registration record: contract, lifecycle and source.
#[derive(Clone, Debug)]
pub struct Descriptor {
  key: ContractKey,
  lifecycle: Lifecycle,
  source: Source,
}

impl Descriptor {
  /// The general, type-erased form. Checked by [`Descriptor::validate`].
  pub fn new(lifecycle: Lifecycle, key: ContractKey, source: Source) -> Self {
    Self {
      key,
      lifecycle,
      source,
    }
  }

  /// Implementation `T` built by the activator for contract `I`.
  pub fn implementation<I, T>(lifecycle: Lifecycle) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    T: Injectable + Implements<I>,
  {
    Self::new(
      lifecycle,
      ContractKey::of::<I>(),
      Source::Implementation(Implementation::of::<I, T>()),
    )
  }

  /// Concrete `T` registered as its own contract.
  pub fn concrete<T: Injectable>(lifecycle: Lifecycle) -> Self {
    Self::implementation::<T, T>(lifecycle)
  }

  pub fn factory<T, F>(lifecycle: Lifecycle, factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Resolver) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    Self::new(
      lifecycle,
      ContractKey::of::<T>(),
      Source::Factory(Factory::new(factory)),
    )
  }

  pub fn trait_factory<I, F>(lifecycle: Lifecycle, factory: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Resolver) -> Result<Arc<I>, BoxError> + Send + Sync + 'static,
  {
    Self::new(
      lifecycle,
      ContractKey::of::<I>(),
      Source::Factory(Factory::for_trait(factory)),
    )
  }

  /// A pre-built value served as a singleton.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    let instance = Instance::new(Arc::new(value));
    let key = ContractKey::of::<T>();
    let factory = Factory::erased(&key, move |_| Ok(instance.clone()));
    Self::new(Lifecycle::Singleton, key, Source::Factory(factory))
  }

  /// Moves this registration under a named key.
  pub fn named(mut self, name: &str) -> Self {
    self.key = self.key.with_name(name);
    self
  }

  pub fn key(&self) -> &ContractKey {
    &self.key
  }

  pub fn lifecycle(&self) -> Lifecycle {
    self.lifecycle
  }

  pub fn source(&self) -> &Source {
    &self.source
  }

  /// Checks that the source builds instances of the key's contract type.
  pub fn validate(&self) -> Result<()> {
    let (provides, provides_name) = self.source.provides();
    if provides != self.key.type_id() {
      return Err(Error::InvalidRegistration {
        contract: self.key.to_string(),
        reason: format!("{} source provides '{}'", self.source.kind(), provides_name),
      });
    }
    Ok(())
  }
}

/// A stored descriptor plus its singleton slot.
///
/// The slot lives with the registration, so replacing or removing a
/// registration drops whatever singleton it produced.
pub(crate) struct Registration {
  generation: u64,
  descriptor: Descriptor,
  singleton: OnceCell<Instance>,
}

impl Registration {
  pub(crate) fn generation(&self) -> u64 {
    self.generation
  }

  pub(crate) fn descriptor(&self) -> &Descriptor {
    &self.descriptor
  }

  pub(crate) fn singleton(&self) -> &OnceCell<Instance> {
    &self.singleton
  }
}

/// Contract key to registration, last write wins.
#[derive(Default)]
pub(crate) struct Registry {
  entries: DashMap<ContractKey, Arc<Registration>>,
  next_generation: AtomicU64,
}

impl Registry {
  /// Stores `descriptor`, returning true when it replaced an earlier one.
  pub(crate) fn insert(&self, descriptor: Descriptor) -> bool {
    let registration = Registration {
      generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
      descriptor,
      singleton: OnceCell::new(),
    };
    let key = registration.descriptor.key.clone();
    self.entries.insert(key, Arc::new(registration)).is_some()
  }

  pub(crate) fn remove(&self, key: &ContractKey) -> bool {
    self.entries.remove(key).is_some()
  }

  /// Clones the registration out so no shard lock is held while building.
  pub(crate) fn get(&self, key: &ContractKey) -> Option<Arc<Registration>> {
    self.entries.get(key).map(|entry| Arc::clone(entry.value()))
  }

  pub(crate) fn contains(&self, key: &ContractKey) -> bool {
    self.entries.contains_key(key)
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}
