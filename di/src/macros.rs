//! Public macros for ergonomic resolution and trait registration.

/// Resolves a service from the global container.
///
/// This macro is the short way to pull a required dependency. It panics if
/// the requested contract is not registered or fails to build. For a
/// non-panicking version, use `global().resolve::<T>()` directly.
///
/// # Panics
///
/// Panics when the contract is missing or its construction fails.
///
/// # Examples
///
/// ```
/// use fibre_di::{global, resolve, Lifecycle};
///
/// global().register_factory(Lifecycle::Singleton, |_| Ok(String::from("hello")));
///
/// let message = resolve!(String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use fibre_di::{global, resolve, Lifecycle};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global().register_trait_factory::<dyn Greeter>(Lifecycle::Singleton, |_| Ok(Arc::new(EnglishGreeter)));
///
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(MyService)
  ($type:ty) => {
    $crate::global()
      .require::<$type>()
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };

  // resolve!(MyService, "name")
  ($type:ty, $name:expr) => {
    $crate::global()
      .require_named::<$type>($name)
      .unwrap_or_else(|err| panic!("Failed to resolve required service: {}", err))
  };

  // resolve!(trait MyTrait). The trait is captured as an ident so `dyn` can
  // be added here.
  (trait $trait_ident:ident) => {
    $crate::global()
      .require::<dyn $trait_ident>()
      .unwrap_or_else(|err| panic!("Failed to resolve required trait service: {}", err))
  };

  // resolve!(trait MyTrait, "name")
  (trait $trait_ident:ident, $name:expr) => {
    $crate::global()
      .require_named::<dyn $trait_ident>($name)
      .unwrap_or_else(|err| panic!("Failed to resolve required trait service: {}", err))
  };
}

/// Declares that a type can serve one or more trait contracts.
///
/// Expands to an [`Implements`](crate::Implements) impl per contract, which is
/// what `register_type` and friends require.
///
/// # Examples
///
/// ```
/// use fibre_di::{implements, BoxError, Container, Injectable, Resolver};
///
/// trait Clock: Send + Sync { fn now(&self) -> u64; }
///
/// struct FixedClock;
/// impl Clock for FixedClock { fn now(&self) -> u64 { 42 } }
/// impl Injectable for FixedClock {
///   fn inject(_: &Resolver) -> Result<Self, BoxError> { Ok(FixedClock) }
/// }
///
/// implements!(FixedClock => dyn Clock);
///
/// let container = Container::new();
/// container.register_singleton::<dyn Clock, FixedClock>();
/// assert_eq!(container.require::<dyn Clock>().unwrap().now(), 42);
/// ```
#[macro_export]
macro_rules! implements {
  ($implementation:ty => $($contract:ty),+ $(,)?) => {
    $(
      impl $crate::Implements<$contract> for $implementation {
        fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
          self
        }
      }
    )+
  };
}
