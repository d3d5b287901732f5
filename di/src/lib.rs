//! # Fibre DI
//!
//! A thread-safe dependency injection container with lifecycle management.
//!
//! Contracts (concrete types or `dyn Trait`s) are mapped to an implementation
//! type or a factory, together with a [`Lifecycle`]:
//!
//! - **Singleton**: built once, shared for the container's whole life.
//! - **Transient**: built on every resolution.
//! - **Scoped**: built once per [`Scope`]. Each thread has a current scope;
//!   [`Container::create_new_scope`] moves the calling thread to a fresh one.
//!
//! Resolving a contract nobody registered is not an error: the `resolve`
//! family returns `Ok(None)`. Errors are reserved for broken registrations and
//! for failures while building an instance.
//!
//! Implementation types are built by an [`Activator`]. The default one calls
//! [`Injectable::inject`], where a type pulls its own dependencies from the
//! [`Resolver`] it is given.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{implements, BoxError, Container, Injectable, Lifecycle, Resolver};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: Arc<String>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.to_string()
//!   }
//! }
//!
//! impl Injectable for EnglishGreeter {
//!   fn inject(resolver: &Resolver) -> Result<Self, BoxError> {
//!     Ok(EnglishGreeter { message: resolver.require::<String>()? })
//!   }
//! }
//!
//! implements!(EnglishGreeter => dyn Greeter);
//!
//! let container = Container::new();
//! container.register_instance(String::from("Hello, World!"));
//! container.register_type::<dyn Greeter, EnglishGreeter>(Lifecycle::Scoped);
//!
//! let greeter = container.resolve::<dyn Greeter>().unwrap().unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//!
//! // Nothing registered: no value, no error.
//! assert!(container.resolve::<u64>().unwrap().is_none());
//! ```

mod activator;
mod container;
mod error;
mod global;
mod key;
mod lifecycle;
mod macros;
mod registry;
mod resolver;
mod scope;

pub use activator::{Activator, DefaultActivator};
pub use container::Container;
pub use error::{BoxError, Error, Result};
pub use global::global;
pub use key::ContractKey;
pub use lifecycle::Lifecycle;
pub use registry::{Descriptor, Factory, Implementation, Implements, Injectable, Instance, Source};
pub use resolver::Resolver;
pub use scope::{Scope, ScopeId};
