//! The construction strategy for type-based registrations.

use crate::error::BoxError;
use crate::registry::{Implementation, Instance};
use crate::resolver::Resolver;

/// Builds instances of implementation types.
///
/// The container only decides *when* something gets built and how long it is
/// kept. How an implementation type is turned into a value is the activator's
/// business. Factory registrations never reach the activator.
pub trait Activator: Send + Sync + 'static {
  fn activate(
    &self,
    implementation: &Implementation,
    resolver: &Resolver,
  ) -> Result<Instance, BoxError>;
}

/// Calls the implementation type's own [`Injectable::inject`](crate::Injectable::inject).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultActivator;

impl Activator for DefaultActivator {
  fn activate(
    &self,
    implementation: &Implementation,
    resolver: &Resolver,
  ) -> Result<Instance, BoxError> {
    implementation.construct(resolver)
  }
}

impl<F> Activator for F
where
  F: Fn(&Implementation, &Resolver) -> Result<Instance, BoxError> + Send + Sync + 'static,
{
  fn activate(
    &self,
    implementation: &Implementation,
    resolver: &Resolver,
  ) -> Result<Instance, BoxError> {
    self(implementation, resolver)
  }
}
