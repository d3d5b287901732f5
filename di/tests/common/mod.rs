#![allow(dead_code)]

use fibre_di::{implements, BoxError, Injectable, Resolver};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

// --- Shared Test Fixtures ---

// Every fixture gets a fresh id per construction so tests can tell
// instances apart without relying on pointers alone.

pub trait Identified: fmt::Debug + Send + Sync {
  fn id(&self) -> Uuid;
}

pub trait DummyService: fmt::Debug + Send + Sync {
  fn id(&self) -> Uuid;
}

#[derive(Debug)]
pub struct Dummy {
  pub id: Uuid,
}

impl DummyService for Dummy {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Injectable for Dummy {
  fn inject(_: &Resolver) -> Result<Self, BoxError> {
    Ok(Dummy { id: Uuid::new_v4() })
  }
}

implements!(Dummy => dyn DummyService);

/// A service with a dependency on `dyn DummyService`.
#[derive(Debug)]
pub struct Tracked {
  pub id: Uuid,
  pub dummy: Arc<dyn DummyService>,
}

impl Tracked {
  pub fn new(dummy: Arc<dyn DummyService>) -> Self {
    Self {
      id: Uuid::new_v4(),
      dummy,
    }
  }
}

impl Identified for Tracked {
  fn id(&self) -> Uuid {
    self.id
  }
}

impl Injectable for Tracked {
  fn inject(resolver: &Resolver) -> Result<Self, BoxError> {
    Ok(Tracked::new(resolver.require::<dyn DummyService>()?))
  }
}

implements!(Tracked => dyn Identified);

/// A concrete type registered against itself.
#[derive(Debug)]
pub struct ConcreteService {
  pub id: Uuid,
  pub dummy: Arc<dyn DummyService>,
}

impl Injectable for ConcreteService {
  fn inject(resolver: &Resolver) -> Result<Self, BoxError> {
    Ok(ConcreteService {
      id: Uuid::new_v4(),
      dummy: resolver.require::<dyn DummyService>()?,
    })
  }
}
