//! End-to-end walkthroughs of the container's lifecycle guarantees.

use fibre_di::{BoxError, Container, Injectable, Lifecycle, Resolver};
use std::sync::Arc;
use uuid::Uuid;

trait Foo: Send + Sync {}

struct Logger {
  id: Uuid,
}

impl Injectable for Logger {
  fn inject(_: &Resolver) -> Result<Self, BoxError> {
    Ok(Logger { id: Uuid::new_v4() })
  }
}

struct RequestHandler {
  id: Uuid,
}

impl Injectable for RequestHandler {
  fn inject(_: &Resolver) -> Result<Self, BoxError> {
    Ok(RequestHandler { id: Uuid::new_v4() })
  }
}

struct RequestContext {
  id: Uuid,
}

impl Injectable for RequestContext {
  fn inject(_: &Resolver) -> Result<Self, BoxError> {
    Ok(RequestContext { id: Uuid::new_v4() })
  }
}

struct Cache {
  logger: Arc<Logger>,
}

#[test]
fn test_singleton_logger() {
  let container = Container::new();
  container.register_concrete::<Logger>(Lifecycle::Singleton);

  let first = container.require::<Logger>().unwrap();
  let second = container.require::<Logger>().unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.id, second.id);
}

#[test]
fn test_transient_request_handler() {
  let container = Container::new();
  container.register_concrete::<RequestHandler>(Lifecycle::Transient);

  let first = container.require::<RequestHandler>().unwrap();
  let second = container.require::<RequestHandler>().unwrap();

  assert_ne!(first.id, second.id);
}

#[test]
fn test_scoped_request_context() {
  let container = Container::new();
  container.register_concrete::<RequestContext>(Lifecycle::Scoped);

  let first = container.require::<RequestContext>().unwrap();
  let second = container.require::<RequestContext>().unwrap();
  container.create_new_scope();
  let third = container.require::<RequestContext>().unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert_ne!(first.id, third.id);
}

#[test]
fn test_unregister_without_register() {
  let container = Container::new();

  container.unregister::<dyn Foo>();

  assert!(container.resolve::<dyn Foo>().unwrap().is_none());
}

#[test]
fn test_scoped_cache_factory_over_singleton_logger() {
  let container = Container::new();
  container.register_concrete::<Logger>(Lifecycle::Singleton);
  container.register_scoped_factory(|resolver| {
    Ok(Cache {
      logger: resolver.require::<Logger>()?,
    })
  });

  let first = container.require::<Cache>().unwrap();
  let second = container.require::<Cache>().unwrap();
  let logger = container.require::<Logger>().unwrap();

  assert!(Arc::ptr_eq(&first, &second));
  assert!(Arc::ptr_eq(&first.logger, &logger));

  container.create_new_scope();
  let third = container.require::<Cache>().unwrap();
  assert!(!Arc::ptr_eq(&first, &third));
  assert!(Arc::ptr_eq(&third.logger, &logger));
}
