mod common;

use common::{Dummy, DummyService, Identified, Tracked};
use fibre_di::{
  Container, ContractKey, Descriptor, Error, Factory, Implementation, Instance, Lifecycle, Source,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

trait UnregisteredService: Send + Sync {}

// --- Absence ---

#[test]
fn test_unregister_unknown_contract_is_noop() {
  let container = Container::new();

  assert!(!container.unregister::<dyn UnregisteredService>());
  assert!(container.resolve::<dyn UnregisteredService>().unwrap().is_none());
  assert!(container
    .resolve_key(&ContractKey::of::<dyn UnregisteredService>())
    .unwrap()
    .is_none());
}

#[test]
fn test_unregistered_contract_resolves_to_none() {
  let container = Container::new();
  container.register_singleton::<dyn DummyService, Dummy>();
  let _warm = container.require::<dyn DummyService>().unwrap();

  assert!(container.unregister::<dyn DummyService>());

  assert!(container.resolve::<dyn DummyService>().unwrap().is_none());
  assert!(!container.is_registered::<dyn DummyService>());
  let Err(err) = container.require::<dyn DummyService>() else {
    panic!("an unregistered contract should be missing");
  };
  assert!(matches!(err, Error::MissingDependency { .. }));
}

// --- Last Write Wins ---

#[test]
fn test_reregistration_replaces_factory() {
  let container = Container::new();
  container.register_transient_factory(|_| Ok(String::from("first")));
  container.register_transient_factory(|_| Ok(String::from("second")));

  assert_eq!(container.len(), 1);
  assert_eq!(*container.require::<String>().unwrap(), "second");
}

#[test]
fn test_reregistration_discards_cached_singleton() {
  let container = Container::new();
  container.register_singleton_factory(|_| Ok(String::from("old")));
  assert_eq!(*container.require::<String>().unwrap(), "old");

  container.register_singleton_factory(|_| Ok(String::from("new")));

  assert_eq!(*container.require::<String>().unwrap(), "new");
}

#[test]
fn test_reregistration_discards_cached_scoped_instance() {
  let container = Container::new();
  container.register_scoped_factory(|_| Ok(String::from("old")));
  assert_eq!(*container.require::<String>().unwrap(), "old");

  // Same scope, new registration: the scoped entry from the old one is stale.
  container.register_scoped_factory(|_| Ok(String::from("new")));

  assert_eq!(*container.require::<String>().unwrap(), "new");
}

#[test]
fn test_reregistration_can_switch_source_kind() {
  let container = Container::new();
  container.register_scoped::<dyn DummyService, Dummy>();
  container.register_type::<dyn Identified, Tracked>(Lifecycle::Singleton);
  let from_type = container.require::<dyn Identified>().unwrap();

  container.register_trait_factory::<dyn Identified>(Lifecycle::Singleton, |r| {
    Ok(Arc::new(Tracked::new(r.require::<dyn DummyService>()?)))
  });
  let from_factory = container.require::<dyn Identified>().unwrap();

  assert_ne!(from_type.id(), from_factory.id());
  let descriptor = container.lookup(&ContractKey::of::<dyn Identified>()).unwrap();
  assert!(matches!(descriptor.source(), Source::Factory(_)));
}

// --- General Form ---

#[test]
fn test_general_form_accepts_matching_descriptor() {
  let container = Container::new();
  let key = ContractKey::of::<dyn DummyService>();
  let source = Source::Implementation(Implementation::of::<dyn DummyService, Dummy>());

  container
    .register(Descriptor::new(Lifecycle::Singleton, key.clone(), source))
    .unwrap();

  let a = container.resolve_key(&key).unwrap().unwrap();
  let b = container.resolve_key(&key).unwrap().unwrap();
  assert!(a.ptr_eq(&b));
  assert_eq!(container.lifecycle_of(&key), Some(Lifecycle::Singleton));
}

#[test]
fn test_general_form_rejects_mismatched_implementation() {
  let container = Container::new();
  let source = Source::Implementation(Implementation::of::<dyn DummyService, Dummy>());
  let descriptor = Descriptor::new(
    Lifecycle::Transient,
    ContractKey::of::<dyn Identified>(),
    source,
  );

  let err = container.register(descriptor).unwrap_err();

  assert!(matches!(err, Error::InvalidRegistration { .. }));
  assert!(container.is_empty());
}

#[test]
fn test_erased_factory_returning_wrong_type_is_caught_at_resolution() {
  let container = Container::new();
  let key = ContractKey::of::<u64>();
  // The factory claims to provide u64 but hands back a String instance.
  let factory = Factory::erased(&key, |_| {
    Ok(Instance::new(Arc::new(String::from("not a number"))))
  });
  container
    .register(Descriptor::new(Lifecycle::Transient, key, Source::Factory(factory)))
    .unwrap();

  let err = container.resolve::<u64>().unwrap_err();

  assert!(matches!(err, Error::TypeMismatch { .. }), "unexpected error: {err:?}");
}

#[test]
fn test_resolve_with_key_rejects_wrong_type() {
  let container = Container::new();
  container.register_instance(5u32);

  let err = container
    .resolve_with_key::<u64>(&ContractKey::of::<u32>())
    .unwrap_err();

  assert!(matches!(err, Error::TypeMismatch { expected: "u64", .. }));
}

#[test]
fn test_lifecycle_from_config_text() {
  let container = Container::new();
  let lifecycle: Lifecycle = "Scoped".parse().unwrap();
  container.register_type::<dyn DummyService, Dummy>(lifecycle);

  assert_eq!(
    container.lifecycle_of(&ContractKey::of::<dyn DummyService>()),
    Some(Lifecycle::Scoped)
  );
  assert!(matches!(
    "per-request".parse::<Lifecycle>(),
    Err(Error::UnknownLifecycle(_))
  ));
}

// --- Named Contracts ---

#[test]
fn test_named_registrations_are_independent() {
  let container = Container::new();
  container
    .register(Descriptor::instance(String::from("primary")).named("db.primary"))
    .unwrap();
  container
    .register(Descriptor::instance(String::from("replica")).named("db.replica"))
    .unwrap();

  assert_eq!(*container.require_named::<String>("db.primary").unwrap(), "primary");
  assert_eq!(*container.require_named::<String>("db.replica").unwrap(), "replica");
  assert!(container.resolve::<String>().unwrap().is_none());

  assert!(container.unregister_named::<String>("db.replica"));
  assert!(container.resolve_named::<String>("db.replica").unwrap().is_none());
  assert_eq!(container.len(), 1);
}

#[test]
fn test_lookup_reports_descriptor() {
  let container = Container::new();
  container.register_transient::<dyn DummyService, Dummy>();

  let descriptor = container.lookup(&ContractKey::of::<dyn DummyService>()).unwrap();

  assert_eq!(descriptor.lifecycle(), Lifecycle::Transient);
  assert_eq!(descriptor.key(), &ContractKey::of::<dyn DummyService>());
  match descriptor.source() {
    Source::Implementation(implementation) => {
      assert!(implementation.type_name().ends_with("Dummy"))
    }
    Source::Factory(_) => panic!("expected an implementation source"),
  }
  assert!(container.lookup(&ContractKey::of::<u8>()).is_none());
}
