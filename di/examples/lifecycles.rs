use fibre_di::{Container, Lifecycle};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tracker() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() {
  let container = Container::new();

  println!("--- Singleton ---");
  container.register_factory(Lifecycle::Singleton, |_| Ok(tracker()));
  let s1 = container.require::<RequestTracker>().unwrap();
  container.create_new_scope();
  let s2 = container.require::<RequestTracker>().unwrap();
  println!("Singleton IDs: {} and {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Transient ---");
  container.register_factory(Lifecycle::Transient, |_| Ok(tracker()));
  let t1 = container.require::<RequestTracker>().unwrap();
  let t2 = container.require::<RequestTracker>().unwrap();
  println!("Transient IDs: {} and {}", t1.id, t2.id);
  assert_ne!(t1.id, t2.id);

  println!("--- Scoped ---");
  container.register_factory(Lifecycle::Scoped, |_| Ok(tracker()));
  let c1 = container.require::<RequestTracker>().unwrap();
  let c2 = container.require::<RequestTracker>().unwrap();
  container.create_new_scope();
  let c3 = container.require::<RequestTracker>().unwrap();
  println!("Scoped IDs: {}, {} then {} after a new scope", c1.id, c2.id, c3.id);
  assert!(Arc::ptr_eq(&c1, &c2));
  assert_ne!(c1.id, c3.id);
}
