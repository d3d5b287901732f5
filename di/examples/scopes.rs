use fibre_di::Container;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

struct RequestContext {
  request_id: u64,
}

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

fn handle(container: &Container, worker: usize) {
  // Every request is a unit of work with its own scope.
  container.create_new_scope();
  let ctx = container.require::<RequestContext>().unwrap();
  let same = container.require::<RequestContext>().unwrap();
  println!(
    "worker {} in {} handles request {} (again: {})",
    worker,
    container.current_scope().id(),
    ctx.request_id,
    same.request_id
  );
}

fn main() {
  let container = Container::new();
  container.register_scoped_factory(|_| {
    Ok(RequestContext {
      request_id: NEXT_REQUEST.fetch_add(1, Ordering::SeqCst),
    })
  });

  thread::scope(|s| {
    for worker in 0..4 {
      let container = &container;
      s.spawn(move || {
        for _ in 0..2 {
          handle(container, worker);
        }
      });
    }
  });
}
