//! Scopes: one unit of work each, holding that unit's scoped instances.

use crate::key::ContractKey;
use crate::registry::Instance;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
  pub fn as_u64(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for ScopeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "scope-{}", self.0)
  }
}

struct ScopeInner {
  id: ScopeId,
  // Entries remember the registration generation that built them, so a
  // re-registered contract does not hand out the old scoped instance.
  instances: Mutex<HashMap<ContractKey, (u64, Instance)>>,
}

/// A handle to one scope.
///
/// Handles are cheap to clone. Passing a handle along with a unit of work and
/// resolving through [`Container::resolver_in`](crate::Container::resolver_in)
/// keeps that work on its own scoped instances no matter which thread runs it.
/// The scope's instances are dropped together with its last handle.
#[derive(Clone)]
pub struct Scope {
  inner: Arc<ScopeInner>,
}

impl Scope {
  pub(crate) fn new() -> Self {
    Self {
      inner: Arc::new(ScopeInner {
        id: ScopeId(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed)),
        instances: Mutex::new(HashMap::new()),
      }),
    }
  }

  pub fn id(&self) -> ScopeId {
    self.inner.id
  }

  /// Number of scoped instances cached in this scope.
  pub fn len(&self) -> usize {
    self.inner.instances.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub(crate) fn get(&self, key: &ContractKey, generation: u64) -> Option<Instance> {
    match self.inner.instances.lock().get(key) {
      Some((cached, instance)) if *cached == generation => Some(instance.clone()),
      _ => None,
    }
  }

  /// Caches `instance` unless another resolution of the same registration got
  /// there first, in which case the earlier instance wins and is returned.
  pub(crate) fn put(&self, key: ContractKey, generation: u64, instance: Instance) -> Instance {
    let mut instances = self.inner.instances.lock();
    match instances.get(&key) {
      Some((cached, existing)) if *cached == generation => existing.clone(),
      _ => {
        instances.insert(key, (generation, instance.clone()));
        instance
      }
    }
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    self.inner.id == other.inner.id
  }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scope")
      .field("id", &self.inner.id)
      .field("len", &self.len())
      .finish()
  }
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
  // Current scope of this thread, per container. The weak token goes dead
  // when its container is dropped.
  static CURRENT_SCOPES: RefCell<HashMap<u64, (Weak<()>, Scope)>> = RefCell::new(HashMap::new());
}

/// Tracks the current scope of every thread that uses one container.
///
/// The scopes live in thread-local storage, so a thread's scope and its
/// instances are dropped when the thread exits.
pub(crate) struct ScopeTable {
  id: u64,
  alive: Arc<()>,
}

impl Default for ScopeTable {
  fn default() -> Self {
    Self {
      id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
      alive: Arc::new(()),
    }
  }
}

impl ScopeTable {
  /// Runs `f` on this thread's scope map after taking out the scopes of
  /// containers that no longer exist.
  ///
  /// Removed scopes are returned to the caller and dropped outside the
  /// borrow, since dropping scoped instances may run user code that touches
  /// a container again.
  fn with_scopes<R>(f: impl FnOnce(&mut HashMap<u64, (Weak<()>, Scope)>) -> R) -> (R, Vec<Scope>) {
    CURRENT_SCOPES.with(|cell| {
      let mut scopes = cell.borrow_mut();
      let dead: Vec<u64> = scopes
        .iter()
        .filter(|(_, (alive, _))| alive.strong_count() == 0)
        .map(|(id, _)| *id)
        .collect();
      let stale = dead
        .into_iter()
        .filter_map(|id| scopes.remove(&id))
        .map(|(_, scope)| scope)
        .collect();
      (f(&mut scopes), stale)
    })
  }

  /// The calling thread's current scope, created on first use.
  pub(crate) fn current(&self) -> Scope {
    let (scope, _stale) = Self::with_scopes(|scopes| {
      scopes
        .entry(self.id)
        .or_insert_with(|| (Arc::downgrade(&self.alive), Scope::new()))
        .1
        .clone()
    });
    scope
  }

  /// Makes a fresh scope current for the calling thread and returns it along
  /// with the scope it superseded, if any.
  pub(crate) fn replace(&self) -> (Scope, Option<Scope>) {
    let scope = Scope::new();
    let (previous, _stale) = Self::with_scopes(|scopes| {
      scopes
        .insert(self.id, (Arc::downgrade(&self.alive), scope.clone()))
        .map(|(_, previous)| previous)
    });
    (scope, previous)
  }

  pub(crate) fn release(&self) -> Option<Scope> {
    let (released, _stale) =
      Self::with_scopes(|scopes| scopes.remove(&self.id).map(|(_, scope)| scope));
    released
  }
}

impl Drop for ScopeTable {
  // Other threads drop their entry for this table lazily, on their next use
  // of any container, or when they exit.
  fn drop(&mut self) {
    let released = CURRENT_SCOPES
      .try_with(|cell| {
        cell
          .try_borrow_mut()
          .ok()
          .and_then(|mut scopes| scopes.remove(&self.id))
      })
      .ok()
      .flatten();
    drop(released);
  }
}
