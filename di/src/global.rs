//! The global container instance and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;

// The process-wide container, created on first access.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the global container instance.
///
/// # Examples
///
/// ```
/// use fibre_di::global;
///
/// fn register_services() {
///   global().register_instance(String::from("Hello from global!"));
/// }
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
