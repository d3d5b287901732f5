use fibre_di::{global, resolve};

// A service that is never registered.
struct UnregisteredService;

fn main() {
  // Unregistering something that was never registered is fine.
  global().unregister::<UnregisteredService>();

  // The plain resolve reports absence without an error.
  match global().resolve::<UnregisteredService>() {
    Ok(None) => println!("UnregisteredService has no registration, as expected."),
    Ok(Some(_)) => unreachable!("nothing registered it"),
    Err(err) => println!("resolution failed: {}", err),
  }

  // The macro treats the service as required and panics.
  println!("Attempting to resolve it with resolve!...");
  let _service = resolve!(UnregisteredService);
}
