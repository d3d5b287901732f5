use fibre_di::{global, implements, resolve, BoxError, Injectable, Resolver};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;

impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

impl Injectable for ConsoleLogger {
  fn inject(_: &Resolver) -> Result<Self, BoxError> {
    Ok(ConsoleLogger)
  }
}

implements!(ConsoleLogger => dyn Logger);

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

impl Injectable for ReportService {
  fn inject(resolver: &Resolver) -> Result<Self, BoxError> {
    Ok(ReportService {
      logger: resolver.require::<dyn Logger>()?,
    })
  }
}

fn main() {
  // ConsoleLogger serves the `dyn Logger` contract; ReportService serves itself.
  global().register_singleton::<dyn Logger, ConsoleLogger>();
  global().register_transient::<ReportService, ReportService>();

  println!("Resolving the high-level service...");
  let report_service = resolve!(ReportService);

  println!("Using the service...");
  report_service.generate_report();
}
