use fibre_di::{contract, Container, Scope, TypeKey};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// 1. Define the abstraction (the trait)
trait Notifier: Send + Sync {
  fn notify(&self, message: &str);
}

// 2. Define a concrete implementation
struct EmailNotifier;

impl Notifier for EmailNotifier {
  fn notify(&self, message: &str) {
    println!("[EMAIL]: {}", message);
  }
}

fn new_email_notifier() -> EmailNotifier {
  EmailNotifier
}

// 3. Define a service that depends on the abstraction
struct AlertService {
  notifier: Arc<dyn Notifier>,
}

impl AlertService {
  fn raise(&self, alert: &str) {
    self.notifier.notify(&format!("ALERT: {}", alert));
  }
}

fn new_alert_service(notifier: Arc<dyn Notifier>) -> AlertService {
  AlertService { notifier }
}

fn main() -> fibre_di::Result<()> {
  // Run with RUST_LOG=fibre_di=trace to watch registration and resolution.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Registration ---
  let container = Container::new();
  container.register(new_email_notifier, Scope::Singleton)?;
  container.register(new_alert_service, Scope::Transient)?;
  contract!(&container, dyn Notifier => EmailNotifier)?;
  container.register_interface::<dyn Notifier>(TypeKey::of::<EmailNotifier>())?;

  // Fail fast if anything is missing before serving requests.
  container.validate()?;

  // --- Resolution and Usage ---
  let first = container.resolve::<AlertService>()?;
  let second = container.resolve::<AlertService>()?;
  first.raise("disk usage above 90%");
  second.raise("disk usage above 95%");

  println!(
    "distinct services: {}, shared notifier: {}",
    !Arc::ptr_eq(&first, &second),
    Arc::as_ptr(&first.notifier) as *const () == Arc::as_ptr(&second.notifier) as *const ()
  );
  Ok(())
}
