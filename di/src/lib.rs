//! # Fibre DI
//!
//! A thread-safe Inversion of Control (IoC) container for Rust that builds
//! services from ordinary constructor functions.
//!
//! A constructor is any function or closure taking `Arc<Dependency>`
//! parameters and returning the service. The container keys it by its
//! return type, and when that type is requested it resolves every parameter
//! by type first, recursing as deep as the dependency graph goes.
//!
//! ## Core Concepts
//!
//! - **Container**: The registry for constructors, capabilities and cached
//!   singletons. Passed explicitly; there is no global instance.
//! - **Scope**: `Singleton` services are built once and shared, `Transient`
//!   services are built fresh on every request.
//! - **Capabilities**: Trait objects such as `dyn Notifier`. A *contract*
//!   records that a concrete type satisfies a capability, and an *alias*
//!   picks which one serves requests for it.
//! - **Errors**: Every failure is a [`Error`] value. A dependency that cannot
//!   be resolved aborts the whole resolution; a circular dependency is
//!   reported as [`Error::CycleDetected`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{contract, Container, Scope, TypeKey};
//! use std::sync::Arc;
//!
//! trait Notifier: Send + Sync {
//!   fn notify(&self, message: &str) -> String;
//! }
//!
//! struct EmailNotifier;
//!
//! impl Notifier for EmailNotifier {
//!   fn notify(&self, message: &str) -> String {
//!     format!("email: {}", message)
//!   }
//! }
//!
//! struct AlertService {
//!   notifier: Arc<dyn Notifier>,
//! }
//!
//! fn new_alert_service(notifier: Arc<dyn Notifier>) -> AlertService {
//!   AlertService { notifier }
//! }
//!
//! fn main() -> fibre_di::Result<()> {
//!   let container = Container::new();
//!
//!   container.register(|| EmailNotifier, Scope::Singleton)?;
//!   container.register(new_alert_service, Scope::Transient)?;
//!   contract!(&container, dyn Notifier => EmailNotifier)?;
//!   container.register_interface::<dyn Notifier>(TypeKey::of::<EmailNotifier>())?;
//!
//!   let alerts = container.resolve::<AlertService>()?;
//!   assert_eq!(alerts.notifier.notify("disk full"), "email: disk full");
//!   Ok(())
//! }
//! ```

mod config;
mod constructor;
mod container;
mod core;
mod error;
mod key;
mod macros;
mod registry;
mod resolver;

pub use config::{ContainerConfig, DEFAULT_MAX_DEPTH};
pub use constructor::{Arguments, Constructor};
pub use container::Container;
pub use crate::core::Scope;
pub use error::{Error, Result};
pub use key::{TypeKey, TypeKind};
