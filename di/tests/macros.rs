//! Tests specifically for the wiring macros.
//! This file verifies the behavior of:
//! - `resolve!` for concrete types and capabilities
//! - `contract!` with one or several implementations

use fibre_di::{contract, resolve, Container, Error, Scope, TypeKey};
use std::sync::Arc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i32,
}
trait MacroTestTrait: Send + Sync {
  fn value(&self) -> i32;
}
impl MacroTestTrait for MacroTestService {
  fn value(&self) -> i32 {
    self.value
  }
}

struct OtherService;
impl MacroTestTrait for OtherService {
  fn value(&self) -> i32 {
    -1
  }
}

struct UnregisteredService; // An unregistered type

// --- Tests ---

#[test]
fn test_resolve_macro_success() {
  // Arrange
  let container = Container::new();
  container
    .register(|| MacroTestService { value: 42 }, Scope::Singleton)
    .unwrap();
  contract!(&container, dyn MacroTestTrait => MacroTestService).unwrap();
  container
    .register_interface::<dyn MacroTestTrait>(TypeKey::of::<MacroTestService>())
    .unwrap();

  // Act & Assert
  assert_eq!(resolve!(&container, MacroTestService).value, 42);
  assert_eq!(resolve!(&container, trait MacroTestTrait).value(), 42);
}

#[test]
fn test_resolve_macro_accepts_shared_containers() {
  let container = Arc::new(Container::new());
  container.register_instance(5_u64);

  assert_eq!(*resolve!(container, u64), 5);
}

#[test]
fn test_contract_macro_declares_every_implementation() {
  let container = Container::new();
  container
    .register(|| MacroTestService { value: 7 }, Scope::Singleton)
    .unwrap();
  container.register(|| OtherService, Scope::Singleton).unwrap();

  contract!(&container, dyn MacroTestTrait => MacroTestService, OtherService,).unwrap();

  container
    .register_interface::<dyn MacroTestTrait>(TypeKey::of::<OtherService>())
    .unwrap();
  assert_eq!(resolve!(&container, trait MacroTestTrait).value(), -1);

  container
    .register_interface::<dyn MacroTestTrait>(TypeKey::of::<MacroTestService>())
    .unwrap();
  assert_eq!(resolve!(&container, trait MacroTestTrait).value(), 7);
}

#[test]
fn test_interface_without_contract_is_a_mismatch() {
  let container = Container::new();
  container.register(|| OtherService, Scope::Singleton).unwrap();

  let error = container
    .register_interface::<dyn MacroTestTrait>(TypeKey::of::<OtherService>())
    .unwrap_err();

  assert_eq!(
    error,
    Error::ContractMismatch {
      capability: TypeKey::of::<dyn MacroTestTrait>(),
      implementation: TypeKey::of::<OtherService>(),
    }
  );
}

#[test]
#[should_panic(expected = "Failed to resolve required service")]
fn test_resolve_panics_on_missing_concrete_service() {
  let container = Container::new();
  resolve!(&container, UnregisteredService);
}

#[test]
#[should_panic(expected = "No implementation registered for capability")]
fn test_resolve_panics_on_missing_trait_service() {
  trait MissingTrait: Send + Sync {}
  let container = Container::new();
  resolve!(&container, trait MissingTrait);
}
