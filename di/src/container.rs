//! The main `Container` struct and its associated methods.

use crate::config::ContainerConfig;
use crate::constructor::{check_output, Arguments, Constructor};
use crate::core::{Contract, FactoryDescriptor, Instance, Scope};
use crate::error::Result;
use crate::key::TypeKey;
use crate::registry::Registry;
use crate::resolver::Resolver;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// The Inversion of Control (IoC) container.
///
/// Holds constructors keyed by the type they produce, plus the aliases that
/// say which concrete type serves each capability. It is thread-safe: every
/// method takes `&self`, and a singleton is built at most once even when it
/// is first requested from several threads at the same time.
///
/// There is no global container. Create one, register into it during start
/// up, and pass it (or an `Arc` of it) to whoever needs to resolve.
#[derive(Default)]
pub struct Container {
  registry: Registry,
  config: ContainerConfig,
}

impl Container {
  /// Creates a new, empty `Container` with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` after validating `config`.
  pub fn with_config(config: ContainerConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      registry: Registry::default(),
      config,
    })
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- Registration ---

  /// Registers `constructor` as the provider of its return type.
  ///
  /// The parameters of `constructor` are resolved by type whenever the
  /// output is requested. A previous registration for the same output type
  /// is replaced.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidConstructor`](crate::Error::InvalidConstructor) if the
  /// constructor returns `()` or a tuple. Nothing is registered in that case.
  pub fn register<C, Args>(&self, constructor: C, scope: Scope) -> Result<()>
  where
    C: Constructor<Args>,
  {
    check_output::<C::Output>()?;

    let invoke = Box::new(move |args: &[Instance]| {
      constructor
        .construct(Arguments::new(args))
        .map(|value| Instance::new(Arc::new(value)))
    });
    let descriptor = FactoryDescriptor::new(
      TypeKey::of::<C::Output>(),
      C::dependencies(),
      scope,
      invoke,
    );

    self.registry.insert_descriptor(descriptor);
    Ok(())
  }

  /// Registers an already built value as a singleton.
  pub fn register_instance<T: Any + Send + Sync>(&self, instance: T) {
    let descriptor = FactoryDescriptor::prebuilt(Instance::new(Arc::new(instance)));
    self.registry.insert_descriptor(descriptor);
  }

  /// Records that the concrete type `T` satisfies the capability `I`.
  ///
  /// `upcast` converts a built `T` into the capability, which for a trait
  /// object is the identity closure `|it: Arc<T>| -> Arc<dyn Trait> { it }`.
  /// The [`contract!`](crate::contract) macro writes it for you.
  ///
  /// # Errors
  ///
  /// [`Error::ContractMismatch`](crate::Error::ContractMismatch) if `I` is
  /// not a capability type.
  pub fn declare_contract<I, T, F>(&self, upcast: F) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
    T: Any + Send + Sync,
    F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  {
    self.registry.insert_contract(Contract::new::<I, T, F>(upcast))
  }

  /// Makes `implementation` the type that serves requests for capability `I`.
  ///
  /// Use `TypeKey::of::<T>()`, or `TypeKey::of_val(&value)` when holding a
  /// value of the implementation. The implementation does not need a
  /// constructor yet unless eager alias validation is configured.
  ///
  /// # Errors
  ///
  /// - [`Error::ContractMismatch`](crate::Error::ContractMismatch) if no
  ///   contract says `implementation` satisfies `I`.
  /// - [`Error::NoProvider`](crate::Error::NoProvider) if eager validation is
  ///   on and `implementation` has no constructor.
  ///
  /// In both cases the previous alias, if any, stays in place.
  pub fn register_interface<I: ?Sized + Any>(&self, implementation: TypeKey) -> Result<()> {
    self.registry.insert_alias(
      TypeKey::of::<I>(),
      implementation,
      self.config.eager_alias_validation,
    )
  }

  /// Declares the contract between `I` and `T` and points `I` at `T`.
  pub fn bind<I, T, F>(&self, upcast: F) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
    T: Any + Send + Sync,
    F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  {
    self.declare_contract::<I, T, F>(upcast)?;
    self.register_interface::<I>(TypeKey::of::<T>())
  }

  // --- Resolution ---

  /// Resolves a service, building it and its dependencies as needed.
  ///
  /// `T` may be a concrete type or a capability such as `dyn Notifier`.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self.resolve_key::<T>(TypeKey::of::<T>())
  }

  /// Resolves the service registered under `key` and returns it as `T`.
  ///
  /// # Errors
  ///
  /// Any resolution error, or
  /// [`Error::TypeMismatch`](crate::Error::TypeMismatch) if the service
  /// under `key` is not a `T`.
  pub fn resolve_key<T: ?Sized + Any + Send + Sync>(&self, key: TypeKey) -> Result<Arc<T>> {
    Resolver::new(&self.registry, self.config.max_depth)
      .resolve(key)
      .and_then(|instance| instance.downcast::<T>())
      .inspect_err(|error| debug!(type_name = key.name(), %error, "resolution failed"))
  }

  /// Checks that every registered constructor could be satisfied, without
  /// building anything.
  ///
  /// # Errors
  ///
  /// The first `NoImplementation`, `NoProvider`, `ContractMismatch`,
  /// `CycleDetected` or `DepthExceeded` found.
  pub fn validate(&self) -> Result<()> {
    Resolver::new(&self.registry, self.config.max_depth).validate()
  }

  // --- Introspection ---

  /// Returns `true` if `T` has a constructor, or, for a capability, an
  /// implementation.
  pub fn contains<T: ?Sized + Any>(&self) -> bool {
    self.contains_key(TypeKey::of::<T>())
  }

  pub fn contains_key(&self, key: TypeKey) -> bool {
    self.registry.contains(key)
  }

  /// The concrete type currently serving capability `I`.
  pub fn implementation_of<I: ?Sized + Any>(&self) -> Option<TypeKey> {
    self.registry.alias(TypeKey::of::<I>())
  }

  /// Number of registered constructors and instances.
  pub fn len(&self) -> usize {
    self.registry.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
