//! Core data structures shared by the registry and the resolver.

use crate::error::{Error, Result};
use crate::key::TypeKey;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// How long a constructed service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scope {
  /// One instance per container, built on first resolution and shared afterwards.
  Singleton,
  /// A fresh instance on every resolution.
  Transient,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scope::Singleton => f.write_str("singleton"),
      Scope::Transient => f.write_str("transient"),
    }
  }
}

/// A type-erased service handle.
///
/// The payload is always an `Arc<T>` where `T` is the type named by `key`, so
/// cloning an `Instance` hands out the same underlying service.
#[derive(Clone)]
pub(crate) struct Instance {
  key: TypeKey,
  value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
  pub(crate) fn new<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      key: TypeKey::of::<T>(),
      value: Arc::new(value),
    }
  }

  pub(crate) fn key(&self) -> TypeKey {
    self.key
  }

  pub(crate) fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self
      .value
      .downcast_ref::<Arc<T>>()
      .cloned()
      .ok_or(Error::TypeMismatch {
        expected: TypeKey::of::<T>(),
        found: self.key,
      })
  }
}

pub(crate) type Invoke = Box<dyn Fn(&[Instance]) -> Result<Instance> + Send + Sync>;

/// Everything the container knows about one registered concrete type.
pub(crate) struct FactoryDescriptor {
  output: TypeKey,
  dependencies: Vec<TypeKey>,
  scope: Scope,
  invoke: Invoke,
  cell: OnceCell<Instance>,
}

impl FactoryDescriptor {
  pub(crate) fn new(output: TypeKey, dependencies: Vec<TypeKey>, scope: Scope, invoke: Invoke) -> Self {
    Self {
      output,
      dependencies,
      scope,
      invoke,
      cell: OnceCell::new(),
    }
  }

  /// A singleton descriptor whose instance already exists.
  pub(crate) fn prebuilt(instance: Instance) -> Self {
    let shared = instance.clone();
    Self {
      output: instance.key(),
      dependencies: Vec::new(),
      scope: Scope::Singleton,
      invoke: Box::new(move |_| Ok(shared.clone())),
      cell: OnceCell::with_value(instance),
    }
  }

  pub(crate) fn output(&self) -> TypeKey {
    self.output
  }

  pub(crate) fn dependencies(&self) -> &[TypeKey] {
    &self.dependencies
  }

  pub(crate) fn scope(&self) -> Scope {
    self.scope
  }

  pub(crate) fn cached(&self) -> Option<Instance> {
    match self.scope {
      Scope::Singleton => self.cell.get().cloned(),
      Scope::Transient => None,
    }
  }

  pub(crate) fn invoke(&self, args: &[Instance]) -> Result<Instance> {
    (self.invoke)(args)
  }

  /// Returns the cached singleton, running `build` only if the cell is empty.
  ///
  /// Concurrent callers block until the first one finishes, so `build` runs at
  /// most once successfully. A failed `build` leaves the cell empty.
  ///
  /// `build` must not resolve anything: the cell stays locked while it runs.
  pub(crate) fn get_or_try_init(&self, build: impl FnOnce() -> Result<Instance>) -> Result<Instance> {
    self.cell.get_or_try_init(build).cloned()
  }
}

type Upcast = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Evidence that a concrete type satisfies a capability.
#[derive(Clone)]
pub(crate) struct Contract {
  capability: TypeKey,
  implementation: TypeKey,
  upcast: Upcast,
}

impl Contract {
  pub(crate) fn new<I, T, F>(upcast: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    T: Any + Send + Sync,
    F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
  {
    Self {
      capability: TypeKey::of::<I>(),
      implementation: TypeKey::of::<T>(),
      upcast: Arc::new(move |instance: &Instance| {
        instance
          .downcast::<T>()
          .ok()
          .map(|concrete| Instance::new(upcast(concrete)))
      }),
    }
  }

  pub(crate) fn capability(&self) -> TypeKey {
    self.capability
  }

  pub(crate) fn implementation(&self) -> TypeKey {
    self.implementation
  }

  pub(crate) fn apply(&self, instance: &Instance) -> Result<Instance> {
    (self.upcast)(instance).ok_or(Error::TypeMismatch {
      expected: self.implementation,
      found: instance.key(),
    })
  }
}

/// The chain of types currently being built by one top-level resolution.
pub(crate) struct ResolutionStack {
  path: Vec<TypeKey>,
  max_depth: usize,
}

impl ResolutionStack {
  pub(crate) fn new(max_depth: usize) -> Self {
    Self {
      path: Vec::new(),
      max_depth,
    }
  }

  /// Pushes `key` and returns a guard that pops it again when dropped.
  ///
  /// Fails if `key` is already being built further up the chain, or if the
  /// chain would grow past the configured depth.
  pub(crate) fn enter(&mut self, key: TypeKey) -> Result<ResolutionGuard<'_>> {
    if self.path.contains(&key) {
      let mut path = self.path.clone();
      path.push(key);
      return Err(Error::CycleDetected { path });
    }
    if self.path.len() >= self.max_depth {
      let mut path = self.path.clone();
      path.push(key);
      return Err(Error::DepthExceeded {
        limit: self.max_depth,
        path,
      });
    }

    self.path.push(key);
    Ok(ResolutionGuard { stack: self })
  }
}

/// An RAII guard marking a type as "being built".
pub(crate) struct ResolutionGuard<'a> {
  stack: &'a mut ResolutionStack,
}

impl Deref for ResolutionGuard<'_> {
  type Target = ResolutionStack;

  fn deref(&self) -> &ResolutionStack {
    self.stack
  }
}

impl DerefMut for ResolutionGuard<'_> {
  fn deref_mut(&mut self) -> &mut ResolutionStack {
    self.stack
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.stack.path.pop();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Alpha;
  struct Beta;

  #[test]
  fn guard_pops_on_drop() {
    let mut stack = ResolutionStack::new(8);
    {
      let mut guard = stack.enter(TypeKey::of::<Alpha>()).unwrap();
      let inner = guard.enter(TypeKey::of::<Beta>()).unwrap();
      drop(inner);
      assert_eq!(guard.path.len(), 1);
    }
    assert!(stack.path.is_empty());
  }

  #[test]
  fn reentry_is_a_cycle() {
    let mut stack = ResolutionStack::new(8);
    let mut guard = stack.enter(TypeKey::of::<Alpha>()).unwrap();
    let mut inner = guard.enter(TypeKey::of::<Beta>()).unwrap();

    let error = inner.enter(TypeKey::of::<Alpha>()).err().unwrap();
    assert_eq!(
      error,
      Error::CycleDetected {
        path: vec![
          TypeKey::of::<Alpha>(),
          TypeKey::of::<Beta>(),
          TypeKey::of::<Alpha>()
        ],
      }
    );
  }

  #[test]
  fn depth_limit_is_enforced() {
    let mut stack = ResolutionStack::new(1);
    let mut guard = stack.enter(TypeKey::of::<Alpha>()).unwrap();
    let error = guard.enter(TypeKey::of::<Beta>()).err().unwrap();
    assert!(matches!(error, Error::DepthExceeded { limit: 1, .. }));
  }

  #[test]
  fn instance_clones_share_the_service() {
    let instance = Instance::new(Arc::new(String::from("shared")));
    let a = instance.downcast::<String>().unwrap();
    let b = instance.clone().downcast::<String>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(matches!(instance.downcast::<u8>(), Err(Error::TypeMismatch { .. })));
  }
}
