//! The recursive resolution algorithm.

use crate::core::{Contract, FactoryDescriptor, Instance, ResolutionStack, Scope};
use crate::error::{Error, Result};
use crate::key::TypeKey;
use crate::registry::Registry;
use std::collections::HashSet;
use tracing::trace;

/// Turns requested type keys into instances, one depth-first walk per request.
pub(crate) struct Resolver<'a> {
  registry: &'a Registry,
  max_depth: usize,
}

impl<'a> Resolver<'a> {
  pub(crate) fn new(registry: &'a Registry, max_depth: usize) -> Self {
    Self {
      registry,
      max_depth,
    }
  }

  pub(crate) fn resolve(&self, key: TypeKey) -> Result<Instance> {
    let mut stack = ResolutionStack::new(self.max_depth);
    self.resolve_in(key, &mut stack)
  }

  fn resolve_in(&self, requested: TypeKey, stack: &mut ResolutionStack) -> Result<Instance> {
    let (target, contract) = self.follow_alias(requested)?;

    let descriptor = self
      .registry
      .descriptor(target)
      .ok_or(Error::NoProvider(target))?;

    let instance = match descriptor.cached() {
      Some(instance) => {
        trace!(type_name = target.name(), "singleton cache hit");
        instance
      }
      None => self.construct(&descriptor, stack)?,
    };

    match contract {
      Some(contract) => contract.apply(&instance),
      None => Ok(instance),
    }
  }

  /// Maps a capability to its concrete implementation and the contract used
  /// to present the result as the capability. Concrete keys pass through.
  fn follow_alias(&self, requested: TypeKey) -> Result<(TypeKey, Option<Contract>)> {
    if !requested.is_capability() {
      return Ok((requested, None));
    }

    let target = self
      .registry
      .alias(requested)
      .ok_or(Error::NoImplementation(requested))?;
    let contract = self
      .registry
      .contract(requested, target)
      .ok_or(Error::ContractMismatch {
        capability: requested,
        implementation: target,
      })?;

    trace!(
      capability = requested.name(),
      implementation = target.name(),
      "following alias"
    );
    Ok((target, Some(contract)))
  }

  fn construct(&self, descriptor: &FactoryDescriptor, stack: &mut ResolutionStack) -> Result<Instance> {
    let mut guard = stack.enter(descriptor.output())?;

    // Arguments are resolved before the singleton cell is touched, so the
    // cell is only ever locked around the constructor call itself. Holding it
    // across dependency resolution lets two threads walking a cycle from
    // opposite ends wait on each other's cells forever.
    let mut args = Vec::with_capacity(descriptor.dependencies().len());
    for dependency in descriptor.dependencies() {
      // The first dependency that fails aborts the whole resolution.
      args.push(self.resolve_in(*dependency, &mut guard)?);
    }

    let build = || -> Result<Instance> {
      trace!(
        type_name = descriptor.output().name(),
        scope = %descriptor.scope(),
        "invoking constructor"
      );
      descriptor.invoke(&args)
    };

    match descriptor.scope() {
      Scope::Singleton => descriptor.get_or_try_init(build),
      Scope::Transient => build(),
    }
  }

  /// Walks the dependency graph of every registration without building
  /// anything, reporting the first missing or cyclic dependency.
  pub(crate) fn validate(&self) -> Result<()> {
    let mut verified = HashSet::new();
    for output in self.registry.outputs() {
      let mut stack = ResolutionStack::new(self.max_depth);
      self.verify(output, &mut stack, &mut verified)?;
    }
    Ok(())
  }

  fn verify(
    &self,
    requested: TypeKey,
    stack: &mut ResolutionStack,
    verified: &mut HashSet<TypeKey>,
  ) -> Result<()> {
    let (target, _) = self.follow_alias(requested)?;
    if verified.contains(&target) {
      return Ok(());
    }

    let descriptor = self
      .registry
      .descriptor(target)
      .ok_or(Error::NoProvider(target))?;

    let mut guard = stack.enter(target)?;
    for dependency in descriptor.dependencies() {
      self.verify(*dependency, &mut guard, verified)?;
    }
    drop(guard);

    verified.insert(target);
    Ok(())
  }
}
