//! Storage for constructors, aliases and contracts.

use crate::core::{Contract, FactoryDescriptor};
use crate::error::{Error, Result};
use crate::key::TypeKey;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Owns every mapping the resolver reads from.
///
/// Each map is keyed uniquely and the last registration for a key wins.
/// Validation happens before any insert, so a rejected registration leaves
/// all maps as they were.
#[derive(Default)]
pub(crate) struct Registry {
  descriptors: DashMap<TypeKey, Arc<FactoryDescriptor>>,
  aliases: DashMap<TypeKey, TypeKey>,
  contracts: DashMap<(TypeKey, TypeKey), Contract>,
}

impl Registry {
  pub(crate) fn insert_descriptor(&self, descriptor: FactoryDescriptor) {
    let output = descriptor.output();
    let scope = descriptor.scope();
    let dependencies = descriptor.dependencies().len();

    let replaced = self.descriptors.insert(output, Arc::new(descriptor)).is_some();
    debug!(
      type_name = output.name(),
      %scope,
      dependencies,
      replaced,
      "registered constructor"
    );
  }

  /// Returns a shared handle so callers never hold a map guard while building.
  pub(crate) fn descriptor(&self, key: TypeKey) -> Option<Arc<FactoryDescriptor>> {
    self.descriptors.get(&key).map(|entry| Arc::clone(entry.value()))
  }

  pub(crate) fn insert_contract(&self, contract: Contract) -> Result<()> {
    let capability = contract.capability();
    let implementation = contract.implementation();

    if !capability.is_capability() || implementation.is_capability() {
      return Err(Error::ContractMismatch {
        capability,
        implementation,
      });
    }

    self.contracts.insert((capability, implementation), contract);
    debug!(
      capability = capability.name(),
      implementation = implementation.name(),
      "declared contract"
    );
    Ok(())
  }

  pub(crate) fn contract(&self, capability: TypeKey, implementation: TypeKey) -> Option<Contract> {
    self
      .contracts
      .get(&(capability, implementation))
      .map(|entry| entry.value().clone())
  }

  /// Points `capability` at `implementation`.
  ///
  /// The pair must have a declared contract. With `require_provider` the
  /// implementation must also have a constructor already.
  pub(crate) fn insert_alias(
    &self,
    capability: TypeKey,
    implementation: TypeKey,
    require_provider: bool,
  ) -> Result<()> {
    if !self.contracts.contains_key(&(capability, implementation)) {
      return Err(Error::ContractMismatch {
        capability,
        implementation,
      });
    }
    if require_provider && !self.descriptors.contains_key(&implementation) {
      return Err(Error::NoProvider(implementation));
    }

    let previous = self.aliases.insert(capability, implementation);
    debug!(
      capability = capability.name(),
      implementation = implementation.name(),
      previous = previous.map(|key| key.name()),
      "registered implementation"
    );
    Ok(())
  }

  pub(crate) fn alias(&self, capability: TypeKey) -> Option<TypeKey> {
    self.aliases.get(&capability).map(|entry| *entry.value())
  }

  pub(crate) fn contains(&self, key: TypeKey) -> bool {
    if key.is_capability() {
      self.aliases.contains_key(&key)
    } else {
      self.descriptors.contains_key(&key)
    }
  }

  /// Snapshot of every registered concrete type.
  pub(crate) fn outputs(&self) -> Vec<TypeKey> {
    self.descriptors.iter().map(|entry| *entry.key()).collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.descriptors.len()
  }
}
