//! Container configuration.

use crate::error::{Error, Result};

/// The default limit on how deep a single resolution may descend.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling how a [`Container`](crate::Container) validates
/// registrations and bounds resolution.
///
/// With the `serde` feature enabled this can be read from any serde format;
/// missing fields take their defaults and unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ContainerConfig {
  /// When set, binding a capability requires the implementation to already
  /// have a registered constructor. Otherwise a missing constructor is only
  /// reported when the capability is resolved.
  pub eager_alias_validation: bool,
  /// Maximum length of a dependency chain. Must be at least 1.
  pub max_depth: usize,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      eager_alias_validation: false,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl ContainerConfig {
  pub fn with_eager_alias_validation(mut self, enabled: bool) -> Self {
    self.eager_alias_validation = enabled;
    self
  }

  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Checks the values for consistency.
  pub fn validate(&self) -> Result<()> {
    if self.max_depth == 0 {
      return Err(Error::Config {
        field: "max_depth",
        message: "must be at least 1".to_string(),
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let config = ContainerConfig::default();
    assert!(!config.eager_alias_validation);
    assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn zero_depth_is_rejected() {
    let error = ContainerConfig::default().with_max_depth(0).validate().unwrap_err();
    assert_eq!(
      error.to_string(),
      "Invalid configuration value for 'max_depth': must be at least 1"
    );
  }
}
