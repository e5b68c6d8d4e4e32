use crate::key::TypeKey;
use thiserror::Error;

/// The error type for registration and resolution in `fibre_di`.
///
/// A failed call never leaves the container in a partially updated state; it
/// remains usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A concrete type was requested but no constructor was registered for it.
  #[error("No provider registered for type: {0}")]
  NoProvider(TypeKey),

  /// A capability was requested but no implementation was registered for it.
  #[error("No implementation registered for capability: {0}")]
  NoImplementation(TypeKey),

  #[error("{implementation} does not satisfy {capability}")]
  ContractMismatch {
    capability: TypeKey,
    implementation: TypeKey,
  },

  #[error("Invalid constructor for {output}: {reason}")]
  InvalidConstructor { output: TypeKey, reason: &'static str },

  #[error("Resolved {found} where {expected} was requested")]
  TypeMismatch { expected: TypeKey, found: TypeKey },

  /// The first entry of `path` is the outermost request; the last entry is
  /// the type that was requested again while still being built.
  #[error("Circular dependency detected: {}", render_path(.path))]
  CycleDetected { path: Vec<TypeKey> },

  #[error("Resolution depth limit of {limit} exceeded: {}", render_path(.path))]
  DepthExceeded { limit: usize, path: Vec<TypeKey> },

  #[error("Invalid configuration value for '{field}': {message}")]
  Config { field: &'static str, message: String },
}

/// A specialized `Result` type for `fibre_di` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

fn render_path(path: &[TypeKey]) -> String {
  path
    .iter()
    .map(TypeKey::name)
    .collect::<Vec<_>>()
    .join(" -> ")
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Alpha;
  struct Beta;

  #[test]
  fn cycle_message_lists_the_path() {
    let error = Error::CycleDetected {
      path: vec![
        TypeKey::of::<Alpha>(),
        TypeKey::of::<Beta>(),
        TypeKey::of::<Alpha>(),
      ],
    };

    let message = error.to_string();
    assert!(message.starts_with("Circular dependency detected: "));
    assert_eq!(message.matches(" -> ").count(), 2);
    assert!(message.ends_with("Alpha"));
  }
}
