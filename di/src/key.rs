//! Type identity used to key every registration in the container.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// Distinguishes the two kinds of types the container deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// Any type that is not a trait object. Sized types are built by registered
  /// constructors. Unsized non-trait types such as `str` or `[u8]` are also
  /// concrete; nothing can produce them, so requesting one reports
  /// `NoProvider`.
  Concrete,
  /// A trait object such as `dyn Notifier`. Requests for a capability are
  /// served through an alias.
  Capability,
}

/// An opaque identifier for a type, used as a registry key.
///
/// Two keys are equal if and only if they denote the same type. The type name
/// is carried along for diagnostics only.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
  kind: TypeKind,
}

impl TypeKey {
  /// Returns the key of the type `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    let name = type_name::<T>();
    // Pointers to unsized types carry metadata and are wider than thin
    // pointers. Of those, only trait objects render with a leading `dyn`.
    let wide = mem::size_of::<*const T>() != mem::size_of::<*const ()>();
    let kind = if wide && name.starts_with("dyn ") {
      TypeKind::Capability
    } else {
      TypeKind::Concrete
    };

    Self {
      id: TypeId::of::<T>(),
      name,
      kind,
    }
  }

  /// Returns the key of the static type of `value`.
  ///
  /// ```
  /// use fibre_di::TypeKey;
  ///
  /// let port = 8080_u16;
  /// assert_eq!(TypeKey::of_val(&port), TypeKey::of::<u16>());
  /// ```
  pub fn of_val<T: ?Sized + Any>(_value: &T) -> Self {
    Self::of::<T>()
  }

  pub fn type_id(&self) -> TypeId {
    self.id
  }

  /// The fully qualified name of the type, as reported by `std::any::type_name`.
  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn kind(&self) -> TypeKind {
    self.kind
  }

  pub fn is_capability(&self) -> bool {
    self.kind == TypeKind::Capability
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Greeter {}

  #[test]
  fn sized_types_are_concrete() {
    assert_eq!(TypeKey::of::<u32>().kind(), TypeKind::Concrete);
    assert_eq!(TypeKey::of::<String>().kind(), TypeKind::Concrete);
    assert_eq!(TypeKey::of::<std::sync::Arc<dyn Greeter>>().kind(), TypeKind::Concrete);
  }

  #[test]
  fn trait_objects_are_capabilities() {
    assert!(TypeKey::of::<dyn Greeter>().is_capability());
    assert!(TypeKey::of::<dyn Greeter + Send + Sync>().is_capability());
  }

  #[test]
  fn unsized_non_trait_types_are_concrete() {
    assert_eq!(TypeKey::of::<str>().kind(), TypeKind::Concrete);
    assert_eq!(TypeKey::of::<[u8]>().kind(), TypeKind::Concrete);
    assert_eq!(TypeKey::of::<[Box<dyn Greeter>]>().kind(), TypeKind::Concrete);
  }

  #[test]
  fn keys_compare_by_type_only() {
    assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
    assert_ne!(TypeKey::of::<String>(), TypeKey::of::<&'static str>());
    assert_eq!(TypeKey::of_val(&String::new()), TypeKey::of::<String>());
  }
}
