//! The functional shape every registered constructor must conform to.

use crate::core::Instance;
use crate::error::{Error, Result};
use crate::key::TypeKey;
use std::any::{type_name, Any};
use std::sync::Arc;

/// Resolved arguments handed to a [`Constructor`], in declaration order.
pub struct Arguments<'a> {
  values: &'a [Instance],
}

impl<'a> Arguments<'a> {
  pub(crate) fn new(values: &'a [Instance]) -> Self {
    Self { values }
  }

  fn take<T: ?Sized + Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
    match self.values.get(index) {
      Some(instance) => instance.downcast::<T>(),
      None => Err(Error::NoProvider(TypeKey::of::<T>())),
    }
  }
}

/// A function that builds one service from other services.
///
/// Implemented for every `Fn(Arc<A1>, .., Arc<An>) -> R` with up to eight
/// parameters. Each `Ai` may be a concrete type or a capability such as
/// `dyn Notifier`; the container resolves them by type before the call.
///
/// ```
/// use fibre_di::{Container, Scope};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
///
/// fn connect(config: Arc<Config>) -> Database {
///   Database { url: config.url.clone() }
/// }
///
/// let container = Container::new();
/// container.register_instance(Config { url: "sqlite::memory:".into() });
/// container.register(connect, Scope::Singleton).unwrap();
///
/// assert_eq!(container.resolve::<Database>().unwrap().url, "sqlite::memory:");
/// ```
pub trait Constructor<Args>: Send + Sync + 'static {
  /// The service type this constructor produces.
  type Output: Any + Send + Sync;

  /// The parameter types, in order.
  fn dependencies() -> Vec<TypeKey>;

  #[doc(hidden)]
  fn construct(&self, args: Arguments<'_>) -> Result<Self::Output>;
}

macro_rules! impl_constructor {
  ($($arg:ident),*) => {
    impl<Func, Out, $($arg,)*> Constructor<($(Arc<$arg>,)*)> for Func
    where
      Func: Fn($(Arc<$arg>),*) -> Out + Send + Sync + 'static,
      Out: Any + Send + Sync,
      $($arg: ?Sized + Any + Send + Sync,)*
    {
      type Output = Out;

      fn dependencies() -> Vec<TypeKey> {
        vec![$(TypeKey::of::<$arg>()),*]
      }

      #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
      fn construct(&self, args: Arguments<'_>) -> Result<Out> {
        let mut index = 0;
        $(
          let $arg = args.take::<$arg>(index)?;
          index += 1;
        )*
        Ok((self)($($arg),*))
      }
    }
  };
}

impl_constructor!();
impl_constructor!(A1);
impl_constructor!(A1, A2);
impl_constructor!(A1, A2, A3);
impl_constructor!(A1, A2, A3, A4);
impl_constructor!(A1, A2, A3, A4, A5);
impl_constructor!(A1, A2, A3, A4, A5, A6);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Checks that a constructor output is exactly one value.
///
/// `()` means the constructor produces nothing and a tuple of two or more
/// elements means it produces several values; neither can be keyed by a single
/// type. A 1-tuple such as `(u8,)` holds one value and is keyed as itself.
pub(crate) fn check_output<T: ?Sized + Any>() -> Result<()> {
  let name = type_name::<T>();
  // Only a 1-tuple renders with a trailing comma before its closing paren.
  let single = name.ends_with(",)");
  let reason = if name == "()" {
    "constructor produces no value"
  } else if name.starts_with('(') && !single {
    "constructor produces several values; register one constructor per value"
  } else {
    return Ok(());
  };

  Err(Error::InvalidConstructor {
    output: TypeKey::of::<T>(),
    reason,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Clock;
  struct Ticker {
    _clock: Arc<Clock>,
  }

  fn dependencies_of<C: Constructor<Args>, Args>(_ctor: &C) -> Vec<TypeKey> {
    C::dependencies()
  }

  #[test]
  fn dependencies_follow_parameter_order() {
    let ctor = |_a: Arc<u8>, _b: Arc<str>, _c: Arc<Clock>| Ticker {
      _clock: Arc::new(Clock),
    };
    assert_eq!(
      dependencies_of(&ctor),
      vec![TypeKey::of::<u8>(), TypeKey::of::<str>(), TypeKey::of::<Clock>()]
    );
  }

  #[test]
  fn construct_downcasts_arguments() {
    let ctor = |clock: Arc<Clock>| Ticker { _clock: clock };
    let args = [Instance::new(Arc::new(Clock))];
    assert!(ctor.construct(Arguments::new(&args)).is_ok());

    let wrong = [Instance::new(Arc::new(7_u8))];
    assert!(matches!(
      ctor.construct(Arguments::new(&wrong)),
      Err(Error::TypeMismatch { .. })
    ));
  }

  #[test]
  fn output_shape_is_checked() {
    assert!(check_output::<Clock>().is_ok());
    assert!(check_output::<Arc<(u8, u8)>>().is_ok());
    assert!(check_output::<(u8,)>().is_ok());
    assert!(check_output::<((Clock, u8),)>().is_ok());
    assert!(matches!(
      check_output::<()>(),
      Err(Error::InvalidConstructor { .. })
    ));
    assert!(matches!(
      check_output::<(Clock, u8)>(),
      Err(Error::InvalidConstructor { .. })
    ));
    assert!(matches!(
      check_output::<(Clock, (u8,))>(),
      Err(Error::InvalidConstructor { .. })
    ));
  }
}
