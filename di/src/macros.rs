//! Public macros for ergonomic wiring.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// Meant for wiring code that treats a missing dependency as a bug. For a
/// fallible lookup call [`Container::resolve`](crate::Container::resolve).
///
/// # Panics
///
/// Panics with the resolution error if the service cannot be resolved.
///
/// # Examples
///
/// ```
/// use fibre_di::{contract, resolve, Container, Scope};
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.register(|| EnglishGreeter, Scope::Singleton).unwrap();
/// contract!(&container, dyn Greeter => EnglishGreeter).unwrap();
/// container.register_interface::<dyn Greeter>(fibre_di::TypeKey::of::<EnglishGreeter>()).unwrap();
///
/// let greeter = resolve!(&container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
///
/// container.register_instance(String::from("hello"));
/// assert_eq!(*resolve!(&container, String), "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving a trait object: resolve!(&container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    ($container).resolve::<dyn $trait_ident>().unwrap_or_else(|error| {
      panic!(
        "Failed to resolve required trait service {}: {}",
        std::any::type_name::<dyn $trait_ident>(),
        error
      )
    })
  };

  // Arm for resolving a concrete type: resolve!(&container, MyService)
  ($container:expr, $type:ty) => {
    ($container).resolve::<$type>().unwrap_or_else(|error| {
      panic!(
        "Failed to resolve required service {}: {}",
        std::any::type_name::<$type>(),
        error
      )
    })
  };
}

/// Declares that each listed type satisfies a capability.
///
/// `contract!(&container, dyn Notifier => EmailNotifier, SmsNotifier)` calls
/// [`Container::declare_contract`](crate::Container::declare_contract) once
/// per implementation with the upcasting closure filled in, stopping at the
/// first error. It evaluates to `fibre_di::Result<()>`.
#[macro_export]
macro_rules! contract {
  ($container:expr, dyn $trait_ident:ident => $($impl_ty:ty),+ $(,)?) => {
    (|| -> $crate::Result<()> {
      let container: &$crate::Container = $container;
      $(
        container.declare_contract::<dyn $trait_ident, $impl_ty, _>(
          |it: std::sync::Arc<$impl_ty>| -> std::sync::Arc<dyn $trait_ident> { it },
        )?;
      )+
      Ok(())
    })()
  };
}
