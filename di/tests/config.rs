use fibre_di::{Container, ContainerConfig, Scope, DEFAULT_MAX_DEPTH};
use pretty_assertions::assert_eq;

#[test]
fn test_full_config_from_yaml() {
  let yaml = r#"
eager_alias_validation: true
max_depth: 12
"#;
  let config: ContainerConfig = serde_yaml::from_str(yaml).unwrap();

  assert_eq!(
    config,
    ContainerConfig::default()
      .with_eager_alias_validation(true)
      .with_max_depth(12)
  );

  let container = Container::with_config(config).unwrap();
  assert_eq!(container.config().max_depth, 12);
}

#[test]
fn test_missing_fields_take_defaults() {
  let config: ContainerConfig = serde_yaml::from_str("max_depth: 3").unwrap();
  assert!(!config.eager_alias_validation);
  assert_eq!(config.max_depth, 3);

  let config: ContainerConfig = serde_yaml::from_str("{}").unwrap();
  assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
}

#[test]
fn test_unknown_fields_are_rejected() {
  let result = serde_yaml::from_str::<ContainerConfig>("max_dept: 3");
  assert!(result.is_err());
}

#[test]
fn test_zero_depth_parses_but_fails_validation() {
  let config: ContainerConfig = serde_yaml::from_str("max_depth: 0").unwrap();
  assert!(config.validate().is_err());
  assert!(Container::with_config(config).is_err());
}

#[test]
fn test_scope_names() {
  assert_eq!(serde_yaml::from_str::<Scope>("singleton").unwrap(), Scope::Singleton);
  assert_eq!(serde_yaml::from_str::<Scope>("transient").unwrap(), Scope::Transient);
  assert_eq!(Scope::Transient.to_string(), "transient");
}
