use crate::utils::{LayoutConfig, LayoutError, SpringDefaults, DEFAULT_LAYOUT_CONFIG};

#[test]
fn test_default_matches_constant() {
    assert_eq!(LayoutConfig::default(), DEFAULT_LAYOUT_CONFIG);
    assert!(LayoutConfig::default().validate().is_ok());
}

#[test]
fn test_new_fills_missing_values() {
    let config = LayoutConfig::new(None, Some(0.5), None, None);
    assert_eq!(config.theta, 0.5);
    assert_eq!(config.gravity, DEFAULT_LAYOUT_CONFIG.gravity);
    assert_eq!(config.drag_coefficient, DEFAULT_LAYOUT_CONFIG.drag_coefficient);
    assert_eq!(config.worker_count, DEFAULT_LAYOUT_CONFIG.worker_count);
}

#[test]
fn test_validate_rejects_bad_timestep() {
    let config = LayoutConfig::new(None, None, None, Some(0.0));
    assert_eq!(config.validate(), Err(LayoutError::InvalidTimestep));
    let config = LayoutConfig::new(None, None, None, Some(f64::NAN));
    assert_eq!(config.validate(), Err(LayoutError::InvalidTimestep));
}

#[test]
fn test_validate_rejects_negative_theta() {
    let config = LayoutConfig::new(None, Some(-0.1), None, None);
    assert_eq!(config.validate(), Err(LayoutError::InvalidTheta));
    // Zero turns the approximation off but is still valid.
    assert!(LayoutConfig::new(None, Some(0.0), None, None).validate().is_ok());
}

#[test]
fn test_validate_rejects_negative_drag() {
    let config = LayoutConfig::new(None, None, Some(-1.0), None);
    assert_eq!(config.validate(), Err(LayoutError::InvalidCoefficient));
}

#[test]
fn test_validate_rejects_zero_workers() {
    let config = LayoutConfig::default().with_worker_count(0);
    assert_eq!(config.validate(), Err(LayoutError::InvalidWorkerCount));
}

#[test]
fn test_validate_rejects_zero_spring_weight() {
    let springs = SpringDefaults { weight: 0.0, ..SpringDefaults::default() };
    let config = LayoutConfig::default().with_spring_defaults(springs);
    assert_eq!(config.validate(), Err(LayoutError::InvalidCoefficient));
}

#[test]
fn test_default_body_mass_grows_with_degree() {
    assert_eq!(LayoutConfig::default_body_mass(0), 1.0);
    assert_eq!(LayoutConfig::default_body_mass(3), 2.0);
}

#[test]
fn test_error_display() {
    assert_eq!(LayoutError::InvalidMass.to_string(), "Invalid mass value");
    assert_eq!(LayoutError::WorkerDisconnected(2).to_string(), "Worker 2 disconnected");
}
