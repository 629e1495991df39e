// src/utils/layout_config.rs
use crate::utils::{
    DEFAULT_LAYOUT_CONFIG,
    DEFAULT_SPRING_DEFAULTS,
    errors::LayoutError
};

/// Values used to fill in springs created without an explicit length or weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringDefaults {
    pub rest_length: f64,
    pub stiffness: f64,
    pub weight: f64,
}

impl Default for SpringDefaults {
    fn default() -> Self {
        DEFAULT_SPRING_DEFAULTS
    }
}

/// Physical constants and runtime settings for a layout.
///
/// A config is validated once when a [`crate::layout::Layout`] is built and is
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Signed repulsion strength. Negative values push bodies apart.
    pub gravity: f64,
    /// Barnes-Hut opening angle. Zero disables the far-field approximation.
    pub theta: f64,
    /// Linear drag subtracted from every body's force, scaled by its velocity.
    pub drag_coefficient: f64,
    /// Integration timestep.
    pub timestep: f64,
    /// Number of force workers.
    pub worker_count: usize,
    /// Seed for coincident-body jitter and random placement.
    pub seed: u64,
    pub springs: SpringDefaults,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        DEFAULT_LAYOUT_CONFIG
    }
}

impl LayoutConfig {
    /// Builds a config, taking every missing value from [`DEFAULT_LAYOUT_CONFIG`].
    ///
    /// # Example
    /// ```
    /// use force_layout::utils::LayoutConfig;
    ///
    /// let config = LayoutConfig::new(Some(-2.0), None, None, Some(10.0));
    /// assert_eq!(config.gravity, -2.0);
    /// assert_eq!(config.theta, 0.8);
    /// assert_eq!(config.timestep, 10.0);
    /// ```
    pub fn new(
        gravity: Option<f64>,
        theta: Option<f64>,
        drag_coefficient: Option<f64>,
        timestep: Option<f64>,
    ) -> Self {
        let default = DEFAULT_LAYOUT_CONFIG;
        Self {
            gravity: gravity.unwrap_or(default.gravity),
            theta: theta.unwrap_or(default.theta),
            drag_coefficient: drag_coefficient.unwrap_or(default.drag_coefficient),
            timestep: timestep.unwrap_or(default.timestep),
            ..default
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_spring_defaults(mut self, springs: SpringDefaults) -> Self {
        self.springs = springs;
        self
    }

    /// Checks every value once; a layout never re-validates its config.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) { return Err(LayoutError::InvalidTimestep); }
        if !(self.theta.is_finite() && self.theta >= 0.0) { return Err(LayoutError::InvalidTheta); }
        if !self.gravity.is_finite() { return Err(LayoutError::InvalidCoefficient); }
        if !(self.drag_coefficient.is_finite() && self.drag_coefficient >= 0.0) { return Err(LayoutError::InvalidCoefficient); }
        if self.worker_count == 0 { return Err(LayoutError::InvalidWorkerCount); }
        if !(self.springs.weight.is_finite() && self.springs.weight > 0.0) { return Err(LayoutError::InvalidCoefficient); }
        if !(self.springs.stiffness.is_finite() && self.springs.stiffness >= 0.0) { return Err(LayoutError::InvalidCoefficient); }
        Ok(())
    }

    /// Mass given to a body created from a graph node with `degree` links.
    pub fn default_body_mass(degree: usize) -> f64 {
        1.0 + degree as f64 / 3.0
    }
}
