use crate::models::Vector2D;
use crate::utils::LayoutError;

/// A graph node taking part in the simulation.
///
/// A `Body` with an empty `id` is the "not found" sentinel returned by lookups that miss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub id: String,
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Force accumulated during the last pass. Reset at the start of every pass.
    pub force: Vector2D,
    pub mass: f64,
    /// Pinned bodies keep their position during integration.
    pub pinned: bool,
}

impl Body {
    /// Creates a resting, unpinned body.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an empty id and `InvalidMass` for a mass that is not
    /// positive and finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use force_layout::models::{Body, Vector2D};
    ///
    /// let body = Body::new("a", Vector2D::new(1.0, 2.0), 1.5).expect("valid body");
    /// assert_eq!(body.velocity, Vector2D::ZERO);
    /// assert!(Body::new("", Vector2D::ZERO, 1.0).is_err());
    /// assert!(Body::new("b", Vector2D::ZERO, 0.0).is_err());
    /// ```
    pub fn new(id: impl Into<String>, position: Vector2D, mass: f64) -> Result<Self, LayoutError> {
        let body = Body {
            id: id.into(),
            position,
            mass,
            ..Body::default()
        };
        body.validate()?;
        Ok(body)
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.id.is_empty() {
            return Err(LayoutError::InvalidId);
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(LayoutError::InvalidMass);
        }
        Ok(())
    }

    /// True for the sentinel returned by a missed lookup.
    pub fn is_sentinel(&self) -> bool {
        self.id.is_empty()
    }
}
