use crate::models::Vector2D;
use crate::utils::{LayoutError, SpringDefaults, DISTANCE_EPSILON};

/// An edge pulling two bodies toward `rest_length`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spring {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Restoring-force proportionality constant.
    pub stiffness: f64,
    pub rest_length: f64,
    /// Divisor applied to the spring force.
    pub weight: f64,
}

impl Spring {
    /// Creates a spring between two body ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an empty id and `InvalidCoefficient` for a non-positive
    /// weight or a negative stiffness.
    ///
    /// # Examples
    ///
    /// ```
    /// use force_layout::models::Spring;
    ///
    /// let spring = Spring::new("ab", "a", "b", 0.0015, 80.0, 1.0).expect("valid spring");
    /// assert_eq!(spring.rest_length, 80.0);
    /// assert!(Spring::new("ab", "a", "b", 0.0015, 80.0, 0.0).is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        stiffness: f64,
        rest_length: f64,
        weight: f64,
    ) -> Result<Self, LayoutError> {
        let spring = Spring {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            stiffness,
            rest_length,
            weight,
        };
        spring.validate()?;
        Ok(spring)
    }

    /// Creates a spring whose coefficients come from `defaults`.
    pub fn with_defaults(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        defaults: &SpringDefaults,
    ) -> Result<Self, LayoutError> {
        Spring::new(id, from, to, defaults.stiffness, defaults.rest_length, defaults.weight)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.id.is_empty() || self.from.is_empty() || self.to.is_empty() {
            return Err(LayoutError::InvalidId);
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(LayoutError::InvalidCoefficient);
        }
        if !(self.stiffness.is_finite() && self.stiffness >= 0.0) {
            return Err(LayoutError::InvalidCoefficient);
        }
        Ok(())
    }

    pub fn is_sentinel(&self) -> bool {
        self.id.is_empty()
    }

    /// Hooke's-law force on the `from` endpoint given both endpoint positions.
    /// The `to` endpoint receives the negation.
    ///
    /// # Examples
    ///
    /// ```
    /// use force_layout::models::{Spring, Vector2D};
    ///
    /// let spring = Spring::new("ab", "a", "b", 0.5, 10.0, 1.0).expect("valid spring");
    /// // Stretched to 20: `from` is pulled toward `to`.
    /// let f = spring.force(Vector2D::new(0.0, 0.0), Vector2D::new(20.0, 0.0));
    /// assert!((f.x - 5.0).abs() < 1e-6);
    /// ```
    pub fn force(&self, from: Vector2D, to: Vector2D) -> Vector2D {
        let d = to - from;
        let r = d.length() + DISTANCE_EPSILON;
        let coefficient = self.stiffness * (r - self.rest_length) / (r * self.weight);
        d * coefficient
    }

    /// True if either endpoint is `body_id`.
    pub fn touches(&self, body_id: &str) -> bool {
        self.from == body_id || self.to == body_id
    }
}
