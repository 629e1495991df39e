use crate::models::Vector2D;

/// Running bounding box over every position seen since the last reset.
///
/// The box only grows. It is seeded by the first position it sees rather than by
/// the origin; an empty box reports both corners at the origin.
///
/// # Examples
///
/// ```
/// use force_layout::layout::BoundingBox;
/// use force_layout::models::Vector2D;
///
/// let mut bounds = BoundingBox::new();
/// bounds.extend(Vector2D::new(5.0, 5.0));
/// bounds.extend(Vector2D::new(7.0, 6.0));
/// assert_eq!(bounds.top_left(), Vector2D::new(5.0, 5.0));
/// assert_eq!(bounds.bottom_right(), Vector2D::new(7.0, 6.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    corners: Option<(Vector2D, Vector2D)>,
}

impl BoundingBox {
    pub fn new() -> Self {
        BoundingBox { corners: None }
    }

    pub fn extend(&mut self, p: Vector2D) {
        match &mut self.corners {
            None => self.corners = Some((p, p)),
            Some((min, max)) => {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    pub fn top_left(&self) -> Vector2D {
        self.corners.map_or(Vector2D::ZERO, |(min, _)| min)
    }

    pub fn bottom_right(&self) -> Vector2D {
        self.corners.map_or(Vector2D::ZERO, |(_, max)| max)
    }

    pub fn reset(&mut self) {
        self.corners = None;
    }
}
