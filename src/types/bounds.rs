//! Bounding box used by the object index

use super::Vector2;

/// 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    /// Minimum point (lower-left corner)
    pub min: Vector2,
    /// Maximum point (upper-right corner)
    pub max: Vector2,
}

impl BoundingBox2D {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        BoundingBox2D { min, max }
    }

    pub fn from_point(point: Vector2) -> Self {
        BoundingBox2D {
            min: point,
            max: point,
        }
    }

    /// Create a bounding box that contains all given points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = BoundingBox2D::from_point(*first);
        for point in rest {
            bbox.expand_to_include(*point);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// True when every coordinate is zero (the "unset" print area).
    pub fn is_zero(&self) -> bool {
        self.min == Vector2::ZERO && self.max == Vector2::ZERO
    }

    /// Expand the bounding box to include another point
    pub fn expand_to_include(&mut self, point: Vector2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Grow by `amount` on each side.
    pub fn inflated(&self, amount: f64) -> BoundingBox2D {
        BoundingBox2D {
            min: Vector2::new(self.min.x - amount, self.min.y - amount),
            max: Vector2::new(self.max.x + amount, self.max.y + amount),
        }
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        BoundingBox2D::from_point(Vector2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = [
            Vector2::new(1.0, 5.0),
            Vector2::new(-2.0, 3.0),
            Vector2::new(4.0, -1.0),
        ];
        let bb = BoundingBox2D::from_points(&pts).unwrap();
        assert_eq!(bb.min, Vector2::new(-2.0, -1.0));
        assert_eq!(bb.max, Vector2::new(4.0, 5.0));
        assert_eq!(bb.width(), 6.0);
        assert!(BoundingBox2D::from_points(&[]).is_none());
    }

    #[test]
    fn test_inflated() {
        let bb = BoundingBox2D::from_point(Vector2::new(1.0, 1.0)).inflated(0.5);
        assert_eq!(bb.min, Vector2::new(0.5, 0.5));
        assert_eq!(bb.height(), 1.0);
        assert!(BoundingBox2D::default().is_zero());
    }
}
