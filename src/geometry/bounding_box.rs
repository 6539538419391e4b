use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// One side of an axis-aligned box.
///
/// The order is counter-clockwise, so walking `next()` from any side travels
/// around the box with the interior on the left. The y axis points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Bottom,
    Right,
    Top,
}

impl Side {
    /// All sides in counter-clockwise order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    /// Position of the side in [`Side::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Bottom => 1,
            Side::Right => 2,
            Side::Top => 3,
        }
    }

    /// Side with the given position, wrapping around.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The side that follows this one counter-clockwise.
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The side that precedes this one counter-clockwise.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

/// A point where a ray or segment meets the border of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The side that was hit.
    pub side: Side,
    /// The hit point, lying exactly on `side`.
    pub point: Point2,
}

/// An axis-aligned rectangle used to bound a diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    /// Creates a box from its four side coordinates.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBox` if a coordinate is not finite or the
    /// box has no area.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Result<Self> {
        let bbox = Self {
            left,
            bottom,
            right,
            top,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Checks that all coordinates are finite and the box has positive area.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidBox` otherwise.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.left, self.bottom, self.right, self.top]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.left >= self.right || self.bottom >= self.top {
            return Err(GeometryError::InvalidBox {
                left: self.left,
                bottom: self.bottom,
                right: self.right,
                top: self.top,
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.left + self.right) * 0.5,
            (self.bottom + self.top) * 0.5,
        )
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            bottom: self.bottom - margin,
            right: self.right + margin,
            top: self.top + margin,
        }
    }

    /// Grows the box so that it contains `point`.
    pub fn include(&mut self, point: &Point2) {
        self.left = self.left.min(point.x);
        self.bottom = self.bottom.min(point.y);
        self.right = self.right.max(point.x);
        self.top = self.top.max(point.y);
    }

    /// Returns `true` if `point` lies inside the box, borders included, with a
    /// tolerance of [`TOLERANCE`].
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.left - TOLERANCE
            && point.x <= self.right + TOLERANCE
            && point.y >= self.bottom - TOLERANCE
            && point.y <= self.top + TOLERANCE
    }

    /// Sides whose line passes through `point`, within [`TOLERANCE`], in
    /// counter-clockwise order. A corner lies on two sides.
    #[must_use]
    pub fn sides_at(&self, point: &Point2) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|side| match side {
                Side::Left => (point.x - self.left).abs() < TOLERANCE,
                Side::Bottom => (point.y - self.bottom).abs() < TOLERANCE,
                Side::Right => (point.x - self.right).abs() < TOLERANCE,
                Side::Top => (point.y - self.top).abs() < TOLERANCE,
            })
            .collect()
    }

    /// The corner at which `side` starts when walking counter-clockwise.
    #[must_use]
    pub fn corner(&self, side: Side) -> Point2 {
        match side {
            Side::Left => Point2::new(self.left, self.top),
            Side::Bottom => Point2::new(self.left, self.bottom),
            Side::Right => Point2::new(self.right, self.bottom),
            Side::Top => Point2::new(self.right, self.top),
        }
    }

    /// First point where the ray `origin + t * direction` (`t > 0`) leaves the
    /// box. `origin` must lie inside the box.
    ///
    /// Returns `None` for a zero direction.
    #[must_use]
    pub fn first_intersection(&self, origin: &Point2, direction: &Vector2) -> Option<Intersection> {
        let mut best: Option<(f64, Side)> = None;
        if direction.x > 0.0 {
            best = Some(((self.right - origin.x) / direction.x, Side::Right));
        } else if direction.x < 0.0 {
            best = Some(((self.left - origin.x) / direction.x, Side::Left));
        }
        let vertical = if direction.y > 0.0 {
            Some(((self.top - origin.y) / direction.y, Side::Top))
        } else if direction.y < 0.0 {
            Some(((self.bottom - origin.y) / direction.y, Side::Bottom))
        } else {
            None
        };
        if let Some((t, side)) = vertical {
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((t, side));
            }
        }
        best.map(|(t, side)| Intersection {
            side,
            point: self.snap(origin + direction * t, side),
        })
    }

    /// Points where the segment `origin -> destination` crosses the border,
    /// sorted from the nearest to the farthest from `origin`.
    ///
    /// Only sides that one of the endpoints lies beyond are tested. When the
    /// segment passes exactly through a corner both hits may coincide.
    #[must_use]
    pub fn intersections(&self, origin: &Point2, destination: &Point2) -> Vec<Intersection> {
        let direction = destination - origin;
        let mut hits: Vec<(f64, Intersection)> = Vec::with_capacity(2);

        let mut try_side = |side: Side, t: f64| {
            if !(t > TOLERANCE && t < 1.0 - TOLERANCE) {
                return;
            }
            let point = origin + direction * t;
            let on_border = match side {
                Side::Left | Side::Right => {
                    point.y >= self.bottom - TOLERANCE && point.y <= self.top + TOLERANCE
                }
                Side::Bottom | Side::Top => {
                    point.x >= self.left - TOLERANCE && point.x <= self.right + TOLERANCE
                }
            };
            if on_border {
                hits.push((
                    t,
                    Intersection {
                        side,
                        point: self.snap(point, side),
                    },
                ));
            }
        };

        if origin.x < self.left - TOLERANCE || destination.x < self.left - TOLERANCE {
            try_side(Side::Left, (self.left - origin.x) / direction.x);
        }
        if origin.x > self.right + TOLERANCE || destination.x > self.right + TOLERANCE {
            try_side(Side::Right, (self.right - origin.x) / direction.x);
        }
        if origin.y < self.bottom - TOLERANCE || destination.y < self.bottom - TOLERANCE {
            try_side(Side::Bottom, (self.bottom - origin.y) / direction.y);
        }
        if origin.y > self.top + TOLERANCE || destination.y > self.top + TOLERANCE {
            try_side(Side::Top, (self.top - origin.y) / direction.y);
        }

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, hit)| hit).collect()
    }

    /// Moves a point computed on `side` exactly onto it.
    fn snap(&self, point: Point2, side: Side) -> Point2 {
        match side {
            Side::Left => Point2::new(self.left, point.y.clamp(self.bottom, self.top)),
            Side::Right => Point2::new(self.right, point.y.clamp(self.bottom, self.top)),
            Side::Bottom => Point2::new(point.x.clamp(self.left, self.right), self.bottom),
            Side::Top => Point2::new(point.x.clamp(self.left, self.right), self.top),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn rejects_empty_and_non_finite_boxes() {
        assert!(BoundingBox::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 0.0).is_err());
        assert!(BoundingBox::new(0.0, f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn sides_cycle_counter_clockwise() {
        assert_eq!(Side::Left.next(), Side::Bottom);
        assert_eq!(Side::Top.next(), Side::Left);
        assert_eq!(Side::Left.prev(), Side::Top);
        for side in Side::ALL {
            assert_eq!(Side::from_index(side.index()), side);
        }
    }

    #[test]
    fn corners_start_their_side() {
        let bbox = unit();
        assert_eq!(bbox.corner(Side::Left), Point2::new(0.0, 1.0));
        assert_eq!(bbox.corner(Side::Bottom), Point2::new(0.0, 0.0));
        assert_eq!(bbox.corner(Side::Right), Point2::new(1.0, 0.0));
        assert_eq!(bbox.corner(Side::Top), Point2::new(1.0, 1.0));
    }

    #[test]
    fn contains_borders_with_tolerance() {
        let bbox = unit();
        assert!(bbox.contains(&Point2::new(0.0, 0.5)));
        assert!(bbox.contains(&Point2::new(1.0 + TOLERANCE * 0.5, 1.0)));
        assert!(!bbox.contains(&Point2::new(1.01, 0.5)));
        assert!(!bbox.contains(&Point2::new(0.5, -0.01)));
    }

    #[test]
    fn border_points_report_their_sides() {
        let bbox = unit();
        assert_eq!(bbox.sides_at(&Point2::new(0.5, 0.0)), vec![Side::Bottom]);
        assert_eq!(bbox.sides_at(&Point2::new(0.0, 0.0)), vec![Side::Left, Side::Bottom]);
        assert_eq!(bbox.sides_at(&Point2::new(0.0, 1.0)), vec![Side::Left, Side::Top]);
        assert!(bbox.sides_at(&Point2::new(0.5, 0.5)).is_empty());
        // A border-to-outside segment only touches the box at its origin.
        assert!(bbox
            .intersections(&Point2::new(0.5, 0.0), &Point2::new(0.5, -1.0))
            .is_empty());
    }

    #[test]
    fn include_grows_the_box() {
        let mut bbox = unit();
        bbox.include(&Point2::new(-1.0, 2.0));
        assert_relative_eq!(bbox.left, -1.0);
        assert_relative_eq!(bbox.top, 2.0);
        assert_relative_eq!(bbox.right, 1.0);
    }

    #[test]
    fn ray_hits_nearest_side() {
        let bbox = unit();
        let hit = bbox
            .first_intersection(&Point2::new(0.5, 0.5), &Vector2::new(0.0, -1.0))
            .unwrap();
        assert_eq!(hit.side, Side::Bottom);
        assert_relative_eq!(hit.point.x, 0.5);
        assert_relative_eq!(hit.point.y, 0.0);

        let hit = bbox
            .first_intersection(&Point2::new(0.5, 0.5), &Vector2::new(1.0, 0.2))
            .unwrap();
        assert_eq!(hit.side, Side::Right);
        assert_relative_eq!(hit.point.y, 0.6, epsilon = 1e-12);

        assert!(bbox
            .first_intersection(&Point2::new(0.5, 0.5), &Vector2::zeros())
            .is_none());
    }

    #[test]
    fn segment_crossing_counts() {
        let bbox = unit();
        // Inside to outside.
        let hits = bbox.intersections(&Point2::new(0.5, 0.5), &Point2::new(1.5, 0.5));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].side, Side::Right);
        assert_relative_eq!(hits[0].point.x, 1.0);

        // Through the box, sorted from the origin.
        let hits = bbox.intersections(&Point2::new(0.5, -1.0), &Point2::new(0.5, 2.0));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].side, Side::Bottom);
        assert_eq!(hits[1].side, Side::Top);

        let hits = bbox.intersections(&Point2::new(0.5, 2.0), &Point2::new(0.5, -1.0));
        assert_eq!(hits[0].side, Side::Top);
        assert_eq!(hits[1].side, Side::Bottom);

        // Entirely outside.
        let hits = bbox.intersections(&Point2::new(-1.0, -1.0), &Point2::new(-1.0, 2.0));
        assert!(hits.is_empty());

        // Entirely inside.
        let hits = bbox.intersections(&Point2::new(0.2, 0.2), &Point2::new(0.8, 0.8));
        assert!(hits.is_empty());
    }
}
