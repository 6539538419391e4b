use super::{det, midpoint, orthogonal, Point2, TOLERANCE};

/// Circle passing through three sites, as seen by the sweep line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    /// Centre of the circle (the future Voronoi vertex).
    pub center: Point2,
    /// Radius of the circle.
    pub radius: f64,
}

impl Circumcircle {
    /// Sweep coordinate at which a downward-moving line touches the bottom of
    /// the circle.
    #[must_use]
    pub fn bottom_y(&self) -> f64 {
        self.center.y - self.radius
    }
}

/// Computes the circle through `p1`, `p2` and `p3`.
///
/// The centre is found as the intersection of the perpendicular bisectors of
/// `p1 p2` and `p2 p3`. Returns `None` for collinear or coincident points,
/// where the bisectors are parallel.
#[must_use]
pub fn circumcircle(p1: &Point2, p2: &Point2, p3: &Point2) -> Option<Circumcircle> {
    let v1 = orthogonal(&(p1 - p2));
    let v2 = orthogonal(&(p2 - p3));
    let denom = det(&v1, &v2);
    if denom.abs() <= TOLERANCE * v1.norm() * v2.norm() || !denom.is_finite() {
        return None;
    }
    let delta = (p3 - p1) * 0.5;
    let t = det(&delta, &v2) / denom;
    let center = midpoint(p1, p2) + v1 * t;
    let radius = (center - p1).norm();
    Some(Circumcircle { center, radius })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_is_equidistant() {
        let a = Point2::new(0.2, 0.2);
        let b = Point2::new(0.8, 0.2);
        let c = Point2::new(0.5, 0.8);
        let circle = circumcircle(&a, &b, &c).unwrap();
        assert_relative_eq!((circle.center - a).norm(), circle.radius, epsilon = 1e-12);
        assert_relative_eq!((circle.center - b).norm(), circle.radius, epsilon = 1e-12);
        assert_relative_eq!((circle.center - c).norm(), circle.radius, epsilon = 1e-12);
        assert_relative_eq!(circle.center.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(circle.center.y, 0.425, epsilon = 1e-12);
    }

    #[test]
    fn bottom_is_below_center() {
        let circle = circumcircle(
            &Point2::new(-1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(circle.center.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(circle.center.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(circle.bottom_y(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_have_no_circle() {
        let a = Point2::new(0.1, 0.5);
        let b = Point2::new(0.5, 0.5);
        let c = Point2::new(0.9, 0.5);
        assert!(circumcircle(&a, &b, &c).is_none());
        assert!(circumcircle(&a, &a, &c).is_none());
    }
}
