pub mod circle_2d;
pub mod parabola_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `v` rotated a quarter turn counter-clockwise.
#[must_use]
pub fn orthogonal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D determinant (z component of the cross product) of `a` and `b`.
#[must_use]
pub fn det(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_is_ccw_quarter_turn() {
        let v = orthogonal(&Vector2::new(1.0, 0.0));
        assert!((v.x).abs() < TOLERANCE);
        assert!((v.y - 1.0).abs() < TOLERANCE);
        assert!(v.dot(&Vector2::new(1.0, 0.0)).abs() < TOLERANCE);
    }

    #[test]
    fn det_sign_follows_orientation() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert!((det(&x, &y) - 1.0).abs() < TOLERANCE);
        assert!((det(&y, &x) + 1.0).abs() < TOLERANCE);
        assert!(det(&x, &(x * 3.0)).abs() < TOLERANCE);
    }
}
