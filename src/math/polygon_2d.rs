use super::{det, Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area-weighted centroid of a simple polygon.
///
/// Falls back to the vertex average for degenerate (zero-area) polygons.
#[must_use]
pub fn polygon_centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv_n = 1.0 / points.len() as f64;
        return Some(Point2::new(
            points.iter().map(|p| p.x).sum::<f64>() * inv_n,
            points.iter().map(|p| p.y).sum::<f64>() * inv_n,
        ));
    }
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    let k = 1.0 / (6.0 * area);
    Some(Point2::new(cx * k, cy * k))
}

/// Returns `true` if `point` lies strictly inside the counter-clockwise convex
/// polygon, at least `margin` away from every edge line.
#[must_use]
pub fn convex_contains(points: &[Point2], point: &Point2, margin: f64) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let edge = b - a;
        let len = edge.norm();
        if len < TOLERANCE {
            // Zero-length edges do not constrain the interior.
            return true;
        }
        det(&edge, &(point - a)) / len > margin
    })
}
