use super::{Point2, TOLERANCE};

/// Height of the parabola with the given `focus` and horizontal directrix `l`
/// at abscissa `x`.
///
/// Returns `None` when the focus lies on the directrix (the parabola has
/// degenerated into a vertical ray).
#[must_use]
pub fn parabola_y(focus: &Point2, l: f64, x: f64) -> Option<f64> {
    let p = focus.y - l;
    if p.abs() < TOLERANCE {
        return None;
    }
    let dx = x - focus.x;
    Some((dx * dx + focus.y * focus.y - l * l) / (2.0 * p))
}

/// Abscissa of the breakpoint between the arc of `left` and the arc of
/// `right` for the directrix `y = l`.
///
/// Both foci must lie on or above the directrix. Equal heights and foci on the
/// directrix are resolved without dividing by zero.
#[must_use]
pub fn breakpoint(left: &Point2, right: &Point2, l: f64) -> f64 {
    let (x1, y1, x2, y2) = (left.x, left.y, right.x, right.y);
    if (y1 - y2).abs() < TOLERANCE {
        return (x1 + x2) * 0.5;
    }
    if (y1 - l).abs() < TOLERANCE {
        return x1;
    }
    if (y2 - l).abs() < TOLERANCE {
        return x2;
    }

    // Equate both parabolas and solve a*x² + b*x + c = 0.
    let d1 = 1.0 / (2.0 * (y1 - l));
    let d2 = 1.0 / (2.0 * (y2 - l));
    let a = d1 - d2;
    let b = 2.0 * (x2 * d2 - x1 * d1);
    let c = (y1 * y1 + x1 * x1 - l * l) * d1 - (y2 * y2 + x2 * x2 - l * l) * d2;
    let delta = (b * b - 4.0 * a * c).max(0.0);
    (-b + delta.sqrt()) / (2.0 * a)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn breakpoint_lies_on_both_parabolas() {
        let a = Point2::new(0.2, 0.9);
        let b = Point2::new(0.7, 0.6);
        let l = 0.1;
        let x = breakpoint(&a, &b, l);
        let ya = parabola_y(&a, l, x).unwrap();
        let yb = parabola_y(&b, l, x).unwrap();
        assert_relative_eq!(ya, yb, epsilon = 1e-9);
    }

    #[test]
    fn breakpoint_order_selects_the_other_root() {
        let a = Point2::new(0.2, 0.9);
        let b = Point2::new(0.7, 0.6);
        let l = 0.1;
        let left_of_b = breakpoint(&a, &b, l);
        let right_of_b = breakpoint(&b, &a, l);
        assert!(left_of_b < b.x);
        assert!(right_of_b > b.x);
    }

    #[test]
    fn equal_heights_give_the_midpoint() {
        let a = Point2::new(0.25, 0.5);
        let b = Point2::new(0.75, 0.5);
        assert_relative_eq!(breakpoint(&a, &b, 0.0), 0.5);
        assert_relative_eq!(breakpoint(&a, &b, 0.5), 0.5);
    }

    #[test]
    fn focus_on_directrix_is_a_vertical_ray() {
        let above = Point2::new(0.0, 1.0);
        let on_line = Point2::new(0.3, 0.5);
        assert_relative_eq!(breakpoint(&above, &on_line, 0.5), 0.3);
        assert_relative_eq!(breakpoint(&on_line, &above, 0.5), 0.3);
        assert!(parabola_y(&on_line, 0.5, 0.3).is_none());
    }

    #[test]
    fn parabola_vertex_is_halfway_to_directrix() {
        let focus = Point2::new(1.0, 3.0);
        let y = parabola_y(&focus, 1.0, 1.0).unwrap();
        assert_relative_eq!(y, 2.0);
    }
}
