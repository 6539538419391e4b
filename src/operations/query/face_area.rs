use crate::error::Result;
use crate::math::polygon_2d::signed_area_2d;
use crate::topology::Diagram;

/// Computes the area of the cell of one site.
///
/// Cells of a clipped diagram are convex and counter-clockwise, so the area
/// is positive. A cell without boundary has zero area.
pub struct FaceArea {
    site: usize,
}

impl FaceArea {
    /// Creates a new `FaceArea` query for the cell of `site`.
    #[must_use]
    pub fn new(site: usize) -> Self {
        Self { site }
    }

    /// Executes the query, returning the cell area.
    ///
    /// # Errors
    ///
    /// Returns an error if the site does not exist or its boundary is not a
    /// closed cycle.
    pub fn execute(&self, diagram: &Diagram) -> Result<f64> {
        let face = diagram.site(self.site)?.face;
        Ok(signed_area_2d(&diagram.face_polygon(face)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::math::Point2;
    use crate::operations::creation::MakeVoronoi;
    use approx::assert_relative_eq;

    #[test]
    fn halves_of_a_rectangle() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 1.0).unwrap();
        let diagram = MakeVoronoi::new(vec![Point2::new(0.5, 0.5), Point2::new(1.5, 0.5)], bbox)
            .execute()
            .unwrap();
        assert_relative_eq!(FaceArea::new(0).execute(&diagram).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(FaceArea::new(1).execute(&diagram).unwrap(), 1.0, epsilon = 1e-12);
        assert!(FaceArea::new(2).execute(&diagram).is_err());
    }

    #[test]
    fn cell_outside_the_box_has_no_area() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let diagram = MakeVoronoi::new(vec![Point2::new(0.5, 0.5), Point2::new(9.0, 9.0)], bbox)
            .execute()
            .unwrap();
        assert_relative_eq!(FaceArea::new(0).execute(&diagram).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(FaceArea::new(1).execute(&diagram).unwrap(), 0.0);
    }
}
