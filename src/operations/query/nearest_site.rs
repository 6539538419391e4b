use crate::math::Point2;
use crate::topology::Diagram;

/// Finds the site closest to a point, i.e. the site whose cell contains it.
///
/// Ties go to the lowest site index.
pub struct NearestSite {
    point: Point2,
}

impl NearestSite {
    /// Creates a new `NearestSite` query.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    /// Executes the query, returning the index of the nearest site, or `None`
    /// for a diagram without sites.
    #[must_use]
    pub fn execute(&self, diagram: &Diagram) -> Option<usize> {
        diagram
            .sites()
            .iter()
            .min_by(|a, b| {
                (a.point - self.point)
                    .norm_squared()
                    .total_cmp(&(b.point - self.point).norm_squared())
            })
            .map(|site| site.index)
    }
}
