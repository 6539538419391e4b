use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::BoundingBox;
use crate::math::Point2;
use crate::operations::clip::ClipDiagram;
use crate::sweep::Fortune;
use crate::topology::Diagram;

/// Fraction of the larger box dimension used as padding by default.
const DEFAULT_PADDING_RATIO: f64 = 0.05;

/// Builds the Voronoi diagram of a set of sites, clipped to a rectangle.
///
/// # Algorithm
///
/// 1. Sweep the plane with [`Fortune`], leaving edges open at infinity
/// 2. Close every cell against the target box grown by a padding margin
/// 3. Clip the closed diagram to the exact target box
///
/// Site `i` of the result is `points[i]`.
#[derive(Debug)]
pub struct MakeVoronoi {
    points: Vec<Point2>,
    bbox: BoundingBox,
    padding: Option<f64>,
}

impl MakeVoronoi {
    /// Creates a new `MakeVoronoi` operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, bbox: BoundingBox) -> Self {
        Self {
            points,
            bbox,
            padding: None,
        }
    }

    /// Sets the margin between the target box and the padding box used to
    /// close the cells before clipping.
    #[must_use]
    pub fn with_padding(mut self, margin: f64) -> Self {
        self.padding = Some(margin);
        self
    }

    /// Executes the operation.
    ///
    /// An empty point set gives an empty diagram.
    ///
    /// # Errors
    ///
    /// - `GeometryError::InvalidBox` if the target box is empty or not finite
    /// - `OperationError::InvalidInput` for a non-finite coordinate, a repeated
    ///   site or a negative padding
    /// - `TopologyError` if the diagram cannot be closed or clipped
    pub fn execute(&self) -> Result<Diagram> {
        self.bbox.validate()?;
        self.validate_points()?;
        let padding = self.padding();
        if !padding.is_finite() || padding < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "padding {padding} is not a valid margin"
            ))
            .into());
        }

        let mut fortune = Fortune::new(&self.points);
        fortune.build()?;
        fortune.bound(self.bbox.expanded(padding))?;
        let mut diagram = fortune.into_diagram();
        ClipDiagram::new(self.bbox).execute(&mut diagram)?;

        debug!(
            sites = diagram.sites().len(),
            vertices = diagram.vertex_count(),
            edges = diagram.edge_count(),
            padding,
            "built voronoi diagram"
        );
        Ok(diagram)
    }

    fn padding(&self) -> f64 {
        self.padding
            .unwrap_or_else(|| DEFAULT_PADDING_RATIO * self.bbox.width().max(self.bbox.height()))
    }

    fn validate_points(&self) -> Result<()> {
        if let Some(i) = self
            .points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(OperationError::InvalidInput(format!(
                "site {i} has a non-finite coordinate"
            ))
            .into());
        }

        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (&self.points[a], &self.points[b]);
            pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
        });
        if let Some(pair) = order
            .windows(2)
            .find(|pair| self.points[pair[0]] == self.points[pair[1]])
        {
            let (a, b) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            return Err(
                OperationError::InvalidInput(format!("sites {a} and {b} coincide")).into(),
            );
        }
        Ok(())
    }
}
