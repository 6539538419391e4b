//! Closing the unbounded cells against a padding box.
//!
//! Every breakpoint left on the beachline traces an edge that is still open
//! at one end. That end is moved to where the edge leaves the box, then each
//! cell is closed by walking along the box border, adding corners where the
//! border turns.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{BoundingBox, Side};
use crate::math::{midpoint, orthogonal, Point2, Vector2};
use crate::topology::{HalfEdgeId, VertexId};

use super::beachline::ArcId;
use super::Fortune;

/// A border vertex of one cell with the interior half-edges around it.
#[derive(Debug, Clone, Copy)]
struct LinkedVertex {
    prev_half_edge: Option<HalfEdgeId>,
    vertex: VertexId,
    next_half_edge: Option<HalfEdgeId>,
}

impl LinkedVertex {
    fn corner(vertex: VertexId) -> Self {
        Self {
            prev_half_edge: None,
            vertex,
            next_half_edge: None,
        }
    }
}

/// Where one cell's boundary runs along the box.
///
/// Slot `2 * side` holds the vertex where the boundary starts following
/// `side`, slot `2 * side + 1` the vertex where it leaves it again. Slots
/// index into a shared list so that a corner can end one side and start the
/// next.
type CellBorder = [Option<usize>; 8];

#[derive(Debug, Default)]
struct BorderVertices {
    linked: Vec<LinkedVertex>,
    cells: BTreeMap<usize, CellBorder>,
}

impl BorderVertices {
    fn attach(&mut self, site: usize, slot: usize, vertex: LinkedVertex) {
        self.linked.push(vertex);
        let index = self.linked.len() - 1;
        self.cells.entry(site).or_insert([None; 8])[slot] = Some(index);
    }
}

impl Fortune {
    /// Closes every cell of the swept diagram inside `bbox`.
    ///
    /// The box is first grown to contain every site and every vertex, so
    /// rays always leave it forwards. Cells are closed along the grown box.
    ///
    /// # Errors
    ///
    /// Returns an error if `bbox` is not a valid box, if two sites coincide,
    /// or if a cell's border cannot be matched up.
    pub fn bound(&mut self, mut bbox: BoundingBox) -> Result<()> {
        bbox.validate()?;
        for (_, vertex) in self.diagram.vertices() {
            bbox.include(&vertex.point);
        }
        for site in self.diagram.sites() {
            bbox.include(&site.point);
        }

        let mut border = BorderVertices::default();
        self.bound_breakpoints(&bbox, &mut border)?;
        self.bound_upward_rays(&bbox, &mut border)?;
        let corners = self.add_corners(&bbox, &mut border)?;
        self.join_along_border(&border)?;

        // Cells without any edge: only possible with a single site.
        let bare: Vec<_> = self
            .diagram
            .faces()
            .filter(|(_, face)| face.boundary.is_none())
            .map(|(id, _)| id)
            .collect();
        for face in bare {
            self.diagram.enclose_in_box(face, &bbox)?;
        }

        debug!(
            ?bbox,
            cells = border.cells.len(),
            corners,
            vertices = self.diagram.vertex_count(),
            "bounded diagram"
        );
        Ok(())
    }

    /// Ends the edge of every remaining breakpoint on the box.
    fn bound_breakpoints(&mut self, bbox: &BoundingBox, border: &mut BorderVertices) -> Result<()> {
        let arcs: Vec<ArcId> = self.beachline.iter().collect();
        for pair in arcs.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let left_arc = self.beachline.arc(left);
            let right_arc = self.beachline.arc(right);
            let (left_site, right_site) = (left_arc.site, right_arc.site);
            let direction = orthogonal(&(left_arc.point - right_arc.point));
            let origin = midpoint(&left_arc.point, &right_arc.point);

            let (vertex, side) = self.shoot(bbox, &origin, &direction)?;
            self.set_destination(left, right, vertex)?;

            let next_half_edge = self.right_half_edge(left)?;
            let prev_half_edge = self.left_half_edge(right)?;
            border.attach(
                left_site,
                2 * side.index() + 1,
                LinkedVertex {
                    prev_half_edge: None,
                    vertex,
                    next_half_edge: Some(next_half_edge),
                },
            );
            border.attach(
                right_site,
                2 * side.index(),
                LinkedVertex {
                    prev_half_edge: Some(prev_half_edge),
                    vertex,
                    next_half_edge: None,
                },
            );
        }
        Ok(())
    }

    /// Ends the upward edges between top-row sites on the box.
    fn bound_upward_rays(&mut self, bbox: &BoundingBox, border: &mut BorderVertices) -> Result<()> {
        for ray in std::mem::take(&mut self.upward_rays) {
            let left = self.diagram.site(ray.left_site)?.point;
            let right = self.diagram.site(ray.right_site)?.point;
            let direction = orthogonal(&(right - left));
            let origin = midpoint(&left, &right);

            let (vertex, side) = self.shoot(bbox, &origin, &direction)?;
            self.diagram.half_edge_mut(ray.left_half_edge)?.destination = Some(vertex);
            self.diagram.half_edge_mut(ray.right_half_edge)?.origin = Some(vertex);

            border.attach(
                ray.left_site,
                2 * side.index(),
                LinkedVertex {
                    prev_half_edge: Some(ray.left_half_edge),
                    vertex,
                    next_half_edge: None,
                },
            );
            border.attach(
                ray.right_site,
                2 * side.index() + 1,
                LinkedVertex {
                    prev_half_edge: None,
                    vertex,
                    next_half_edge: Some(ray.right_half_edge),
                },
            );
        }
        Ok(())
    }

    fn shoot(
        &mut self,
        bbox: &BoundingBox,
        origin: &Point2,
        direction: &Vector2,
    ) -> Result<(VertexId, Side)> {
        let hit = bbox
            .first_intersection(origin, direction)
            .ok_or_else(|| GeometryError::Degenerate("coincident sites".into()))?;
        Ok((self.diagram.create_vertex(hit.point), hit.side))
    }

    /// Fills the slots of each cell that the border passes through with box
    /// corners. Returns the number of corners created.
    ///
    /// One extra step revisits the first side, whose start may only be known
    /// once the last side was handled.
    fn add_corners(&mut self, bbox: &BoundingBox, border: &mut BorderVertices) -> Result<usize> {
        let mut corners = 0;
        for (&site, cell) in &mut border.cells {
            for i in 0..=Side::ALL.len() {
                let side = Side::from_index(i);
                let (start, end) = (2 * side.index(), 2 * side.index() + 1);
                let corner_side = match (cell[start], cell[end]) {
                    (None, Some(_)) => side,
                    (Some(_), None) => side.next(),
                    _ => continue,
                };
                let vertex = self.diagram.create_corner(bbox, corner_side);
                border.linked.push(LinkedVertex::corner(vertex));
                let index = border.linked.len() - 1;
                // The corner ends the side before it and starts its own.
                cell[2 * corner_side.prev().index() + 1] = Some(index);
                cell[2 * corner_side.index()] = Some(index);
                corners += 1;
            }
            for side in Side::ALL {
                if cell[2 * side.index()].is_some() != cell[2 * side.index() + 1].is_some() {
                    return Err(TopologyError::InvalidTopology(format!(
                        "border of cell {site} is open on side {side:?}"
                    ))
                    .into());
                }
            }
        }
        Ok(corners)
    }

    /// Creates one border half-edge per side each cell runs along.
    fn join_along_border(&mut self, border: &BorderVertices) -> Result<()> {
        // Half-edges created so far around each linked vertex.
        let mut linked = border.linked.clone();
        for (&site, cell) in &border.cells {
            let face = self.diagram.site(site)?.face;
            for side in Side::ALL {
                let (Some(start), Some(end)) = (cell[2 * side.index()], cell[2 * side.index() + 1])
                else {
                    continue;
                };
                let half_edge = self.diagram.create_half_edge(face)?;
                let data = self.diagram.half_edge_mut(half_edge)?;
                data.origin = Some(linked[start].vertex);
                data.destination = Some(linked[end].vertex);

                linked[start].next_half_edge = Some(half_edge);
                if let Some(prev) = linked[start].prev_half_edge {
                    self.diagram.link(prev, half_edge)?;
                }
                linked[end].prev_half_edge = Some(half_edge);
                if let Some(next) = linked[end].next_half_edge {
                    self.diagram.link(half_edge, next)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area_2d;
    use approx::assert_relative_eq;

    fn bounded(points: &[Point2]) -> Fortune {
        let mut fortune = Fortune::new(points);
        fortune.build().unwrap();
        fortune
            .bound(BoundingBox::new(-0.5, -0.5, 1.5, 1.5).unwrap())
            .unwrap();
        fortune
    }

    fn total_area(fortune: &Fortune) -> f64 {
        let diagram = fortune.diagram();
        diagram
            .faces()
            .map(|(id, _)| signed_area_2d(&diagram.face_polygon(id).unwrap()))
            .sum()
    }

    #[test]
    fn single_site_fills_the_box() {
        let fortune = bounded(&[Point2::new(0.5, 0.5)]);
        let diagram = fortune.diagram();
        let face = diagram.site(0).unwrap().face;
        assert_eq!(diagram.face_cycle(face).unwrap().len(), 4);
        assert_relative_eq!(total_area(&fortune), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn side_by_side_sites_split_the_box() {
        let fortune = bounded(&[Point2::new(0.25, 0.5), Point2::new(0.75, 0.5)]);
        let diagram = fortune.diagram();
        for site in diagram.sites() {
            let polygon = diagram.face_polygon(site.face).unwrap();
            assert_eq!(polygon.len(), 4);
            assert_relative_eq!(signed_area_2d(&polygon), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn stacked_sites_split_the_box() {
        let fortune = bounded(&[Point2::new(0.5, 0.75), Point2::new(0.5, 0.25)]);
        let diagram = fortune.diagram();
        let upper = diagram.face_polygon(diagram.site(0).unwrap().face).unwrap();
        assert!(upper.iter().all(|p| p.y >= 0.5 - 1e-12));
        assert_relative_eq!(total_area(&fortune), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn cells_tile_the_box() {
        let fortune = bounded(&[
            Point2::new(0.1, 0.3),
            Point2::new(0.4, 0.9),
            Point2::new(0.7, 0.2),
            Point2::new(0.9, 0.6),
            Point2::new(0.5, 0.5),
        ]);
        let diagram = fortune.diagram();
        for (id, _) in diagram.faces() {
            assert!(signed_area_2d(&diagram.face_polygon(id).unwrap()) > 0.0);
        }
        assert_relative_eq!(total_area(&fortune), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn top_row_cells_reach_the_top_side() {
        let fortune = bounded(&[
            Point2::new(0.2, 0.8),
            Point2::new(0.5, 0.8),
            Point2::new(0.8, 0.8),
            Point2::new(0.5, 0.3),
        ]);
        let diagram = fortune.diagram();
        for i in 0..3 {
            let polygon = diagram.face_polygon(diagram.site(i).unwrap().face).unwrap();
            assert!(polygon.iter().any(|p| (p.y - 1.5).abs() < 1e-12));
        }
        assert_relative_eq!(total_area(&fortune), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn box_grows_around_far_vertices() {
        // The circumcenter of this flat triangle lies far below the box.
        let mut fortune = Fortune::new(&[
            Point2::new(0.0, 0.5),
            Point2::new(1.0, 0.5),
            Point2::new(0.5, 0.51),
        ]);
        fortune.build().unwrap();
        fortune
            .bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap())
            .unwrap();
        let diagram = fortune.diagram();
        let lowest = diagram
            .vertices()
            .map(|(_, v)| v.point.y)
            .fold(f64::INFINITY, f64::min);
        assert!(lowest < -10.0);
        for (id, _) in diagram.faces() {
            assert!(signed_area_2d(&diagram.face_polygon(id).unwrap()) > 0.0);
        }
    }

    #[test]
    fn rejects_inverted_box() {
        let mut fortune = Fortune::new(&[Point2::new(0.5, 0.5)]);
        fortune.build().unwrap();
        let inverted = BoundingBox {
            left: 1.0,
            bottom: 0.0,
            right: 0.0,
            top: 1.0,
        };
        assert!(fortune.bound(inverted).is_err());
    }
}
