//! Fortune's sweep-line construction of the Voronoi diagram.
//!
//! The sweep line moves from `+y` towards `-y`. Site events split arcs of the
//! beachline, circle events remove arcs that shrank to a point and create the
//! Voronoi vertices. After the sweep, [`Fortune::bound`] closes every cell
//! against a padding box.

pub mod beachline;
mod bound;
pub mod event_queue;

use tracing::{debug, trace};

use crate::error::{Result, TopologyError};
use crate::math::circle_2d::circumcircle;
use crate::math::{det, Point2, TOLERANCE};
use crate::topology::{Diagram, HalfEdgeId, VertexId};

use beachline::{ArcId, Beachline};
use event_queue::{Event, EventKind, EventQueue};

/// An edge between two sites of the topmost row, open towards `+y`.
#[derive(Debug, Clone, Copy)]
struct UpwardRay {
    left_site: usize,
    right_site: usize,
    /// Half-edge of the left site's face, pointing up.
    left_half_edge: HalfEdgeId,
    /// Half-edge of the right site's face, pointing down.
    right_half_edge: HalfEdgeId,
}

/// Sweep-line state: the diagram under construction, the beachline and the
/// pending events.
#[derive(Debug)]
pub struct Fortune {
    diagram: Diagram,
    beachline: Beachline,
    events: EventQueue,
    sweep_y: f64,
    /// Sweep coordinate of the topmost row of sites.
    top_y: f64,
    upward_rays: Vec<UpwardRay>,
}

impl Fortune {
    /// Prepares a sweep over `points`; site `i` is `points[i]`.
    #[must_use]
    pub fn new(points: &[Point2]) -> Self {
        Self {
            diagram: Diagram::new(points),
            beachline: Beachline::new(),
            events: EventQueue::new(),
            sweep_y: f64::INFINITY,
            top_y: f64::INFINITY,
            upward_rays: Vec::new(),
        }
    }

    /// Runs the sweep until no event is left.
    ///
    /// Sites with equal `y` are queued by increasing `x`, so they are reached
    /// from left to right. Sites within [`TOLERANCE`] of the highest `y` are
    /// swept as one top row.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-edge structure becomes inconsistent.
    pub fn build(&mut self) -> Result<()> {
        let mut order: Vec<usize> = (0..self.diagram.sites().len()).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (&self.diagram.sites()[a].point, &self.diagram.sites()[b].point);
            pa.x.total_cmp(&pb.x)
        });
        self.top_y = self
            .diagram
            .sites()
            .iter()
            .map(|site| site.point.y)
            .fold(f64::NEG_INFINITY, f64::max);
        for index in order {
            let mut y = self.diagram.sites()[index].point.y;
            if self.top_y - y < TOLERANCE {
                y = self.top_y;
            }
            self.events.push(Event::site(index, y));
        }
        debug!(sites = self.diagram.sites().len(), "starting sweep");

        while let Some(event) = self.events.pop() {
            self.sweep_y = event.y;
            match event.kind {
                EventKind::Site { site } => self.handle_site_event(site)?,
                EventKind::Circle { point, arc } => self.handle_circle_event(point, arc)?,
            }
        }

        debug!(
            vertices = self.diagram.vertex_count(),
            half_edges = self.diagram.half_edge_count(),
            arcs = self.beachline.len(),
            "sweep finished"
        );
        Ok(())
    }

    /// The diagram built so far.
    #[must_use]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Consumes the sweep, dropping the beachline.
    #[must_use]
    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    fn handle_site_event(&mut self, site: usize) -> Result<()> {
        let point = self.diagram.site(site)?.point;
        // 1. First arc
        let Some(above) = self.beachline.locate_arc_above(&point, self.sweep_y) else {
            let arc = self.beachline.create_arc(site, point);
            self.beachline.set_root(arc);
            return Ok(());
        };
        // The top row arrives left to right and only extends the beachline.
        let above_arc = self.beachline.arc(above);
        if self.sweep_y >= self.top_y
            && above_arc.next.is_none()
            && point.x >= above_arc.point.x
        {
            return self.insert_beside(above, site, point);
        }
        // 2. The arc above is split, its circle event is void
        self.delete_event(above);
        // 3. Replace it by left copy, new arc, right copy
        let middle = self.break_arc(above, site, point);
        let left = self.prev_of(middle)?;
        let right = self.next_of(middle)?;
        // 4. Both new breakpoints trace the same edge
        self.add_edge(left, middle)?;
        let shared = self.beachline.arc(middle).left_half_edge;
        self.beachline.arc_mut(middle).right_half_edge = shared;
        let shared = self.beachline.arc(left).right_half_edge;
        self.beachline.arc_mut(right).left_half_edge = shared;
        // 5. Circle events of the outer triples
        if let Some(left_prev) = self.beachline.arc(left).prev {
            self.add_event(left_prev, left, middle);
        }
        if let Some(right_next) = self.beachline.arc(right).next {
            self.add_event(middle, right, right_next);
        }
        Ok(())
    }

    fn handle_circle_event(&mut self, point: Point2, arc: ArcId) -> Result<()> {
        if !self.beachline.contains(arc) {
            trace!(?point, "dropping circle event of a removed arc");
            return Ok(());
        }
        // The event is being consumed.
        self.beachline.arc_mut(arc).event = None;
        // 1. Vertex
        let vertex = self.diagram.create_vertex(point);
        // 2. Triples of the neighbours change
        let left = self.prev_of(arc)?;
        let right = self.next_of(arc)?;
        self.delete_event(left);
        self.delete_event(right);
        // 3-4. Close the arc's edges and open the new one
        self.remove_arc(arc, vertex)?;
        // 5. New triples
        if let Some(left_prev) = self.beachline.arc(left).prev {
            self.add_event(left_prev, left, right);
        }
        if let Some(right_next) = self.beachline.arc(right).next {
            self.add_event(left, right, right_next);
        }
        Ok(())
    }

    /// Appends a top-row site to the right of `last`, the rightmost arc.
    fn insert_beside(&mut self, last: ArcId, site: usize, point: Point2) -> Result<()> {
        let arc = self.beachline.create_arc(site, point);
        self.beachline.insert_after(last, arc);
        let (left_half_edge, right_half_edge) = self.add_edge(last, arc)?;
        self.upward_rays.push(UpwardRay {
            left_site: self.beachline.arc(last).site,
            right_site: site,
            left_half_edge,
            right_half_edge,
        });
        trace!(site, "site on the top row");
        Ok(())
    }

    /// Replaces `arc` by three arcs and returns the middle one, which belongs
    /// to `site`. The outer copies keep `arc`'s outer half-edges.
    fn break_arc(&mut self, arc: ArcId, site: usize, point: Point2) -> ArcId {
        let old = self.beachline.arc(arc).clone();
        let middle = self.beachline.create_arc(site, point);
        let left = self.beachline.create_arc(old.site, old.point);
        self.beachline.arc_mut(left).left_half_edge = old.left_half_edge;
        let right = self.beachline.create_arc(old.site, old.point);
        self.beachline.arc_mut(right).right_half_edge = old.right_half_edge;

        self.beachline.replace(arc, middle);
        self.beachline.insert_before(middle, left);
        self.beachline.insert_after(middle, right);
        middle
    }

    /// Removes the collapsed `arc` whose breakpoints met at `vertex`.
    fn remove_arc(&mut self, arc: ArcId, vertex: VertexId) -> Result<()> {
        let left = self.prev_of(arc)?;
        let right = self.next_of(arc)?;
        // End the edges on both sides of the arc
        self.set_destination(left, arc, vertex)?;
        self.set_destination(arc, right, vertex)?;
        let arc_left = self.left_half_edge(arc)?;
        let arc_right = self.right_half_edge(arc)?;
        self.diagram.link(arc_left, arc_right)?;

        self.beachline.remove(arc);

        // Start the edge between the new neighbours
        let prev_half_edge = self.right_half_edge(left)?;
        let next_half_edge = self.left_half_edge(right)?;
        self.add_edge(left, right)?;
        self.set_origin(left, right, vertex)?;
        let new_left = self.right_half_edge(left)?;
        let new_right = self.left_half_edge(right)?;
        self.diagram.link(new_left, prev_half_edge)?;
        self.diagram.link(next_half_edge, new_right)?;
        Ok(())
    }

    /// Registers the circle event that would remove `middle`, if its
    /// breakpoints converge below the sweep line.
    ///
    /// The breakpoints converge exactly when the three foci turn clockwise.
    /// A site dropped onto a breakpoint leaves an arc of zero width whose
    /// event lies on the sweep line. It is queued there and fires after the
    /// site events at that height.
    fn add_event(&mut self, left: ArcId, middle: ArcId, right: ArcId) {
        let p1 = self.beachline.arc(left).point;
        let p2 = self.beachline.arc(middle).point;
        let p3 = self.beachline.arc(right).point;
        let Some(circle) = circumcircle(&p1, &p2, &p3) else {
            trace!(?p1, ?p2, ?p3, "collinear triple, no circle event");
            return;
        };
        if !turns_clockwise(&p1, &p2, &p3) {
            return;
        }
        let y = circle.bottom_y();
        // Co-circular sites land on the sweep line up to rounding.
        if y > self.sweep_y + TOLERANCE {
            return;
        }
        let y = y.min(self.sweep_y);
        let id = self.events.push(Event::circle(y, circle.center, middle));
        self.beachline.arc_mut(middle).event = Some(id);
    }

    /// Cancels the pending circle event of `arc`, if any.
    fn delete_event(&mut self, arc: ArcId) {
        if let Some(event) = self.beachline.arc_mut(arc).event.take() {
            self.events.remove(event);
            trace!("cancelled circle event");
        }
    }

    /// Creates the edge traced by the breakpoint between `left` and `right`.
    fn add_edge(&mut self, left: ArcId, right: ArcId) -> Result<(HalfEdgeId, HalfEdgeId)> {
        let left_face = self.diagram.site(self.beachline.arc(left).site)?.face;
        let right_face = self.diagram.site(self.beachline.arc(right).site)?.face;
        let (a, b) = self.diagram.create_edge(left_face, right_face)?;
        self.beachline.arc_mut(left).right_half_edge = Some(a);
        self.beachline.arc_mut(right).left_half_edge = Some(b);
        Ok((a, b))
    }

    /// Marks `vertex` as the point where the breakpoint `left | right` was
    /// born.
    fn set_origin(&mut self, left: ArcId, right: ArcId, vertex: VertexId) -> Result<()> {
        let left_half_edge = self.right_half_edge(left)?;
        let right_half_edge = self.left_half_edge(right)?;
        self.diagram.half_edge_mut(left_half_edge)?.destination = Some(vertex);
        self.diagram.half_edge_mut(right_half_edge)?.origin = Some(vertex);
        Ok(())
    }

    /// Marks `vertex` as the point where the breakpoint `left | right` died.
    fn set_destination(&mut self, left: ArcId, right: ArcId, vertex: VertexId) -> Result<()> {
        let left_half_edge = self.right_half_edge(left)?;
        let right_half_edge = self.left_half_edge(right)?;
        self.diagram.half_edge_mut(left_half_edge)?.origin = Some(vertex);
        self.diagram.half_edge_mut(right_half_edge)?.destination = Some(vertex);
        Ok(())
    }

    fn left_half_edge(&self, arc: ArcId) -> Result<HalfEdgeId> {
        self.beachline
            .arc(arc)
            .left_half_edge
            .ok_or_else(|| missing("arc without left half-edge"))
    }

    fn right_half_edge(&self, arc: ArcId) -> Result<HalfEdgeId> {
        self.beachline
            .arc(arc)
            .right_half_edge
            .ok_or_else(|| missing("arc without right half-edge"))
    }

    fn prev_of(&self, arc: ArcId) -> Result<ArcId> {
        self.beachline
            .arc(arc)
            .prev
            .ok_or_else(|| missing("arc without left neighbour"))
    }

    fn next_of(&self, arc: ArcId) -> Result<ArcId> {
        self.beachline
            .arc(arc)
            .next
            .ok_or_else(|| missing("arc without right neighbour"))
    }
}

/// `true` if `left -> middle -> right` bends clockwise, with the y axis up.
fn turns_clockwise(left: &Point2, middle: &Point2, right: &Point2) -> bool {
    det(&(left - middle), &(right - middle)) > 0.0
}

fn missing(what: &str) -> crate::error::VoronoiError {
    TopologyError::InvalidTopology(what.into()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn build(points: &[Point2]) -> Fortune {
        let mut fortune = Fortune::new(points);
        fortune.build().unwrap();
        fortune
    }

    #[test]
    fn single_site_has_no_edges() {
        let fortune = build(&[Point2::new(0.5, 0.5)]);
        let diagram = fortune.diagram();
        assert_eq!(diagram.face_count(), 1);
        assert_eq!(diagram.half_edge_count(), 0);
        assert_eq!(diagram.vertex_count(), 0);
        assert_eq!(fortune.beachline.iter().count(), 1);
    }

    #[test]
    fn empty_input_is_trivial() {
        let fortune = build(&[]);
        assert_eq!(fortune.diagram().face_count(), 0);
        assert!(fortune.beachline.is_empty());
    }

    #[test]
    fn two_sites_share_one_edge() {
        let fortune = build(&[Point2::new(0.25, 0.5), Point2::new(0.75, 0.5)]);
        let diagram = fortune.diagram();
        assert_eq!(diagram.half_edge_count(), 2);
        assert_eq!(diagram.edge_count(), 1);
        assert_eq!(diagram.vertex_count(), 0);
        assert_eq!(fortune.upward_rays.len(), 1);
        let sites: Vec<_> = fortune
            .beachline
            .iter()
            .map(|id| fortune.beachline.arc(id).site)
            .collect();
        assert_eq!(sites, vec![0, 1]);
    }

    #[test]
    fn stacked_sites_split_the_upper_arc() {
        let fortune = build(&[Point2::new(0.5, 0.75), Point2::new(0.5, 0.25)]);
        let sites: Vec<_> = fortune
            .beachline
            .iter()
            .map(|id| fortune.beachline.arc(id).site)
            .collect();
        assert_eq!(sites, vec![0, 1, 0]);
        assert_eq!(fortune.diagram().edge_count(), 1);
        assert!(fortune.upward_rays.is_empty());
    }

    #[test]
    fn triangle_has_one_vertex_at_circumcenter() {
        let fortune = build(&[
            Point2::new(0.2, 0.2),
            Point2::new(0.8, 0.2),
            Point2::new(0.5, 0.8),
        ]);
        let diagram = fortune.diagram();
        assert_eq!(diagram.vertex_count(), 1);
        let (_, vertex) = diagram.vertices().next().unwrap();
        assert_relative_eq!(vertex.point.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(vertex.point.y, 0.425, epsilon = 1e-12);
        // Three edges, each still open at its far end.
        assert_eq!(diagram.edge_count(), 3);
        let open_ends = diagram
            .half_edges()
            .filter(|(_, he)| he.origin.is_none() || he.destination.is_none())
            .count();
        assert_eq!(open_ends, 6);
    }

    #[test]
    fn collinear_sites_fire_no_circle_event() {
        let fortune = build(&[
            Point2::new(0.5, 0.9),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, 0.1),
        ]);
        let diagram = fortune.diagram();
        assert_eq!(diagram.vertex_count(), 0);
        assert_eq!(diagram.edge_count(), 2);
        assert!(fortune.events.is_empty());
    }

    #[test]
    fn square_produces_center_vertices() {
        // Four co-circular sites meet in one point, reported as two
        // coincident vertices joined by a zero-length edge.
        let fortune = build(&[
            Point2::new(0.25, 0.25),
            Point2::new(0.75, 0.25),
            Point2::new(0.75, 0.75),
            Point2::new(0.25, 0.75),
        ]);
        assert_eq!(fortune.diagram().vertex_count(), 2);
        for (_, vertex) in fortune.diagram().vertices() {
            assert_relative_eq!(vertex.point.x, 0.5, epsilon = 1e-9);
            assert_relative_eq!(vertex.point.y, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn site_below_a_breakpoint_closes_it() {
        // Each outer site of the lower rows lies exactly under the point
        // where two arcs meet, at the bottom of their circle.
        let mut points: Vec<Point2> = (0..6)
            .map(|i| {
                let angle = f64::from(i) * std::f64::consts::FRAC_PI_3;
                Point2::new(0.5 + 0.3 * angle.cos(), 0.5 + 0.3 * angle.sin())
            })
            .collect();
        points.push(Point2::new(0.5, 0.5));
        let fortune = build(&points);
        let diagram = fortune.diagram();
        assert_eq!(diagram.vertex_count(), 6);
        let radius = 0.3 / 3f64.sqrt();
        for (_, vertex) in diagram.vertices() {
            assert_relative_eq!((vertex.point - points[6]).norm(), radius, epsilon = 1e-9);
        }
        // Every site keeps an arc that reaches the end of the sweep or was
        // closed by a vertex.
        assert_eq!(diagram.edge_count(), 12);
    }

    #[test]
    fn nearly_level_top_row_is_swept_as_one_row() {
        let fortune = build(&[
            Point2::new(0.2, 0.9),
            Point2::new(0.8, 0.9),
            Point2::new(0.5, 0.9 - 1e-12),
            Point2::new(0.5, 0.1),
        ]);
        assert_eq!(fortune.upward_rays.len(), 2);
        let ray_sites: Vec<_> = fortune
            .upward_rays
            .iter()
            .map(|ray| (ray.left_site, ray.right_site))
            .collect();
        assert_eq!(ray_sites, vec![(0, 2), (2, 1)]);
        assert_eq!(fortune.diagram().vertex_count(), 2);
    }

    #[test]
    fn resolved_half_edges_agree_with_their_twins() {
        let fortune = build(&[
            Point2::new(0.1, 0.3),
            Point2::new(0.4, 0.9),
            Point2::new(0.7, 0.2),
            Point2::new(0.9, 0.6),
            Point2::new(0.5, 0.5),
        ]);
        let diagram = fortune.diagram();
        for (id, he) in diagram.half_edges() {
            let twin = diagram.half_edge(he.twin.unwrap()).unwrap();
            assert_eq!(twin.twin, Some(id));
            if he.origin.is_some() {
                assert_eq!(he.origin, twin.destination);
            }
            if let Some(next) = he.next {
                assert_eq!(diagram.half_edge(next).unwrap().prev, Some(id));
            }
        }
    }
}
