use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Result, TopologyError};
use crate::geometry::{BoundingBox, Intersection, Side};
use crate::math::{Point2, TOLERANCE};
use crate::operations::query::NearestSite;
use crate::topology::{Diagram, FaceId, HalfEdgeId, VertexId};

/// Clips a bounded diagram to an exact rectangle.
///
/// Every face is walked once. Half-edges entirely outside are dropped, crossing
/// half-edges are cut where they meet the border, and the cut ends of a face
/// are joined by new half-edges running along the border, with a corner vertex
/// wherever the border turns. The cut point of an edge is shared by its two
/// halves.
///
/// The diagram must already be closed, e.g. by [`crate::sweep::Fortune::bound`]
/// with a box that contains this one.
pub struct ClipDiagram {
    bbox: BoundingBox,
}

/// Bookkeeping shared by all faces of one clipping pass.
#[derive(Default)]
struct ClipState {
    processed: HashSet<HalfEdgeId>,
    outside: HashSet<VertexId>,
    failures: usize,
}

/// Cut points of the face being walked.
#[derive(Default)]
struct FaceWalk {
    /// First half-edge entering the box, with the side it enters through.
    incoming: Option<(HalfEdgeId, Side)>,
    /// Last exit not yet joined to an entry.
    outgoing: Option<(HalfEdgeId, Side)>,
    /// Entry through a border vertex, waiting for the half-edge leaving it.
    entry: Option<Side>,
    /// Last half-edge kept inside the box.
    previous: Option<HalfEdgeId>,
}

/// Ends of a half-edge whose twin was already cut.
struct TwinEnds {
    origin: VertexId,
    destination: VertexId,
}

impl ClipDiagram {
    #[must_use]
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }

    /// Clips `diagram` in place.
    ///
    /// A face that lies completely outside the box loses its boundary, except
    /// for the face of the site nearest to the box centre, whose cell then
    /// covers the whole box and becomes the full rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is invalid, if a face boundary is not a
    /// closed cycle, or if some half-edges crossed the border an unexpected
    /// number of times. In the last case every face was still processed.
    pub fn execute(&self, diagram: &mut Diagram) -> Result<()> {
        self.bbox.validate()?;
        let faces: Vec<FaceId> = diagram.faces().map(|(id, _)| id).collect();
        let mut state = ClipState::default();
        for face in faces {
            self.clip_face(diagram, face, &mut state)?;
        }
        for vertex in state.outside {
            diagram.remove_vertex(vertex);
        }

        if state.failures > 0 {
            warn!(
                count = state.failures,
                "half-edges crossed the clipping box an unexpected number of times"
            );
            return Err(TopologyError::UnexpectedIntersections {
                count: state.failures,
            }
            .into());
        }
        debug!(
            bbox = ?self.bbox,
            vertices = diagram.vertex_count(),
            edges = diagram.edge_count(),
            "clipped diagram"
        );
        Ok(())
    }

    fn clip_face(&self, diagram: &mut Diagram, face: FaceId, state: &mut ClipState) -> Result<()> {
        let mut cycle = diagram.face_cycle(face)?;
        // Walk from a vertex outside the box; a face without one is kept as is.
        let mut start = None;
        for (i, &id) in cycle.iter().enumerate() {
            if !self.bbox.contains(&origin_point(diagram, id)?) {
                start = Some(i);
                break;
            }
        }
        let Some(start) = start else {
            return Ok(());
        };
        cycle.rotate_left(start);

        let mut walk = FaceWalk::default();
        let mut inside = false;
        for id in cycle {
            let half_edge = diagram.half_edge(id)?;
            let (origin, destination) = ends(half_edge.origin, half_edge.destination)?;
            let twin = half_edge.twin;
            let origin_point = diagram.vertex(origin)?.point;
            let destination_point = diagram.vertex(destination)?.point;
            let hits = self.crossings(&origin_point, &destination_point);
            let next_inside = self.bbox.contains(&destination_point);
            let twin_ends = match twin.filter(|twin| state.processed.contains(twin)) {
                Some(twin) => {
                    let twin = diagram.half_edge(twin)?;
                    let (origin, destination) = ends(twin.origin, twin.destination)?;
                    Some(TwinEnds {
                        origin,
                        destination,
                    })
                }
                None => None,
            };

            match (inside, next_inside, hits.as_slice()) {
                // Outside, or touching the border at a single point
                (false, false, [] | [_]) => {
                    state.outside.insert(origin);
                    diagram.remove_half_edge(id);
                }
                // Passes through the box
                (false, false, [enter, exit]) => {
                    state.outside.insert(origin);
                    let (new_origin, new_destination) = match twin_ends {
                        Some(twin) => (twin.destination, twin.origin),
                        None => (
                            diagram.create_vertex(enter.point),
                            diagram.create_vertex(exit.point),
                        ),
                    };
                    let data = diagram.half_edge_mut(id)?;
                    data.origin = Some(new_origin);
                    data.destination = Some(new_destination);
                    self.enter(diagram, &mut walk, id, enter.side)?;
                    walk.outgoing = Some((id, exit.side));
                    state.processed.insert(id);
                }
                // Leaves the box
                (true, false, [exit]) => {
                    if let Some(side) = walk.entry.take() {
                        self.enter(diagram, &mut walk, id, side)?;
                    }
                    let new_destination = match twin_ends {
                        Some(twin) => twin.origin,
                        None => diagram.create_vertex(exit.point),
                    };
                    diagram.half_edge_mut(id)?.destination = Some(new_destination);
                    walk.outgoing = Some((id, exit.side));
                    state.processed.insert(id);
                }
                // Leaves from a vertex on the border
                (true, false, []) => {
                    let side = self.border_side(&origin_point, false);
                    match (walk.entry.take(), walk.previous, side) {
                        // Came in through the same vertex
                        (Some(_), _, Some(_)) => {}
                        (None, Some(previous), Some(side)) => {
                            walk.outgoing = Some((previous, side));
                        }
                        _ => state.failures += 1,
                    }
                    diagram.remove_half_edge(id);
                }
                // Enters the box
                (false, true, [enter]) => {
                    state.outside.insert(origin);
                    let new_origin = match twin_ends {
                        Some(twin) => twin.destination,
                        None => diagram.create_vertex(enter.point),
                    };
                    diagram.half_edge_mut(id)?.origin = Some(new_origin);
                    self.enter(diagram, &mut walk, id, enter.side)?;
                    walk.previous = Some(id);
                    state.processed.insert(id);
                }
                // Enters at a vertex on the border; the next half-edge starts
                // the inside part
                (false, true, []) => {
                    state.outside.insert(origin);
                    diagram.remove_half_edge(id);
                    match self.border_side(&destination_point, true) {
                        Some(side) => walk.entry = Some(side),
                        None => state.failures += 1,
                    }
                }
                (true, true, _) => {
                    if let Some(side) = walk.entry.take() {
                        self.enter(diagram, &mut walk, id, side)?;
                    }
                    walk.previous = Some(id);
                }
                (_, _, hits) => {
                    debug!(
                        ?face,
                        ?origin_point,
                        ?destination_point,
                        hits = hits.len(),
                        "unexpected crossings"
                    );
                    state.failures += 1;
                }
            }
            inside = next_inside;
        }

        match walk.incoming {
            Some((first_in, in_side)) => {
                if let Some((last_out, out_side)) = walk.outgoing {
                    self.link(diagram, last_out, out_side, first_in, in_side)?;
                }
                diagram.face_mut(face)?.boundary = Some(first_in);
            }
            None => {
                diagram.face_mut(face)?.boundary = None;
                let site = diagram.face(face)?.site;
                if NearestSite::new(self.bbox.center()).execute(diagram) == Some(site) {
                    diagram.enclose_in_box(face, &self.bbox)?;
                }
            }
        }
        Ok(())
    }

    /// Records `id`, entering through `side`, and joins it to the last exit.
    fn enter(
        &self,
        diagram: &mut Diagram,
        walk: &mut FaceWalk,
        id: HalfEdgeId,
        side: Side,
    ) -> Result<()> {
        if let Some((out, out_side)) = walk.outgoing.take() {
            self.link(diagram, out, out_side, id, side)?;
        }
        walk.incoming.get_or_insert((id, side));
        Ok(())
    }

    /// Side through a cut lying on a vertex of the border. At a corner this is
    /// the side running into it when entering, and the side starting there
    /// when leaving.
    fn border_side(&self, point: &Point2, entering: bool) -> Option<Side> {
        match self.bbox.sides_at(point).as_slice() {
            [side] => Some(*side),
            [a, b] => {
                let (ending, starting) = if a.next() == *b { (*a, *b) } else { (*b, *a) };
                Some(if entering { ending } else { starting })
            }
            _ => None,
        }
    }

    /// Border crossings of a segment, with hits through a corner counted once.
    fn crossings(&self, origin: &Point2, destination: &Point2) -> Vec<Intersection> {
        let mut hits = self.bbox.intersections(origin, destination);
        hits.dedup_by(|a, b| (a.point - b.point).norm() < TOLERANCE);
        hits
    }

    /// Joins `start`, which leaves the box through `start_side`, to `end`,
    /// which enters through `end_side`, walking counter-clockwise along the
    /// border.
    fn link(
        &self,
        diagram: &mut Diagram,
        start: HalfEdgeId,
        start_side: Side,
        end: HalfEdgeId,
        end_side: Side,
    ) -> Result<()> {
        let face = diagram.half_edge(start)?.face;
        let mut current = start;
        let mut side = start_side;
        while side != end_side {
            side = side.next();
            let corner = diagram.create_corner(&self.bbox, side);
            current = append(diagram, face, current, corner)?;
        }
        let end_origin = diagram
            .half_edge(end)?
            .origin
            .ok_or_else(|| TopologyError::InvalidTopology("half-edge without origin".into()))?;
        let last = append(diagram, face, current, end_origin)?;
        diagram.link(last, end)?;
        Ok(())
    }
}

/// Creates a half-edge of `face` from the end of `prev` to `destination`,
/// following `prev`.
fn append(
    diagram: &mut Diagram,
    face: FaceId,
    prev: HalfEdgeId,
    destination: VertexId,
) -> Result<HalfEdgeId> {
    let origin = diagram.half_edge(prev)?.destination;
    let id = diagram.create_half_edge(face)?;
    let data = diagram.half_edge_mut(id)?;
    data.origin = origin;
    data.destination = Some(destination);
    diagram.link(prev, id)?;
    Ok(id)
}

fn origin_point(diagram: &Diagram, id: HalfEdgeId) -> Result<Point2> {
    let origin = diagram
        .half_edge(id)?
        .origin
        .ok_or_else(|| TopologyError::InvalidTopology("half-edge without origin".into()))?;
    Ok(diagram.vertex(origin)?.point)
}

fn ends(origin: Option<VertexId>, destination: Option<VertexId>) -> Result<(VertexId, VertexId)> {
    match (origin, destination) {
        (Some(origin), Some(destination)) => Ok((origin, destination)),
        _ => Err(TopologyError::InvalidTopology("open half-edge in a bounded diagram".into()).into()),
    }
}
