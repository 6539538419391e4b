use crate::error::{Result, TopologyError};
use crate::geometry::BoundingBox;
use crate::topology::Diagram;

/// Validates the half-edge structure of a closed diagram.
///
/// Checks that
/// - every half-edge has both ends, and its twin (if any) runs the other way
///   and points back,
/// - `next`/`prev` links agree, chain end to start and stay on one face,
/// - the face cycles use every half-edge exactly once,
/// - `V - E + F == 2`, counting the outer face,
/// - optionally, every vertex lies within a box.
#[derive(Debug, Default)]
pub struct IsValid {
    bounds: Option<BoundingBox>,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also requires every vertex to lie in `bbox`.
    #[must_use]
    pub fn with_bounds(mut self, bbox: BoundingBox) -> Self {
        self.bounds = Some(bbox);
        self
    }

    /// Executes the validation, returning `true` if the diagram is valid.
    #[must_use]
    pub fn execute(&self, diagram: &Diagram) -> bool {
        self.check(diagram).is_ok()
    }

    /// Executes the validation, reporting the first violation found.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` describing the violation.
    pub fn check(&self, diagram: &Diagram) -> Result<()> {
        check_half_edges(diagram)?;
        let bounded_faces = check_cycles(diagram)?;

        if let Some(bbox) = &self.bounds {
            if let Some((_, vertex)) = diagram.vertices().find(|(_, v)| !bbox.contains(&v.point)) {
                return Err(invalid(format!("vertex {:?} lies outside the box", vertex.point)));
            }
        }

        if diagram.half_edge_count() > 0 {
            let (v, e, f) = (diagram.vertex_count(), diagram.edge_count(), bounded_faces + 1);
            if v + f != e + 2 {
                return Err(invalid(format!("V - E + F = {v} - {e} + {f}, expected 2")));
            }
        }
        Ok(())
    }
}

fn check_half_edges(diagram: &Diagram) -> Result<()> {
    for (id, he) in diagram.half_edges() {
        let (Some(origin), Some(destination)) = (he.origin, he.destination) else {
            return Err(invalid("half-edge with an open end".into()));
        };
        diagram.vertex(origin)?;
        diagram.vertex(destination)?;

        if let Some(twin_id) = he.twin {
            let twin = diagram.half_edge(twin_id)?;
            if twin.twin != Some(id) {
                return Err(invalid("twin does not point back".into()));
            }
            if twin.origin != Some(destination) || twin.destination != Some(origin) {
                return Err(invalid("twin does not run the opposite way".into()));
            }
        }

        let next_id = he
            .next
            .ok_or_else(|| TopologyError::InvalidTopology("half-edge without next".into()))?;
        let next = diagram.half_edge(next_id)?;
        if next.prev != Some(id) || next.face != he.face || next.origin != Some(destination) {
            return Err(invalid("next half-edge does not continue the boundary".into()));
        }
        let prev_id = he
            .prev
            .ok_or_else(|| TopologyError::InvalidTopology("half-edge without prev".into()))?;
        if diagram.half_edge(prev_id)?.next != Some(id) {
            return Err(invalid("prev half-edge does not lead here".into()));
        }
    }
    Ok(())
}

/// Walks every face boundary; returns the number of faces that have one.
fn check_cycles(diagram: &Diagram) -> Result<usize> {
    let mut bounded_faces = 0;
    let mut walked = 0;
    for (face_id, _) in diagram.faces() {
        let cycle = diagram.face_cycle(face_id)?;
        if cycle.is_empty() {
            continue;
        }
        for &id in &cycle {
            if diagram.half_edge(id)?.face != face_id {
                return Err(invalid("half-edge on the cycle of another face".into()));
            }
        }
        bounded_faces += 1;
        walked += cycle.len();
    }
    if walked != diagram.half_edge_count() {
        return Err(invalid(format!(
            "{walked} half-edges on face cycles, {} in the diagram",
            diagram.half_edge_count()
        )));
    }
    Ok(bounded_faces)
}

fn invalid(message: String) -> crate::error::VoronoiError {
    TopologyError::InvalidTopology(message).into()
}
