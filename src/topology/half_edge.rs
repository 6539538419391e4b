use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in a diagram.
    pub struct HalfEdgeId;
}

/// One directed side of a diagram edge.
///
/// The incident face lies to the left of the half-edge. End points stay
/// `None` while the sweep has not reached them yet. Half-edges running along
/// a clipping box have no twin.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    pub origin: Option<VertexId>,
    pub destination: Option<VertexId>,
    pub twin: Option<HalfEdgeId>,
    /// The face this half-edge bounds.
    pub face: FaceId,
    pub prev: Option<HalfEdgeId>,
    pub next: Option<HalfEdgeId>,
}

impl HalfEdgeData {
    /// Creates an unlinked half-edge on `face`.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self {
            origin: None,
            destination: None,
            twin: None,
            face,
            prev: None,
            next: None,
        }
    }
}
