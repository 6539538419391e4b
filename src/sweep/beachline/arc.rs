use crate::math::Point2;
use crate::sweep::event_queue::EventId;
use crate::topology::HalfEdgeId;

slotmap::new_key_type! {
    /// Unique identifier for an arc on the beachline.
    pub struct ArcId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// One parabolic arc of the beachline.
///
/// `left_half_edge` and `right_half_edge` are the half-edges traced by the
/// breakpoints on either side of the arc, both bounding the arc's face.
/// `event` is the pending circle event that would remove this arc.
#[derive(Debug, Clone)]
pub struct ArcData {
    /// Index of the site whose parabola this arc belongs to.
    pub site: usize,
    /// Focus of the parabola (the site's point).
    pub point: Point2,
    pub left_half_edge: Option<HalfEdgeId>,
    pub right_half_edge: Option<HalfEdgeId>,
    pub event: Option<EventId>,
    /// Neighbour on the left along the beachline.
    pub prev: Option<ArcId>,
    /// Neighbour on the right along the beachline.
    pub next: Option<ArcId>,
    pub(super) parent: Option<ArcId>,
    pub(super) left: Option<ArcId>,
    pub(super) right: Option<ArcId>,
    pub(super) color: Color,
}

impl ArcData {
    pub(super) fn new(site: usize, point: Point2) -> Self {
        Self {
            site,
            point,
            left_half_edge: None,
            right_half_edge: None,
            event: None,
            prev: None,
            next: None,
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
        }
    }
}
