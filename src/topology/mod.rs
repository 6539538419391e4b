pub mod face;
pub mod half_edge;
pub mod site;
pub mod vertex;

pub use face::{FaceData, FaceId};
pub use half_edge::{HalfEdgeData, HalfEdgeId};
pub use site::Site;
pub use vertex::{VertexData, VertexId};

use crate::error::{Result, TopologyError};
use crate::geometry::{BoundingBox, Side};
use crate::math::Point2;
use slotmap::SlotMap;

/// Doubly-connected edge list of a Voronoi diagram.
///
/// Owns the sites, their faces, and every vertex and half-edge. Entities
/// reference each other via typed IDs (generational indices), so removing a
/// vertex or half-edge never leaves a dangling reference that could alias a
/// live entity.
#[derive(Debug, Default)]
pub struct Diagram {
    sites: Vec<Site>,
    faces: SlotMap<FaceId, FaceData>,
    vertices: SlotMap<VertexId, VertexData>,
    half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
}

impl Diagram {
    /// Creates a diagram with one site and one empty face per input point.
    #[must_use]
    pub fn new(points: &[Point2]) -> Self {
        let mut faces = SlotMap::with_capacity_and_key(points.len());
        let sites = points
            .iter()
            .enumerate()
            .map(|(index, &point)| Site {
                index,
                point,
                face: faces.insert(FaceData::new(index)),
            })
            .collect();
        Self {
            sites,
            faces,
            vertices: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
        }
    }

    // --- Sites and faces ---

    /// All sites, in input order.
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Returns the site with the given input index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn site(&self, index: usize) -> Result<&Site, TopologyError> {
        self.sites
            .get(index)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("site {index}")))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Iterates over the faces in site order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> + '_ {
        self.sites
            .iter()
            .filter_map(|site| self.faces.get(site.face).map(|face| (site.face, face)))
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Vertex operations ---

    /// Inserts a vertex at `point` and returns its ID.
    pub fn create_vertex(&mut self, point: Point2) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Inserts a vertex at the corner where `side` of `bbox` starts.
    pub fn create_corner(&mut self, bbox: &BoundingBox, side: Side) -> VertexId {
        self.create_vertex(bbox.corner(side))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Removes a vertex, returning its data if it was still present.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<VertexData> {
        self.vertices.remove(id)
    }

    /// Iterates over all live vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> + '_ {
        self.vertices.iter()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Half-edge operations ---

    /// Inserts an unlinked half-edge bounding `face`.
    ///
    /// The first half-edge created for a face becomes its boundary handle.
    ///
    /// # Errors
    ///
    /// Returns an error if `face` is not part of the diagram.
    pub fn create_half_edge(&mut self, face: FaceId) -> Result<HalfEdgeId, TopologyError> {
        let face_data = self
            .faces
            .get_mut(face)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))?;
        let id = self.half_edges.insert(HalfEdgeData::new(face));
        if face_data.boundary.is_none() {
            face_data.boundary = Some(id);
        }
        Ok(id)
    }

    /// Creates the two twin half-edges of a new edge separating `left` and
    /// `right`, returning them in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if either face is not part of the diagram.
    pub fn create_edge(
        &mut self,
        left: FaceId,
        right: FaceId,
    ) -> Result<(HalfEdgeId, HalfEdgeId), TopologyError> {
        let a = self.create_half_edge(left)?;
        let b = self.create_half_edge(right)?;
        self.half_edge_mut(a)?.twin = Some(b);
        self.half_edge_mut(b)?.twin = Some(a);
        Ok((a, b))
    }

    /// Returns a reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData, TopologyError> {
        self.half_edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()))
    }

    /// Returns a mutable reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the diagram.
    pub fn half_edge_mut(&mut self, id: HalfEdgeId) -> Result<&mut HalfEdgeData, TopologyError> {
        self.half_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()))
    }

    /// Removes a half-edge, returning its data if it was still present.
    pub fn remove_half_edge(&mut self, id: HalfEdgeId) -> Option<HalfEdgeData> {
        self.half_edges.remove(id)
    }

    /// Iterates over all live half-edges.
    pub fn half_edges(&self) -> impl Iterator<Item = (HalfEdgeId, &HalfEdgeData)> + '_ {
        self.half_edges.iter()
    }

    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Number of edges, counting a twin pair once and a twinless half-edge
    /// as a whole edge.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.half_edges
            .iter()
            .filter(|(id, he)| {
                he.twin
                    .is_none_or(|twin| *id < twin || !self.half_edges.contains_key(twin))
            })
            .count()
    }

    /// Makes `next` follow `prev` along their face boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if either half-edge is not part of the diagram.
    pub fn link(&mut self, prev: HalfEdgeId, next: HalfEdgeId) -> Result<(), TopologyError> {
        self.half_edge_mut(prev)?.next = Some(next);
        self.half_edge_mut(next)?.prev = Some(prev);
        Ok(())
    }

    /// Gives `face` the whole rectangle of `bbox` as boundary, replacing the
    /// boundary handle it had.
    ///
    /// The four border half-edges have no twin.
    ///
    /// # Errors
    ///
    /// Returns an error if `face` is not part of the diagram.
    pub fn enclose_in_box(&mut self, face: FaceId, bbox: &BoundingBox) -> Result<(), TopologyError> {
        let corners = Side::ALL.map(|side| self.create_corner(bbox, side));
        let mut edges = Vec::with_capacity(corners.len());
        for (i, &origin) in corners.iter().enumerate() {
            let id = self.create_half_edge(face)?;
            let half_edge = self.half_edge_mut(id)?;
            half_edge.origin = Some(origin);
            half_edge.destination = Some(corners[(i + 1) % corners.len()]);
            edges.push(id);
        }
        for (i, &id) in edges.iter().enumerate() {
            self.link(id, edges[(i + 1) % edges.len()])?;
        }
        self.face_mut(face)?.boundary = edges.first().copied();
        Ok(())
    }

    // --- Boundary walking ---

    /// Collects the boundary cycle of `face`, starting at its boundary handle.
    ///
    /// Returns an empty list for a face without boundary.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::CycleNotClosed` if the `next` chain breaks off or
    /// does not come back to its start.
    pub fn face_cycle(&self, face: FaceId) -> Result<Vec<HalfEdgeId>> {
        let face_data = self.face(face)?;
        let Some(start) = face_data.boundary else {
            return Ok(Vec::new());
        };
        let limit = self.half_edges.len();
        let not_closed = || TopologyError::CycleNotClosed {
            site: face_data.site,
            steps: limit,
        };

        let mut cycle = Vec::new();
        let mut current = start;
        loop {
            cycle.push(current);
            if cycle.len() > limit {
                return Err(not_closed().into());
            }
            current = self.half_edge(current)?.next.ok_or_else(not_closed)?;
            if current == start {
                return Ok(cycle);
            }
        }
    }

    /// Positions of the boundary vertices of `face`, in cycle order.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is not a closed cycle or a half-edge
    /// has no origin yet.
    pub fn face_polygon(&self, face: FaceId) -> Result<Vec<Point2>> {
        self.face_cycle(face)?
            .into_iter()
            .map(|id| -> Result<Point2> {
                let origin = self.half_edge(id)?.origin.ok_or_else(|| {
                    TopologyError::InvalidTopology("half-edge without origin".into())
                })?;
                Ok(self.vertex(origin)?.point)
            })
            .collect()
    }
}
