//! Half-edge adjacency for an indexed triangle mesh.
//!
//! Directed edges are implicit (`3 * face + corner`, see [`DirectedEdgeId`]),
//! so the topology only stores two arrays:
//!
//! - `first_directed_edge[v]`: one outgoing edge per vertex, the first one
//!   found in ascending edge order, or none for isolated vertices
//! - `other_half[e]`: the opposite edge of the neighbouring face, or none on
//!   the boundary
//!
//! # Manifold Handling
//!
//! Edges are bucketed by their unordered vertex pair. Inside a bucket each
//! unpaired edge is matched with the first later unpaired edge running the
//! other way. Buckets that hold more than two edges, or two edges with the
//! same direction, leave edges unpaired instead of failing; they are recorded
//! and can be turned into an error with [`HalfEdgeTopology::require_manifold`].

use std::collections::HashMap;

use super::index::{DirectedEdgeId, MeshIndex, VertexId};
use super::store::TriangleMesh;
use crate::error::{MeshError, Result};

/// Twin and first-outgoing-edge tables for a [`TriangleMesh`].
///
/// The topology keeps its own copy of the face-vertex list, so it stays
/// consistent with the connectivity it was built from.
#[derive(Debug, Clone)]
pub struct HalfEdgeTopology<I: MeshIndex = u32> {
    face_vertices: Vec<VertexId<I>>,
    first_directed_edge: Vec<DirectedEdgeId<I>>,
    other_half: Vec<DirectedEdgeId<I>>,
    non_manifold: Vec<(usize, usize)>,
}

impl<I: MeshIndex> HalfEdgeTopology<I> {
    /// Build the adjacency tables of a mesh.
    ///
    /// Runs in expected linear time in the number of directed edges. Never
    /// fails: non-manifold edges are left unpaired and reported through
    /// [`Self::non_manifold_edges`].
    ///
    /// # Example
    ///
    /// ```
    /// use meshfold::prelude::*;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
    /// let topology = HalfEdgeTopology::build(&mesh);
    ///
    /// // The diagonal 0-2 is shared by both triangles.
    /// assert_eq!(topology.twin(DirectedEdgeId::new(0)), Some(DirectedEdgeId::new(4)));
    /// assert_eq!(topology.boundary_edges().count(), 4);
    /// ```
    pub fn build(mesh: &TriangleMesh<I>) -> Self {
        let num_edges = mesh.num_directed_edges();
        let mut first_directed_edge = vec![DirectedEdgeId::invalid(); mesh.num_vertices()];
        let mut other_half = vec![DirectedEdgeId::invalid(); num_edges];

        // Edges sharing an unordered vertex pair, in ascending edge order
        let mut buckets: HashMap<(usize, usize), Vec<DirectedEdgeId<I>>> =
            HashMap::with_capacity(num_edges / 2 + 1);

        for e in mesh.directed_edge_ids() {
            let from = mesh.edge_origin(e).index();
            let to = mesh.edge_dest(e).index();

            if !first_directed_edge[from].is_valid() {
                first_directed_edge[from] = e;
            }

            let key = if from <= to { (from, to) } else { (to, from) };
            buckets.entry(key).or_default().push(e);
        }

        let mut non_manifold = Vec::new();
        for (&key, edges) in &buckets {
            for (i, &e) in edges.iter().enumerate() {
                if other_half[e.index()].is_valid() {
                    continue;
                }
                let from = mesh.edge_origin(e);
                let to = mesh.edge_dest(e);

                let twin = edges[i + 1..].iter().copied().find(|&f| {
                    !other_half[f.index()].is_valid()
                        && mesh.edge_origin(f) == to
                        && mesh.edge_dest(f) == from
                });
                if let Some(f) = twin {
                    other_half[e.index()] = f;
                    other_half[f.index()] = e;
                }
            }

            let unpaired_pair = edges.len() == 2 && !other_half[edges[0].index()].is_valid();
            if edges.len() > 2 || unpaired_pair {
                non_manifold.push(key);
            }
        }
        non_manifold.sort_unstable();

        if !non_manifold.is_empty() {
            log::warn!(
                "{} non-manifold edges found, first at ({}, {})",
                non_manifold.len(),
                non_manifold[0].0,
                non_manifold[0].1
            );
        }

        Self {
            face_vertices: mesh.face_vertices().to_vec(),
            first_directed_edge,
            other_half,
            non_manifold,
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices the topology was built for.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.first_directed_edge.len()
    }

    /// Number of directed edges.
    #[inline]
    pub fn num_directed_edges(&self) -> usize {
        self.other_half.len()
    }

    /// The raw twin table; the sentinel marks boundary edges.
    pub fn other_half(&self) -> &[DirectedEdgeId<I>] {
        &self.other_half
    }

    /// The raw first-outgoing-edge table; the sentinel marks isolated vertices.
    pub fn first_directed_edges(&self) -> &[DirectedEdgeId<I>] {
        &self.first_directed_edge
    }

    /// Unordered vertex pairs whose edges could not be paired cleanly.
    pub fn non_manifold_edges(&self) -> &[(usize, usize)] {
        &self.non_manifold
    }

    /// Fail with [`MeshError::NonManifoldEdge`] if any edge was left unpaired
    /// because of non-manifold connectivity.
    pub fn require_manifold(&self) -> Result<()> {
        match self.non_manifold.first() {
            Some(&(v0, v1)) => Err(MeshError::NonManifoldEdge { v0, v1 }),
            None => Ok(()),
        }
    }

    // ==================== Topology Queries ====================

    /// The vertex an edge leaves from.
    #[inline]
    pub fn origin(&self, e: DirectedEdgeId<I>) -> VertexId<I> {
        self.face_vertices[e.prev().index()]
    }

    /// The vertex an edge arrives at.
    #[inline]
    pub fn dest(&self, e: DirectedEdgeId<I>) -> VertexId<I> {
        self.face_vertices[e.index()]
    }

    /// The opposite edge in the neighbouring face, if any.
    #[inline]
    pub fn twin(&self, e: DirectedEdgeId<I>) -> Option<DirectedEdgeId<I>> {
        self.other_half[e.index()].valid()
    }

    /// Check if an edge has no twin.
    #[inline]
    pub fn is_boundary_edge(&self, e: DirectedEdgeId<I>) -> bool {
        !self.other_half[e.index()].is_valid()
    }

    /// One outgoing edge of a vertex, or `None` if no face uses it.
    #[inline]
    pub fn first_directed_edge(&self, v: VertexId<I>) -> Option<DirectedEdgeId<I>> {
        self.first_directed_edge[v.index()].valid()
    }

    /// Check if a vertex belongs to no face.
    #[inline]
    pub fn is_isolated(&self, v: VertexId<I>) -> bool {
        !self.first_directed_edge[v.index()].is_valid()
    }

    /// Iterate over all edges without a twin, in ascending order.
    pub fn boundary_edges(&self) -> impl Iterator<Item = DirectedEdgeId<I>> + '_ {
        self.other_half
            .iter()
            .enumerate()
            .filter(|(_, twin)| !twin.is_valid())
            .map(|(i, _)| DirectedEdgeId::new(i))
    }

    /// Iterate over the outgoing edges of a vertex.
    ///
    /// Starts at the vertex's first directed edge and rotates with
    /// `next(twin(e))`. The walk ends when it returns to the start or reaches
    /// an edge without a twin, so it visits the whole fan only for interior
    /// vertices.
    pub fn outgoing(&self, v: VertexId<I>) -> OutgoingEdgeIter<'_, I> {
        OutgoingEdgeIter::new(self, v)
    }

    /// Iterate over the vertices reached by [`Self::outgoing`].
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.outgoing(v).map(move |e| self.dest(e))
    }

    /// Number of edges visited by [`Self::outgoing`].
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.outgoing(v).count()
    }

    // ==================== Validation ====================

    /// Check that the twin table is a symmetric involution of reversed edges.
    pub fn is_valid(&self) -> bool {
        self.other_half.iter().enumerate().all(|(i, &twin)| {
            if !twin.is_valid() {
                return true;
            }
            let e = DirectedEdgeId::new(i);
            self.other_half[twin.index()] == e
                && self.origin(twin) == self.dest(e)
                && self.dest(twin) == self.origin(e)
        })
    }

    /// Assemble a topology from a raw twin table, without any checks.
    #[cfg(test)]
    pub(crate) fn from_twin_table(
        face_vertices: Vec<VertexId<I>>,
        num_vertices: usize,
        other_half: Vec<DirectedEdgeId<I>>,
    ) -> Self {
        let mut first_directed_edge = vec![DirectedEdgeId::invalid(); num_vertices];
        for i in 0..face_vertices.len() {
            let e = DirectedEdgeId::new(i);
            let from = face_vertices[e.prev().index()].index();
            if !first_directed_edge[from].is_valid() {
                first_directed_edge[from] = e;
            }
        }
        Self {
            face_vertices,
            first_directed_edge,
            other_half,
            non_manifold: Vec::new(),
        }
    }
}

/// Iterator over the outgoing edges of a vertex.
pub struct OutgoingEdgeIter<'a, I: MeshIndex = u32> {
    topology: &'a HalfEdgeTopology<I>,
    start: DirectedEdgeId<I>,
    current: DirectedEdgeId<I>,
    // Bounds the walk on connectivity that never closes
    remaining: usize,
}

impl<'a, I: MeshIndex> OutgoingEdgeIter<'a, I> {
    fn new(topology: &'a HalfEdgeTopology<I>, v: VertexId<I>) -> Self {
        let start = topology.first_directed_edge[v.index()];
        Self {
            topology,
            start,
            current: start,
            remaining: if start.is_valid() {
                topology.num_directed_edges()
            } else {
                0
            },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for OutgoingEdgeIter<'a, I> {
    type Item = DirectedEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;

        // twin(e) arrives at the vertex; the edge after it in its face leaves it again.
        match self.topology.twin(self.current) {
            Some(twin) => {
                self.current = twin.next();
                if self.current == self.start {
                    self.remaining = 0;
                }
            }
            None => self.remaining = 0,
        }

        Some(result)
    }
}
