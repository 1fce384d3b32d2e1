//! Boundary loop extraction.
//!
//! A boundary edge is a directed edge without a twin. Starting from one, the
//! next boundary edge is found by rotating around the edge's destination
//! vertex through the faces that share it, until an edge leaving that vertex
//! has no twin either. Repeating this traces the loop in the same rotational
//! order as the face winding.

use super::index::{DirectedEdgeId, FaceId, MeshIndex, VertexId};
use super::topology::HalfEdgeTopology;
use crate::error::{MeshError, Result};

/// The single boundary loop of a disk-like mesh.
///
/// Holds the loop in traversal order together with dense membership tables,
/// so vertex, edge and face queries are O(1).
#[derive(Debug, Clone)]
pub struct BoundaryLoop<I: MeshIndex = u32> {
    vertices: Vec<VertexId<I>>,
    edges: Vec<DirectedEdgeId<I>>,
    vertex_lookup: Vec<bool>,
    edge_lookup: Vec<bool>,
}

impl<I: MeshIndex> BoundaryLoop<I> {
    /// Trace the boundary of a mesh.
    ///
    /// The walk starts at the lowest-numbered edge without a twin; the first
    /// recorded vertex is that edge's destination.
    ///
    /// # Errors
    ///
    /// - [`MeshError::NoBoundary`] if every edge has a twin
    /// - [`MeshError::MultipleBoundaries`] if the boundary edges form more than one loop
    /// - [`MeshError::BoundaryNotClosed`] if a walk does not return to its start
    /// - [`MeshError::BoundaryVertexRepeated`] if the loop passes a vertex twice
    pub fn extract(topology: &HalfEdgeTopology<I>) -> Result<Self> {
        let mut on_loop = vec![false; topology.num_directed_edges()];
        let mut loops: Vec<Vec<DirectedEdgeId<I>>> = Vec::new();

        for start in topology.boundary_edges() {
            if on_loop[start.index()] {
                continue;
            }
            let edges = walk_loop(topology, start)?;
            for e in &edges {
                on_loop[e.index()] = true;
            }
            loops.push(edges);
        }

        let edges = match loops.len() {
            0 => return Err(MeshError::NoBoundary),
            1 => loops.swap_remove(0),
            n => return Err(MeshError::MultipleBoundaries { loops: n }),
        };

        let mut vertex_lookup = vec![false; topology.num_vertices()];
        let mut vertices = Vec::with_capacity(edges.len());
        for &e in &edges {
            let v = topology.dest(e);
            if vertex_lookup[v.index()] {
                return Err(MeshError::BoundaryVertexRepeated { vertex: v.index() });
            }
            vertex_lookup[v.index()] = true;
            vertices.push(v);
        }

        log::debug!("boundary loop has {} vertices", vertices.len());

        Ok(Self {
            vertices,
            edges,
            vertex_lookup,
            edge_lookup: on_loop,
        })
    }

    /// Assemble a loop whose vertices and edges are already known to match.
    pub(crate) fn from_parts(
        vertices: Vec<VertexId<I>>,
        edges: Vec<DirectedEdgeId<I>>,
        num_vertices: usize,
        num_edges: usize,
    ) -> Self {
        let mut vertex_lookup = vec![false; num_vertices];
        for v in &vertices {
            vertex_lookup[v.index()] = true;
        }
        let mut edge_lookup = vec![false; num_edges];
        for e in &edges {
            edge_lookup[e.index()] = true;
        }
        Self {
            vertices,
            edges,
            vertex_lookup,
            edge_lookup,
        }
    }

    /// Boundary vertices in loop order.
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// Boundary edges in loop order; edge `i` arrives at vertex `i`.
    pub fn edges(&self) -> &[DirectedEdgeId<I>] {
        &self.edges
    }

    /// Number of vertices (and edges) on the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the loop is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of boundary edges.
    #[inline]
    pub fn num_boundary_edges(&self) -> usize {
        self.edges.len()
    }

    /// Check if a vertex lies on the loop.
    #[inline]
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_lookup.get(v.index()).copied().unwrap_or(false)
    }

    /// Check if a directed edge lies on the loop.
    #[inline]
    pub fn is_boundary_edge(&self, e: DirectedEdgeId<I>) -> bool {
        self.edge_lookup.get(e.index()).copied().unwrap_or(false)
    }

    /// Check if any of a face's edges lies on the loop.
    #[inline]
    pub fn is_boundary_face(&self, f: FaceId<I>) -> bool {
        f.edges().iter().any(|&e| self.is_boundary_edge(e))
    }
}

/// Follow boundary edges from `start` until the walk returns to it.
fn walk_loop<I: MeshIndex>(
    topology: &HalfEdgeTopology<I>,
    start: DirectedEdgeId<I>,
) -> Result<Vec<DirectedEdgeId<I>>> {
    // A closed walk on a manifold enters every directed edge at most once.
    let limit = 2 * topology.num_directed_edges();
    let not_closed = || MeshError::BoundaryNotClosed {
        start: start.index(),
    };
    let mut steps = 0usize;

    let mut edges = Vec::new();
    let mut e = start;
    loop {
        edges.push(e);

        // Rotate around dest(e) until the edge leaving it has no twin.
        let mut next = e.next();
        while let Some(twin) = topology.twin(next) {
            steps += 1;
            if steps > limit {
                return Err(not_closed());
            }
            next = twin.next();
        }
        steps += 1;
        if steps > limit {
            return Err(not_closed());
        }

        e = next;
        if e == start {
            return Ok(edges);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::TriangleMesh;

    fn unit_square() -> TriangleMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriangleMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    /// An `n` x `n` grid of quads split into triangles, counter-clockwise.
    fn grid(n: usize) -> TriangleMesh {
        let mut positions = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                positions.push(Point3::new(i as f32, j as f32, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        TriangleMesh::from_triangles(&positions, &faces).unwrap()
    }

    #[test]
    fn test_unit_square_loop() {
        let mesh = unit_square();
        let topology = HalfEdgeTopology::build(&mesh);
        let boundary = BoundaryLoop::extract(&topology).unwrap();

        let order: Vec<usize> = boundary.vertices().iter().map(|v| v.index()).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
        assert_eq!(boundary.num_boundary_edges(), 4);

        // Consecutive loop vertices are joined by the loop's edges.
        for (i, &e) in boundary.edges().iter().enumerate() {
            assert_eq!(topology.dest(e), boundary.vertices()[i]);
            assert!(topology.is_boundary_edge(e));
        }
    }

    #[test]
    fn test_grid_loop() {
        let mesh = grid(4);
        let topology = HalfEdgeTopology::build(&mesh);
        let boundary = BoundaryLoop::extract(&topology).unwrap();

        assert_eq!(boundary.len(), 16);
        assert_eq!(boundary.num_boundary_edges(), topology.boundary_edges().count());

        let on_loop = mesh.vertex_ids().filter(|&v| boundary.is_boundary_vertex(v)).count();
        assert_eq!(on_loop, boundary.len());
        // Centre of the grid is interior.
        assert!(!boundary.is_boundary_vertex(VertexId::new(12)));

        // Loop runs counter-clockwise: positive signed area.
        let area: f32 = (0..boundary.len())
            .map(|i| {
                let a = mesh.position(boundary.vertices()[i]);
                let b = mesh.position(boundary.vertices()[(i + 1) % boundary.len()]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        assert!(area > 0.0);
    }

    #[test]
    fn test_boundary_faces() {
        let mesh = grid(3);
        let topology = HalfEdgeTopology::build(&mesh);
        let boundary = BoundaryLoop::extract(&topology).unwrap();

        // The two triangles of the centre quad touch no boundary edge.
        assert!(!boundary.is_boundary_face(FaceId::new(8)));
        assert!(!boundary.is_boundary_face(FaceId::new(9)));
        assert!(boundary.is_boundary_face(FaceId::new(0)));
    }

    #[test]
    fn test_closed_mesh_has_no_boundary() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let topology = HalfEdgeTopology::build(&mesh);

        assert_eq!(BoundaryLoop::extract(&topology).unwrap_err(), MeshError::NoBoundary);
    }

    #[test]
    fn test_two_components_have_two_loops() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let faces = [[0, 1, 2], [3, 4, 5]];
        let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let topology = HalfEdgeTopology::build(&mesh);

        assert_eq!(
            BoundaryLoop::extract(&topology).unwrap_err(),
            MeshError::MultipleBoundaries { loops: 2 }
        );
    }

    #[test]
    fn test_annulus_has_two_loops() {
        // A 3x3 grid with the centre quad removed.
        let mesh = grid(3);
        let (positions, mut faces) = mesh.to_face_vertex();
        faces.drain(8..10);
        let annulus: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let topology = HalfEdgeTopology::build(&annulus);

        assert_eq!(
            BoundaryLoop::extract(&topology).unwrap_err(),
            MeshError::MultipleBoundaries { loops: 2 }
        );
    }

    #[test]
    fn test_bowtie_has_two_loops() {
        // Two triangles sharing only vertex 0: each keeps its own loop.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        let faces = [[0, 1, 2], [0, 3, 4]];
        let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let topology = HalfEdgeTopology::build(&mesh);

        assert_eq!(
            BoundaryLoop::extract(&topology).unwrap_err(),
            MeshError::MultipleBoundaries { loops: 2 }
        );
    }

    #[test]
    fn test_pinched_strip_repeats_vertex() {
        // A strip of three quads whose far bottom corner is glued back onto
        // vertex 0. The single loop reads 1, 2, 0, 6, 5, 4, 3, 0.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
        ];
        let faces = [[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4], [2, 0, 6], [2, 6, 5]];
        let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let topology = HalfEdgeTopology::build(&mesh);
        assert!(topology.non_manifold_edges().is_empty());

        assert_eq!(
            BoundaryLoop::extract(&topology).unwrap_err(),
            MeshError::BoundaryVertexRepeated { vertex: 0 }
        );
    }

    #[test]
    fn test_walk_that_never_returns() {
        // Edge 2 points at edge 0 but not back, so rotating around vertex 1
        // keeps landing on edge 1 and never reaches edge 0 again.
        let face_vertices = vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)];
        let other_half = vec![
            DirectedEdgeId::invalid(),
            DirectedEdgeId::invalid(),
            DirectedEdgeId::new(0),
        ];
        let topology: HalfEdgeTopology =
            HalfEdgeTopology::from_twin_table(face_vertices, 3, other_half);

        assert_eq!(
            BoundaryLoop::extract(&topology).unwrap_err(),
            MeshError::BoundaryNotClosed { start: 0 }
        );
    }
}
