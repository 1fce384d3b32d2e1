//! Boundary-first vertex relabeling.
//!
//! The Tutte solve wants boundary vertices at ids `[0, B)` in loop order and
//! interior vertices at `[B, B + N)`. Vertices that belong to no face are
//! dropped, so the relabeling is a bijection between the connected vertices of
//! the original mesh and the vertices of the relabeled one.

use crate::mesh::{BoundaryLoop, HalfEdgeTopology, MeshIndex, TriangleMesh, VertexId};

/// Mapping between original and boundary-first vertex ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Relabeling<I: MeshIndex = u32> {
    old_to_new: Vec<VertexId<I>>,
    new_to_old: Vec<VertexId<I>>,
    num_boundary: usize,
}

impl<I: MeshIndex> Relabeling<I> {
    /// Order boundary vertices first (in loop order), then every other
    /// connected vertex in ascending original id.
    pub fn boundary_first(topology: &HalfEdgeTopology<I>, boundary: &BoundaryLoop<I>) -> Self {
        let num_vertices = topology.num_vertices();
        let mut new_to_old = Vec::with_capacity(num_vertices);
        new_to_old.extend_from_slice(boundary.vertices());

        new_to_old.extend(
            (0..num_vertices)
                .map(VertexId::new)
                .filter(|&v| !topology.is_isolated(v) && !boundary.is_boundary_vertex(v)),
        );

        let mut old_to_new = vec![VertexId::invalid(); num_vertices];
        for (new, old) in new_to_old.iter().enumerate() {
            old_to_new[old.index()] = VertexId::new(new);
        }

        Self {
            old_to_new,
            new_to_old,
            num_boundary: boundary.len(),
        }
    }

    /// Number of vertices after relabeling (`B + N`).
    #[inline]
    pub fn len(&self) -> usize {
        self.new_to_old.len()
    }

    /// Check if no vertex survived.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.new_to_old.is_empty()
    }

    /// Number of boundary vertices (`B`).
    #[inline]
    pub fn num_boundary(&self) -> usize {
        self.num_boundary
    }

    /// Number of interior vertices (`N`).
    #[inline]
    pub fn num_interior(&self) -> usize {
        self.new_to_old.len() - self.num_boundary
    }

    /// Number of vertices before relabeling, dropped ones included.
    #[inline]
    pub fn num_original(&self) -> usize {
        self.old_to_new.len()
    }

    /// New id of an original vertex, or `None` if it was dropped.
    #[inline]
    pub fn new_id(&self, old: VertexId<I>) -> Option<VertexId<I>> {
        self.old_to_new.get(old.index()).and_then(|v| v.valid())
    }

    /// Original id of a relabeled vertex.
    #[inline]
    pub fn old_id(&self, new: VertexId<I>) -> VertexId<I> {
        self.new_to_old[new.index()]
    }

    /// Gather a per-vertex array into the new order.
    ///
    /// `values` must be indexed by original vertex id.
    pub fn apply<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.new_to_old
            .iter()
            .map(|old| values[old.index()].clone())
            .collect()
    }

    /// Rewrite a face-vertex list in new ids.
    ///
    /// Every referenced vertex must belong to a face of the relabeled mesh,
    /// which holds for the mesh the relabeling was built from.
    pub fn remap_faces(&self, face_vertices: &[VertexId<I>]) -> Vec<VertexId<I>> {
        face_vertices
            .iter()
            .map(|&v| self.old_to_new[v.index()])
            .collect()
    }

    /// Build the relabeled copy of a mesh.
    ///
    /// Face order is unchanged, so directed edge ids stay valid; only the
    /// vertex ids stored in the face list change.
    pub fn apply_to_mesh(&self, mesh: &TriangleMesh<I>) -> TriangleMesh<I> {
        TriangleMesh::from_parts(
            self.apply(mesh.positions()),
            self.apply(mesh.colors()),
            self.remap_faces(mesh.face_vertices()),
        )
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;

    /// Unit square split into four triangles around a centre vertex, plus a
    /// stray vertex that no face uses.
    fn square_with_centre() -> TriangleMesh {
        let positions = vec![
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(9.0, 9.0, 9.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = [[0, 2, 3], [0, 3, 4], [0, 4, 5], [0, 5, 2]];
        TriangleMesh::from_triangles(&positions, &faces).unwrap()
    }

    #[test]
    fn test_boundary_first_bijection() {
        let mesh = square_with_centre();
        let topology = HalfEdgeTopology::build(&mesh);
        let boundary = BoundaryLoop::extract(&topology).unwrap();
        let relabeling = Relabeling::boundary_first(&topology, &boundary);

        assert_eq!(relabeling.num_original(), 6);
        assert_eq!(relabeling.len(), 5);
        assert_eq!(relabeling.num_boundary(), 4);
        assert_eq!(relabeling.num_interior(), 1);

        // Every connected vertex appears exactly once; the stray one is dropped.
        let mut seen = vec![false; relabeling.len()];
        for old in mesh.vertex_ids() {
            match relabeling.new_id(old) {
                Some(new) => {
                    assert!(!seen[new.index()]);
                    seen[new.index()] = true;
                    assert_eq!(relabeling.old_id(new), old);
                }
                None => assert_eq!(old.index(), 1),
            }
        }
        assert!(seen.iter().all(|&s| s));

        // Boundary first, in loop order, then the centre.
        for (i, &v) in boundary.vertices().iter().enumerate() {
            assert_eq!(relabeling.new_id(v), Some(VertexId::new(i)));
        }
        assert_eq!(relabeling.new_id(VertexId::new(0)), Some(VertexId::new(4)));
    }

    #[test]
    fn test_apply_to_mesh() {
        let mesh = square_with_centre();
        let topology = HalfEdgeTopology::build(&mesh);
        let boundary = BoundaryLoop::extract(&topology).unwrap();
        let relabeling = Relabeling::boundary_first(&topology, &boundary);

        let relabeled = relabeling.apply_to_mesh(&mesh);
        assert_eq!(relabeled.num_vertices(), 5);
        assert_eq!(relabeled.num_faces(), mesh.num_faces());

        // Same geometry per corner.
        for (old, new) in mesh.face_vertices().iter().zip(relabeled.face_vertices()) {
            assert_eq!(mesh.position(*old), relabeled.position(*new));
        }
        assert_eq!(*relabeled.position(VertexId::new(4)), Point3::new(0.5, 0.5, 0.0));
    }
}
