//! Vertex normal estimation.
//!
//! Each face contributes its unnormalized normal `(p1 - p0) x (p2 - p0)` to
//! its three corners. The length of that vector is twice the face area, so
//! the sum is area-weighted without computing any area explicitly.

use nalgebra::Vector3;

use crate::mesh::{FaceId, MeshIndex, TriangleMesh};

/// Accumulated normals shorter than this are left as zero.
const DEGENERATE_NORM: f32 = 1e-12;

/// Compute area-weighted unit normals for every vertex.
///
/// Vertices that belong to no face, or only to zero-area faces, get the zero
/// vector instead of a unit normal.
///
/// # Example
///
/// ```
/// use meshfold::prelude::*;
/// use meshfold::algo::normals::vertex_normals;
/// use nalgebra::{Point3, Vector3};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &[[0, 1, 2]]).unwrap();
///
/// for n in vertex_normals(&mesh) {
///     assert!((n - Vector3::z()).norm() < 1e-6);
/// }
/// ```
pub fn vertex_normals<I: MeshIndex>(mesh: &TriangleMesh<I>) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); mesh.num_vertices()];

    for f in mesh.face_ids() {
        let n = face_area_normal(mesh, f);
        for v in mesh.face_triangle(f) {
            normals[v.index()] += n;
        }
    }

    for n in &mut normals {
        *n = n.try_normalize(DEGENERATE_NORM).unwrap_or_else(Vector3::zeros);
    }

    normals
}

/// Compute the unit normal of a face, or zero for a degenerate face.
pub fn face_normal<I: MeshIndex>(mesh: &TriangleMesh<I>, f: FaceId<I>) -> Vector3<f32> {
    face_area_normal(mesh, f)
        .try_normalize(DEGENERATE_NORM)
        .unwrap_or_else(Vector3::zeros)
}

/// Cross product of two face edges; its length is twice the face area.
fn face_area_normal<I: MeshIndex>(mesh: &TriangleMesh<I>, f: FaceId<I>) -> Vector3<f32> {
    let [p0, p1, p2] = mesh.face_positions(f);
    (p1 - p0).cross(&(p2 - p0))
}
