//! Staged processing of a loaded mesh.
//!
//! [`MeshAnalysis`] derives the read-only structures (adjacency, boundary,
//! normals) once. [`unwrap`] additionally parameterizes the mesh and replaces
//! it with its boundary-first relabeled version. The replacement happens only
//! after every stage has succeeded, so a failed unwrap leaves the caller's mesh
//! exactly as it was.

use nalgebra::Vector3;

use crate::algo::normals::vertex_normals;
use crate::algo::parameterize::{tutte_with_progress, Relabeling, SolveStats, TutteOptions, UVMap};
use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{BoundaryLoop, HalfEdgeTopology, MeshIndex, TriangleMesh, VertexId};

/// Derived connectivity and shading data of a mesh.
#[derive(Debug, Clone)]
pub struct MeshAnalysis<I: MeshIndex = u32> {
    /// Twin and first-outgoing-edge tables.
    pub topology: HalfEdgeTopology<I>,
    /// The single boundary loop.
    pub boundary: BoundaryLoop<I>,
    /// Unit vertex normals, zero where undefined.
    pub normals: Vec<Vector3<f32>>,
}

impl<I: MeshIndex> MeshAnalysis<I> {
    /// Build topology, boundary and normals for a mesh.
    ///
    /// # Errors
    ///
    /// Any boundary extraction error, see [`BoundaryLoop::extract`].
    pub fn compute(mesh: &TriangleMesh<I>) -> Result<Self> {
        Self::from_topology(mesh, HalfEdgeTopology::build(mesh))
    }

    fn from_topology(mesh: &TriangleMesh<I>, topology: HalfEdgeTopology<I>) -> Result<Self> {
        log::debug!(
            "topology: {} vertices, {} directed edges, {} boundary edges",
            topology.num_vertices(),
            topology.num_directed_edges(),
            topology.boundary_edges().count()
        );

        let boundary = BoundaryLoop::extract(&topology)?;
        let normals = vertex_normals(mesh);
        log::debug!("computed {} vertex normals", normals.len());

        Ok(Self {
            topology,
            boundary,
            normals,
        })
    }
}

/// Everything [`unwrap`] produces besides the relabeled mesh itself.
///
/// All per-vertex data is indexed by the relabeled vertex ids.
#[derive(Debug, Clone)]
pub struct Unwrapped<I: MeshIndex = u32> {
    /// Texture coordinates in the unit square.
    pub uv: UVMap<I>,
    /// Unit vertex normals.
    pub normals: Vec<Vector3<f32>>,
    /// The boundary loop; its vertices are `0..len` in loop order.
    pub boundary: BoundaryLoop<I>,
    /// Mapping from the previous vertex ids to the current ones.
    pub relabeling: Relabeling<I>,
    /// Solver statistics.
    pub stats: SolveStats,
}

/// Parameterize a mesh in place.
///
/// On success `mesh` is replaced by its boundary-first relabeled version and
/// any vertex ids held from before must be translated with
/// [`Unwrapped::relabeling`]. On error `mesh` is left unchanged.
///
/// # Errors
///
/// - [`crate::MeshError::NonManifoldEdge`] if any edge is non-manifold
/// - any boundary extraction error, see [`BoundaryLoop::extract`]
/// - any solver error, see [`crate::algo::parameterize::tutte`]
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
/// let mut mesh: TriangleMesh =
///     TriangleMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// let result = unwrap(&mut mesh, &TutteOptions::default()).unwrap();
/// assert_eq!(result.boundary.len(), 4);
/// assert_eq!(result.uv.len(), mesh.num_vertices());
/// ```
pub fn unwrap<I: MeshIndex>(
    mesh: &mut TriangleMesh<I>,
    options: &TutteOptions,
) -> Result<Unwrapped<I>> {
    unwrap_with_progress(mesh, options, &Progress::none())
}

/// [`unwrap`] with progress reporting.
pub fn unwrap_with_progress<I: MeshIndex>(
    mesh: &mut TriangleMesh<I>,
    options: &TutteOptions,
    progress: &Progress,
) -> Result<Unwrapped<I>> {
    let topology = HalfEdgeTopology::build(mesh);
    topology.require_manifold()?;
    let analysis = MeshAnalysis::from_topology(mesh, topology)?;

    let param = tutte_with_progress(
        mesh,
        &analysis.topology,
        &analysis.boundary,
        options,
        progress,
    )?;

    let normals = param.relabeling.apply(&analysis.normals);
    let boundary = BoundaryLoop::from_parts(
        (0..param.relabeling.num_boundary())
            .map(VertexId::new)
            .collect(),
        analysis.boundary.edges().to_vec(),
        param.mesh.num_vertices(),
        param.mesh.num_directed_edges(),
    );

    log::info!(
        "unwrapped mesh: {} vertices ({} boundary), {} faces",
        param.mesh.num_vertices(),
        boundary.len(),
        param.mesh.num_faces()
    );
    *mesh = param.mesh;

    Ok(Unwrapped {
        uv: param.uv,
        normals,
        boundary,
        relabeling: param.relabeling,
        stats: param.stats,
    })
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::error::MeshError;

    fn tetrahedron() -> TriangleMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        TriangleMesh::from_triangles(&positions, &faces).unwrap()
    }

    /// Square fan around vertex 0, with the rim listed out of loop order.
    fn fan() -> TriangleMesh {
        let positions = vec![
            Point3::new(0.5, 0.5, 0.3),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let faces = [[0, 1, 3], [0, 3, 4], [0, 4, 2], [0, 2, 1]];
        TriangleMesh::from_triangles(&positions, &faces).unwrap()
    }

    #[test]
    fn test_analysis() {
        let mesh = fan();
        let analysis = MeshAnalysis::compute(&mesh).unwrap();

        assert_eq!(analysis.boundary.len(), 4);
        assert!(!analysis.boundary.is_boundary_vertex(VertexId::new(0)));
        assert_eq!(analysis.normals.len(), 5);
        assert!((analysis.normals[0] - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_analysis_of_closed_mesh_fails() {
        assert_eq!(
            MeshAnalysis::compute(&tetrahedron()).err(),
            Some(MeshError::NoBoundary)
        );
    }

    #[test]
    fn test_unwrap_replaces_mesh() {
        let mut mesh = fan();
        let original = mesh.clone();
        let result = unwrap(&mut mesh, &TutteOptions::direct()).unwrap();

        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(result.relabeling.num_boundary(), 4);
        for (i, v) in result.boundary.vertices().iter().enumerate() {
            assert_eq!(v.index(), i);
        }

        // Same geometry, new ids.
        for old in original.vertex_ids() {
            let new = result.relabeling.new_id(old).unwrap();
            assert_eq!(original.position(old), mesh.position(new));
        }

        // The centre is last and sits in the middle of the square.
        let centre = result.uv.get(VertexId::new(4));
        assert!((centre.x - 0.5).abs() < 1e-5);
        assert!((centre.y - 0.5).abs() < 1e-5);
        assert!((result.normals[4] - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_failed_unwrap_leaves_mesh_untouched() {
        let mut mesh = tetrahedron();
        let before = mesh.clone();
        assert_eq!(
            unwrap(&mut mesh, &TutteOptions::default()).err(),
            Some(MeshError::NoBoundary)
        );
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_unwrap_rejects_non_manifold() {
        // Three triangles hinged on edge 0-1.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = [[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let mut mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
        let before = mesh.clone();

        assert_eq!(
            unwrap(&mut mesh, &TutteOptions::default()).err(),
            Some(MeshError::NonManifoldEdge { v0: 0, v1: 1 })
        );
        assert_eq!(mesh, before);
    }
}
