//! Triangle mesh storage.
//!
//! [`TriangleMesh`] owns the raw arrays a loader hands over: vertex positions,
//! per-vertex colors and the flat face-vertex list. Everything else
//! (adjacency, boundary, normals, texture coordinates) is derived from it.

use nalgebra::{Point3, Vector3};

use super::index::{DirectedEdgeId, FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// RGB color with components in `[0, 1]`.
pub type Color = Vector3<f32>;

/// Color given to every vertex when the loader supplies none.
pub const DEFAULT_COLOR: Color = Vector3::new(1.0, 1.0, 1.0);

/// A triangle soup: positions, colors and a face-vertex list.
///
/// The face-vertex list always holds whole triangles and only references
/// existing vertices; both are checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh<I: MeshIndex = u32> {
    positions: Vec<Point3<f32>>,
    colors: Vec<Color>,
    face_vertices: Vec<VertexId<I>>,
}

impl<I: MeshIndex> TriangleMesh<I> {
    /// Build a mesh from parallel arrays.
    ///
    /// `face_vertices` holds one 0-based vertex id per triangle corner. When
    /// `colors` is `None` every vertex gets [`DEFAULT_COLOR`].
    ///
    /// # Errors
    ///
    /// - [`MeshError::FaceVertexCount`] if the face list is not a multiple of 3
    /// - [`MeshError::EmptyMesh`] if there are no faces
    /// - [`MeshError::IndexOverflow`] if a vertex or directed edge id would not fit `I`
    /// - [`MeshError::InvalidVertexIndex`] if a face references a missing vertex
    /// - [`MeshError::ColorCount`] if the colors do not match the positions
    ///
    /// # Example
    ///
    /// ```
    /// use meshfold::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh: TriangleMesh = TriangleMesh::new(positions, None, vec![0, 1, 2]).unwrap();
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn new(
        positions: Vec<Point3<f32>>,
        colors: Option<Vec<Color>>,
        face_vertices: Vec<usize>,
    ) -> Result<Self> {
        if face_vertices.len() % 3 != 0 {
            return Err(MeshError::FaceVertexCount {
                len: face_vertices.len(),
            });
        }
        if face_vertices.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        // Ids run from 0 to len - 1 and must stay clear of the sentinel
        let max = I::MAX.to_usize();
        for count in [positions.len(), face_vertices.len()] {
            if count > max.saturating_add(1) {
                return Err(MeshError::IndexOverflow { count, max });
            }
        }

        for (i, &v) in face_vertices.iter().enumerate() {
            if v >= positions.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: i / 3,
                    vertex: v,
                });
            }
        }

        let colors = match colors {
            Some(colors) if colors.len() != positions.len() => {
                return Err(MeshError::ColorCount {
                    vertices: positions.len(),
                    colors: colors.len(),
                });
            }
            Some(colors) => colors,
            None => vec![DEFAULT_COLOR; positions.len()],
        };

        Ok(Self {
            positions,
            colors,
            face_vertices: face_vertices.into_iter().map(VertexId::new).collect(),
        })
    }

    /// Build a mesh from positions and triangle index triples.
    pub fn from_triangles(positions: &[Point3<f32>], faces: &[[usize; 3]]) -> Result<Self> {
        let face_vertices = faces.iter().flatten().copied().collect();
        Self::new(positions.to_vec(), None, face_vertices)
    }

    /// Assemble a mesh from arrays that are already known to be consistent.
    pub(crate) fn from_parts(
        positions: Vec<Point3<f32>>,
        colors: Vec<Color>,
        face_vertices: Vec<VertexId<I>>,
    ) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        debug_assert_eq!(face_vertices.len() % 3, 0);
        Self {
            positions,
            colors,
            face_vertices,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_vertices.len() / 3
    }

    /// Get the number of directed edges (three per face).
    #[inline]
    pub fn num_directed_edges(&self) -> usize {
        self.face_vertices.len()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f32> {
        &self.positions[v.index()]
    }

    /// Get the color of a vertex.
    #[inline]
    pub fn color(&self, v: VertexId<I>) -> &Color {
        &self.colors[v.index()]
    }

    /// All vertex positions, indexed by vertex id.
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    /// All vertex colors, indexed by vertex id.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The flat face-vertex list, three entries per face.
    pub fn face_vertices(&self) -> &[VertexId<I>] {
        &self.face_vertices
    }

    /// The vertex at the corner an edge arrives at.
    #[inline]
    pub fn edge_dest(&self, e: DirectedEdgeId<I>) -> VertexId<I> {
        self.face_vertices[e.index()]
    }

    /// The vertex an edge leaves from.
    #[inline]
    pub fn edge_origin(&self, e: DirectedEdgeId<I>) -> VertexId<I> {
        self.face_vertices[e.prev().index()]
    }

    /// Get the three vertices of a face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let base = 3 * f.index();
        [
            self.face_vertices[base],
            self.face_vertices[base + 1],
            self.face_vertices[base + 2],
        ]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f32>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Iterate over all directed edge IDs.
    pub fn directed_edge_ids(&self) -> impl Iterator<Item = DirectedEdgeId<I>> + '_ {
        (0..self.face_vertices.len()).map(DirectedEdgeId::new)
    }

    // ==================== Geometry ====================

    /// Barycentre of all vertex positions.
    ///
    /// Returns the origin for a mesh without vertices.
    pub fn centre_of_gravity(&self) -> Point3<f32> {
        if self.positions.is_empty() {
            return Point3::origin();
        }
        let sum: Vector3<f32> = self.positions.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.positions.len() as f32)
    }

    /// Largest distance from the centre of gravity to any vertex.
    pub fn object_size(&self) -> f32 {
        let centre = self.centre_of_gravity();
        self.positions
            .iter()
            .map(|p| (p - centre).norm())
            .fold(0.0, f32::max)
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Convert to plain `(positions, triangles)` arrays for a writer.
    pub fn to_face_vertex(&self) -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        let faces = self
            .face_vertices
            .chunks_exact(3)
            .map(|t| [t[0].index(), t[1].index(), t[2].index()])
            .collect();
        (self.positions.clone(), faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> TriangleMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriangleMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_construction() {
        let mesh = unit_square();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_directed_edges(), 6);
        assert_eq!(*mesh.color(VertexId::new(3)), DEFAULT_COLOR);
    }

    #[test]
    fn test_face_count_not_multiple_of_three() {
        let positions = vec![Point3::origin(); 3];
        let result: Result<TriangleMesh> = TriangleMesh::new(positions, None, vec![0, 1]);
        assert_eq!(result, Err(MeshError::FaceVertexCount { len: 2 }));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let positions = vec![Point3::origin(); 3];
        let result: Result<TriangleMesh> =
            TriangleMesh::new(positions, None, vec![0, 1, 2, 2, 1, 7]);
        assert_eq!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 1, vertex: 7 })
        );
    }

    #[test]
    fn test_index_overflow() {
        // Vertex 69999 does not fit a 16-bit id.
        let positions = vec![Point3::origin(); 70_000];
        let result = TriangleMesh::<u16>::new(positions, None, vec![0, 1, 69_999]);
        assert_eq!(
            result,
            Err(MeshError::IndexOverflow {
                count: 70_000,
                max: 65_534
            })
        );

        // 21846 faces give directed edge ids up to 65537.
        let positions = vec![Point3::origin(); 3];
        let strip: Vec<usize> = (0..21_846).flat_map(|_| [0, 1, 2]).collect();
        let result = TriangleMesh::<u16>::new(positions.clone(), None, strip);
        assert_eq!(
            result,
            Err(MeshError::IndexOverflow {
                count: 65_538,
                max: 65_534
            })
        );

        // The largest addressable edge id is still accepted.
        let strip: Vec<usize> = (0..21_845).flat_map(|_| [0, 1, 2]).collect();
        let mesh = TriangleMesh::<u16>::new(positions, None, strip).unwrap();
        assert_eq!(mesh.num_directed_edges(), 65_535);
    }

    #[test]
    fn test_empty_mesh() {
        let result: Result<TriangleMesh> = TriangleMesh::new(Vec::new(), None, Vec::new());
        assert_eq!(result, Err(MeshError::EmptyMesh));
    }

    #[test]
    fn test_color_count_mismatch() {
        let positions = vec![Point3::origin(); 3];
        let colors = vec![DEFAULT_COLOR; 2];
        let result: Result<TriangleMesh> =
            TriangleMesh::new(positions, Some(colors), vec![0, 1, 2]);
        assert_eq!(
            result,
            Err(MeshError::ColorCount {
                vertices: 3,
                colors: 2
            })
        );
    }

    #[test]
    fn test_edge_endpoints() {
        let mesh = unit_square();
        // Edge 0 arrives at corner 0 of face 0 and leaves corner 2.
        let e = DirectedEdgeId::new(0);
        assert_eq!(mesh.edge_origin(e), VertexId::new(2));
        assert_eq!(mesh.edge_dest(e), VertexId::new(0));

        let e = DirectedEdgeId::new(4);
        assert_eq!(mesh.edge_origin(e), VertexId::new(0));
        assert_eq!(mesh.edge_dest(e), VertexId::new(2));
    }

    #[test]
    fn test_centre_and_size() {
        let mesh = unit_square();
        let c = mesh.centre_of_gravity();
        assert!((c - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-6);
        assert!((mesh.object_size() - 0.5f32.sqrt()).abs() < 1e-6);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_to_face_vertex() {
        let mesh = unit_square();
        let (positions, faces) = mesh.to_face_vertex();
        assert_eq!(positions.len(), 4);
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }
}
