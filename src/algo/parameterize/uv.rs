//! UV coordinate storage.
//!
//! This module provides the [`UVMap`] type for storing 2D parameterization
//! coordinates for mesh vertices.

use std::marker::PhantomData;

use nalgebra::Point2;

use crate::mesh::{FaceId, MeshIndex, TriangleMesh, VertexId};

/// UV coordinates for mesh vertices.
///
/// Indexed by vertex id of the mesh the coordinates were computed for. The
/// Tutte parameterization keeps every coordinate inside `[0, 1] x [0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UVMap<I: MeshIndex = u32> {
    coords: Vec<Point2<f32>>,
    _marker: PhantomData<I>,
}

impl<I: MeshIndex> UVMap<I> {
    /// Create a new UV map with the given coordinates.
    ///
    /// Index 0 corresponds to vertex 0, and so on.
    pub fn new(coords: Vec<Point2<f32>>) -> Self {
        Self {
            coords,
            _marker: PhantomData,
        }
    }

    /// Get the UV coordinates for a vertex.
    #[inline]
    pub fn get(&self, v: VertexId<I>) -> Point2<f32> {
        self.coords[v.index()]
    }

    /// Set the UV coordinates for a vertex.
    #[inline]
    pub fn set(&mut self, v: VertexId<I>, uv: Point2<f32>) {
        self.coords[v.index()] = uv;
    }

    /// Get the number of UV coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all UV coordinates with their vertex IDs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId<I>, Point2<f32>)> + '_ {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &uv)| (VertexId::new(i), uv))
    }

    /// Get the raw coordinates slice, ready for a writer.
    pub fn as_slice(&self) -> &[Point2<f32>] {
        &self.coords
    }

    /// Take the raw coordinates.
    pub fn into_vec(self) -> Vec<Point2<f32>> {
        self.coords
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the UV map is empty.
    pub fn bounding_box(&self) -> Option<(Point2<f32>, Point2<f32>)> {
        let first = *self.coords.first()?;
        let mut min = first;
        let mut max = first;

        for uv in &self.coords {
            min.x = min.x.min(uv.x);
            min.y = min.y.min(uv.y);
            max.x = max.x.max(uv.x);
            max.y = max.y.max(uv.y);
        }

        Some((min, max))
    }

    /// Signed area of a face in UV space; positive for counter-clockwise.
    pub fn signed_area(&self, mesh: &TriangleMesh<I>, f: FaceId<I>) -> f32 {
        let [v0, v1, v2] = mesh.face_triangle(f);
        let p0 = self.get(v0);
        let p1 = self.get(v1);
        let p2 = self.get(v2);
        0.5 * ((p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y))
    }

    /// Compute the total unsigned area in UV space.
    pub fn total_area(&self, mesh: &TriangleMesh<I>) -> f32 {
        mesh.face_ids().map(|f| self.signed_area(mesh, f).abs()).sum()
    }

    /// Count faces whose UV triangle is clockwise or has zero area.
    ///
    /// A valid embedding of a counter-clockwise mesh has none.
    pub fn flipped_faces(&self, mesh: &TriangleMesh<I>) -> usize {
        mesh.face_ids()
            .filter(|&f| self.signed_area(mesh, f) <= 0.0)
            .count()
    }
}
