//! Error types for meshfold.
//!
//! Structural problems (bad indices, non-manifold edges, unexpected boundary
//! layouts) are reported through [`MeshError`]. Numerical degeneracies are not
//! errors: they fall back to a defined value and processing continues.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// The face-vertex list does not describe whole triangles.
    #[error("face-vertex list has {len} entries, which is not a multiple of 3")]
    FaceVertexCount {
        /// Length of the offending face-vertex list.
        len: usize,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// More vertices or directed edges than the index type can address.
    #[error("{count} elements exceed the largest index {max} of the index type")]
    IndexOverflow {
        /// Number of vertices or directed edges requested.
        count: usize,
        /// Largest index the index type can hold.
        max: usize,
    },

    /// The color array does not match the vertex array.
    #[error("mesh has {vertices} vertices but {colors} colors")]
    ColorCount {
        /// Number of vertex positions.
        vertices: usize,
        /// Number of colors supplied.
        colors: usize,
    },

    /// An edge has more than two incident faces, or its two faces disagree on winding.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The mesh is closed and has no boundary to pin.
    #[error("mesh has no boundary")]
    NoBoundary,

    /// The mesh has more than one boundary loop.
    #[error("mesh has {loops} boundary loops, expected exactly one")]
    MultipleBoundaries {
        /// Number of boundary loops found.
        loops: usize,
    },

    /// Walking the boundary did not return to its starting edge.
    #[error("boundary walk starting at edge {start} did not close")]
    BoundaryNotClosed {
        /// The directed edge the walk started from.
        start: usize,
    },

    /// A vertex occurs more than once on the boundary loop.
    #[error("vertex {vertex} appears more than once on the boundary loop")]
    BoundaryVertexRepeated {
        /// The repeated vertex.
        vertex: usize,
    },

    /// Algorithm failed to converge.
    #[error("algorithm failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = MeshError::InvalidVertexIndex { face: 2, vertex: 9 };
        assert_eq!(e.to_string(), "face 2 references invalid vertex index 9");

        let e = MeshError::MultipleBoundaries { loops: 2 };
        assert_eq!(e.to_string(), "mesh has 2 boundary loops, expected exactly one");
    }

    #[test]
    fn test_invalid_param() {
        let e = MeshError::invalid_param("tolerance", -1.0, "must be positive");
        assert_eq!(
            e.to_string(),
            "invalid parameter: tolerance = -1 (must be positive)"
        );
    }
}
