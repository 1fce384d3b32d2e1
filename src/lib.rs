//! # Meshfold
//!
//! Half-edge connectivity, boundary extraction, vertex normals and Tutte
//! parameterization for indexed triangle meshes.
//!
//! ## Features
//!
//! - **Implicit half-edges**: directed edge `3 * face + corner`, twins found by hashing vertex pairs
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Boundary loops**: ordered loop with O(1) vertex, edge and face membership queries
//! - **Tutte embedding**: uniform-weight parameterization onto the unit square
//!
//! ## Quick Start
//!
//! ```
//! use meshfold::prelude::*;
//! use nalgebra::Point3;
//!
//! // A 2x2 grid of quads, split into triangles
//! let mut positions = Vec::new();
//! for j in 0..3 {
//!     for i in 0..3 {
//!         positions.push(Point3::new(i as f32, j as f32, 0.0));
//!     }
//! }
//! let mut faces = Vec::new();
//! for j in 0..2 {
//!     for i in 0..2 {
//!         let v = j * 3 + i;
//!         faces.push([v, v + 1, v + 4]);
//!         faces.push([v, v + 4, v + 3]);
//!     }
//! }
//! let mut mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
//!
//! // Topology, boundary and normals
//! let analysis = MeshAnalysis::compute(&mesh).unwrap();
//! assert_eq!(analysis.boundary.len(), 8);
//!
//! // Parameterize; the mesh is relabeled boundary-first
//! let result = unwrap(&mut mesh, &TutteOptions::default()).unwrap();
//! let centre = result.uv.get(VertexId::new(8));
//! assert!((centre.x - 0.5).abs() < 1e-4 && (centre.y - 0.5).abs() < 1e-4);
//! ```
//!
//! ## Stages
//!
//! Each stage only reads the output of the previous one:
//!
//! ```
//! use meshfold::prelude::*;
//! use meshfold::algo::normals::vertex_normals;
//! use meshfold::algo::parameterize::tutte;
//! use nalgebra::Point3;
//!
//! # let positions = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//! let topology = HalfEdgeTopology::build(&mesh);
//! let boundary = BoundaryLoop::extract(&topology).unwrap();
//! let normals = vertex_normals(&mesh);
//! let param = tutte(&mesh, &topology, &boundary, &TutteOptions::default()).unwrap();
//!
//! // Iterate over neighbors of a vertex
//! for neighbor in topology.vertex_neighbors(VertexId::new(0)) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//! assert_eq!(normals.len(), param.uv.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod pipeline;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshfold::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::parameterize::{Parameterization, TutteOptions, TutteSolver, UVMap};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        BoundaryLoop, Color, DirectedEdgeId, FaceId, HalfEdgeTopology, MeshIndex, TriangleMesh,
        VertexId,
    };
    pub use crate::pipeline::{unwrap, MeshAnalysis, Unwrapped};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
