//! Core mesh data structures.
//!
//! # Overview
//!
//! A [`TriangleMesh`] stores positions, colors and a flat face-vertex list.
//! Connectivity is derived from it in stages:
//!
//! - [`HalfEdgeTopology`] pairs every directed edge with its twin and records
//!   one outgoing edge per vertex
//! - [`BoundaryLoop`] traces the single boundary of a disk-like mesh
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`DirectedEdgeId`] - Identifies a directed edge (`3 * face + corner`)
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use meshfold::mesh::{BoundaryLoop, HalfEdgeTopology, TriangleMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//!
//! let topology = HalfEdgeTopology::build(&mesh);
//! let boundary = BoundaryLoop::extract(&topology).unwrap();
//! assert_eq!(boundary.len(), 3);
//! ```

mod boundary;
mod index;
mod store;
mod topology;

pub use boundary::BoundaryLoop;
pub use index::{DirectedEdgeId, FaceId, MeshIndex, VertexId};
pub use store::{Color, TriangleMesh, DEFAULT_COLOR};
pub use topology::{HalfEdgeTopology, OutgoingEdgeIter};
