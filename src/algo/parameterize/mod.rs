//! UV parameterization.
//!
//! Maps a disk-like triangle mesh onto the unit square. The boundary loop is
//! pinned to the square's perimeter and every interior vertex is solved to
//! the average of its neighbours ([`tutte`]). Because the vertex order of the
//! result is boundary-first, the solve also produces a relabeled mesh and the
//! [`Relabeling`] that relates it to the input.
//!
//! # Requirements
//!
//! The mesh must be manifold and have exactly one boundary loop. Closed meshes
//! must first be cut to create a boundary.
//!
//! # Example
//!
//! ```
//! use meshfold::prelude::*;
//! use meshfold::algo::parameterize::{tutte, TutteOptions};
//! use nalgebra::Point3;
//!
//! // A square fan around a centre vertex.
//! let positions = vec![
//!     Point3::new(0.5, 0.5, 0.2),
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = [[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
//! let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &faces).unwrap();
//!
//! let topology = HalfEdgeTopology::build(&mesh);
//! let boundary = BoundaryLoop::extract(&topology).unwrap();
//! let result = tutte(&mesh, &topology, &boundary, &TutteOptions::direct()).unwrap();
//!
//! // The centre vertex is last after relabeling and lands in the middle.
//! let centre = result.uv.get(VertexId::new(4));
//! assert!((centre.x - 0.5).abs() < 1e-5 && (centre.y - 0.5).abs() < 1e-5);
//! ```
//!
//! # References
//!
//! - Floater, M. S. (1997). "Parametrization and smooth approximation of
//!   surface triangulations." Computer Aided Geometric Design.

mod relabel;
mod sparse;
mod tutte;
mod uv;

pub use relabel::Relabeling;
pub use sparse::{conjugate_gradient, CgSolution, CsrMatrix};
pub use tutte::{
    square_perimeter, tutte, tutte_with_progress, Parameterization, SolveStats, TutteOptions,
    TutteSolver, REFERENCE_ITERATIONS,
};
pub use uv::UVMap;
