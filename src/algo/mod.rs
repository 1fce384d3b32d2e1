//! Mesh processing algorithms.
//!
//! - **Normals**: area-weighted vertex normals and unit face normals
//! - **Parameterization**: Tutte embedding onto the unit square

pub mod normals;
pub mod parameterize;
pub mod progress;

pub use progress::Progress;
