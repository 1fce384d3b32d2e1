//! Index types for mesh elements.
//!
//! Vertices, directed edges and faces are identified by type-safe wrappers
//! around an integer index. The wrappers are generic over the integer type so
//! small meshes can use `u16` and very large ones `u64`; `u32` is the default.
//!
//! Directed edges are not stored explicitly. Edge `3 * f + c` is corner `c` of
//! face `f` and runs from the face-vertex at the previous corner to the
//! face-vertex at corner `c`, so face membership and the next/previous edge
//! around a face are pure arithmetic on the id.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
///
/// The all-ones value of each type is reserved as the "none" sentinel.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// A sentinel value representing an invalid/null index.
    const INVALID: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe directed edge index (`3 * face + corner`).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DirectedEdgeId<I: MeshIndex = u32>(I);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }

            /// `Some(self)` for a valid index, `None` for the sentinel.
            #[inline]
            pub fn valid(self) -> Option<Self> {
                if self.is_valid() {
                    Some(self)
                } else {
                    None
                }
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(NONE)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(DirectedEdgeId, "DE");
impl_index_type!(FaceId, "F");

impl<I: MeshIndex> DirectedEdgeId<I> {
    /// The edge arriving at `corner` (0, 1 or 2) of `face`.
    #[inline]
    pub fn from_corner(face: FaceId<I>, corner: usize) -> Self {
        debug_assert!(corner < 3);
        Self::new(3 * face.index() + corner)
    }

    /// The face this edge belongs to.
    #[inline]
    pub fn face(self) -> FaceId<I> {
        FaceId::new(self.index() / 3)
    }

    /// The corner of [`Self::face`] this edge arrives at.
    #[inline]
    pub fn corner(self) -> usize {
        self.index() % 3
    }

    /// The next edge around the same face.
    #[inline]
    pub fn next(self) -> Self {
        let i = self.index();
        if i % 3 == 2 {
            Self::new(i - 2)
        } else {
            Self::new(i + 1)
        }
    }

    /// The previous edge around the same face.
    #[inline]
    pub fn prev(self) -> Self {
        let i = self.index();
        if i % 3 == 0 {
            Self::new(i + 2)
        } else {
            Self::new(i - 1)
        }
    }
}

impl<I: MeshIndex> FaceId<I> {
    /// The three directed edges of this face, in corner order.
    #[inline]
    pub fn edges(self) -> [DirectedEdgeId<I>; 3] {
        [
            DirectedEdgeId::from_corner(self, 0),
            DirectedEdgeId::from_corner(self, 1),
            DirectedEdgeId::from_corner(self, 2),
        ]
    }
}
