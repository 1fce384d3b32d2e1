//! Tutte (uniform-weight Floater) parameterization.
//!
//! Boundary vertices are pinned to the perimeter of the unit square and every
//! interior vertex is placed at the average of its one-ring neighbours. The
//! result is the discrete harmonic map with uniform weights, which is a valid
//! planar embedding for any manifold topological disk because the boundary
//! polygon is convex.
//!
//! # References
//!
//! - Tutte, W. T. (1963). "How to draw a graph." Proc. London Math. Society.
//! - Floater, M. S. (1997). "Parametrization and smooth approximation of
//!   surface triangulations." Computer Aided Geometric Design.

use nalgebra::{DVector, Point2};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{BoundaryLoop, HalfEdgeTopology, MeshIndex, TriangleMesh, VertexId};

use super::relabel::Relabeling;
use super::sparse::{conjugate_gradient, CsrMatrix};
use super::uv::UVMap;

/// Number of relaxation rounds of the fixed-count reference scheme.
pub const REFERENCE_ITERATIONS: usize = 100_000;

/// Where interior vertices start, and where vertices without neighbours stay.
const CENTRE: Point2<f32> = Point2::new(0.5, 0.5);

/// Rounds between two progress reports.
const PROGRESS_INTERVAL: usize = 1000;

/// How the interior coordinates are solved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TutteSolver {
    /// Synchronous (Jacobi) relaxation for exactly this many rounds.
    FixedIterations(usize),

    /// Synchronous relaxation until no coordinate moves more than `tolerance`
    /// in a round, or `max_iterations` rounds have run.
    Converge {
        /// Largest per-coordinate change that counts as converged.
        tolerance: f32,
        /// Round cap.
        max_iterations: usize,
    },

    /// Conjugate gradient on the uniform Laplacian system.
    Direct {
        /// Relative residual at which the solve stops.
        tolerance: f64,
        /// Iteration cap per coordinate.
        max_iterations: usize,
    },
}

/// Options for Tutte parameterization.
#[derive(Debug, Clone)]
pub struct TutteOptions {
    /// Solver for the interior coordinates.
    pub solver: TutteSolver,

    /// Run relaxation rounds on the rayon thread pool (default: false).
    ///
    /// Each round only reads the previous round's coordinates, so the result
    /// does not depend on this flag.
    pub parallel: bool,
}

impl Default for TutteOptions {
    fn default() -> Self {
        Self {
            solver: TutteSolver::Converge {
                tolerance: 1e-6,
                max_iterations: REFERENCE_ITERATIONS,
            },
            parallel: false,
        }
    }
}

impl TutteOptions {
    /// Fixed-count relaxation with [`REFERENCE_ITERATIONS`] rounds.
    pub fn reference() -> Self {
        Self::default().with_solver(TutteSolver::FixedIterations(REFERENCE_ITERATIONS))
    }

    /// Direct sparse solve.
    pub fn direct() -> Self {
        Self::default().with_solver(TutteSolver::Direct {
            tolerance: 1e-10,
            max_iterations: 10_000,
        })
    }

    /// Set the solver.
    pub fn with_solver(mut self, solver: TutteSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Set the stopping tolerance.
    ///
    /// A fixed-count solver becomes a converging one capped at its round count.
    /// Relaxation measures changes in `f32`, so for it a positive tolerance
    /// below `f32::MIN_POSITIVE` is raised to that value.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver = match self.solver {
            TutteSolver::FixedIterations(max_iterations) => TutteSolver::Converge {
                tolerance: relaxation_tolerance(tolerance),
                max_iterations,
            },
            TutteSolver::Converge { max_iterations, .. } => TutteSolver::Converge {
                tolerance: relaxation_tolerance(tolerance),
                max_iterations,
            },
            TutteSolver::Direct { max_iterations, .. } => TutteSolver::Direct {
                tolerance,
                max_iterations,
            },
        };
        self
    }

    /// Set the iteration cap, or the round count of a fixed-count solver.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.solver = match self.solver {
            TutteSolver::FixedIterations(_) => TutteSolver::FixedIterations(max_iterations),
            TutteSolver::Converge { tolerance, .. } => TutteSolver::Converge {
                tolerance,
                max_iterations,
            },
            TutteSolver::Direct { tolerance, .. } => TutteSolver::Direct {
                tolerance,
                max_iterations,
            },
        };
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check the solver parameters.
    pub fn validate(&self) -> Result<()> {
        match self.solver {
            TutteSolver::FixedIterations(_) => Ok(()),
            TutteSolver::Converge {
                tolerance,
                max_iterations,
            } => {
                if !(tolerance.is_finite() && tolerance > 0.0) {
                    return Err(MeshError::invalid_param(
                        "tolerance",
                        tolerance,
                        "must be positive and finite",
                    ));
                }
                if max_iterations == 0 {
                    return Err(MeshError::invalid_param(
                        "max_iterations",
                        max_iterations,
                        "must be at least 1",
                    ));
                }
                Ok(())
            }
            TutteSolver::Direct {
                tolerance,
                max_iterations,
            } => {
                if !(tolerance.is_finite() && tolerance > 0.0) {
                    return Err(MeshError::invalid_param(
                        "tolerance",
                        tolerance,
                        "must be positive and finite",
                    ));
                }
                if max_iterations == 0 {
                    return Err(MeshError::invalid_param(
                        "max_iterations",
                        max_iterations,
                        "must be at least 1",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Narrow a tolerance to `f32` without letting a positive value underflow to zero.
fn relaxation_tolerance(tolerance: f64) -> f32 {
    if tolerance > 0.0 {
        tolerance.max(f64::from(f32::MIN_POSITIVE)) as f32
    } else {
        tolerance as f32
    }
}

/// Solver statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveStats {
    /// Relaxation rounds, or conjugate gradient iterations summed over u and v.
    pub iterations: usize,

    /// Largest distance, per coordinate, between an interior vertex and the
    /// average of its neighbours after the solve. Zero at the exact fixed point.
    pub residual: f32,
}

/// A boundary-first relabeled mesh together with its UV coordinates.
#[derive(Debug, Clone)]
pub struct Parameterization<I: MeshIndex = u32> {
    /// The relabeled mesh; `uv` is indexed by its vertex ids.
    pub mesh: TriangleMesh<I>,
    /// One coordinate per vertex of `mesh`, inside the unit square.
    pub uv: UVMap<I>,
    /// Mapping from the input mesh's vertex ids to `mesh`'s.
    pub relabeling: Relabeling<I>,
    /// Solver statistics.
    pub stats: SolveStats,
}

/// Compute the Tutte parameterization of a disk-like mesh.
///
/// `topology` and `boundary` must have been derived from `mesh`. The input is
/// not modified; the relabeled mesh is returned in the [`Parameterization`].
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] for invalid solver options, or when
///   `topology` or `boundary` does not match the size of `mesh`
/// - [`MeshError::ConvergenceFailed`] if the direct solver does not converge
///
/// # Example
///
/// ```
/// use meshfold::prelude::*;
/// use meshfold::algo::parameterize::{tutte, TutteOptions};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: TriangleMesh = TriangleMesh::from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
/// let topology = HalfEdgeTopology::build(&mesh);
/// let boundary = BoundaryLoop::extract(&topology).unwrap();
///
/// let result = tutte(&mesh, &topology, &boundary, &TutteOptions::default()).unwrap();
/// assert_eq!(result.uv.len(), 4);
/// assert_eq!(result.stats.iterations, 0);
/// ```
pub fn tutte<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    topology: &HalfEdgeTopology<I>,
    boundary: &BoundaryLoop<I>,
    options: &TutteOptions,
) -> Result<Parameterization<I>> {
    tutte_with_progress(mesh, topology, boundary, options, &Progress::none())
}

/// Tutte parameterization with progress reporting.
pub fn tutte_with_progress<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    topology: &HalfEdgeTopology<I>,
    boundary: &BoundaryLoop<I>,
    options: &TutteOptions,
    progress: &Progress,
) -> Result<Parameterization<I>> {
    options.validate()?;
    check_derived_from(mesh, topology, boundary)?;

    let relabeling = Relabeling::boundary_first(topology, boundary);
    let num_boundary = relabeling.num_boundary();
    log::info!(
        "relabelling vertices: {} boundary, {} interior, {} dropped",
        num_boundary,
        relabeling.num_interior(),
        relabeling.num_original() - relabeling.len()
    );
    let relabeled = relabeling.apply_to_mesh(mesh);

    // One-ring of every interior vertex, in new ids
    let rings: Vec<Vec<usize>> = (num_boundary..relabeling.len())
        .map(|new| {
            let old = relabeling.old_id(VertexId::new(new));
            topology
                .vertex_neighbors(old)
                .filter_map(|w| relabeling.new_id(w))
                .map(|w| w.index())
                .collect()
        })
        .collect();

    let mut uv: Vec<Point2<f32>> = (0..relabeling.len())
        .map(|i| {
            if i < num_boundary {
                square_perimeter(i, num_boundary)
            } else {
                CENTRE
            }
        })
        .collect();

    let iterations = if rings.is_empty() {
        0
    } else {
        match options.solver {
            TutteSolver::FixedIterations(rounds) => {
                relax(&mut uv, &rings, num_boundary, rounds, None, options.parallel, progress)
            }
            TutteSolver::Converge {
                tolerance,
                max_iterations,
            } => relax(
                &mut uv,
                &rings,
                num_boundary,
                max_iterations,
                Some(tolerance),
                options.parallel,
                progress,
            ),
            TutteSolver::Direct {
                tolerance,
                max_iterations,
            } => solve_direct(&mut uv, &rings, num_boundary, tolerance, max_iterations)?,
        }
    };

    let residual = fixed_point_residual(&uv, &rings, num_boundary);
    log::info!(
        "Tutte solve finished after {} iterations, residual {:e}",
        iterations,
        residual
    );

    Ok(Parameterization {
        mesh: relabeled,
        uv: UVMap::new(uv),
        relabeling,
        stats: SolveStats {
            iterations,
            residual,
        },
    })
}

/// Fail unless `topology` and `boundary` have the sizes of `mesh`.
fn check_derived_from<I: MeshIndex>(
    mesh: &TriangleMesh<I>,
    topology: &HalfEdgeTopology<I>,
    boundary: &BoundaryLoop<I>,
) -> Result<()> {
    if topology.num_vertices() != mesh.num_vertices() {
        return Err(MeshError::invalid_param(
            "topology",
            topology.num_vertices(),
            "vertex count differs from the mesh",
        ));
    }
    if topology.num_directed_edges() != mesh.num_directed_edges() {
        return Err(MeshError::invalid_param(
            "topology",
            topology.num_directed_edges(),
            "directed edge count differs from the mesh",
        ));
    }

    let vertices_fit = boundary
        .vertices()
        .iter()
        .all(|v| v.index() < mesh.num_vertices());
    let edges_fit = boundary
        .edges()
        .iter()
        .all(|e| e.index() < mesh.num_directed_edges());
    if !(vertices_fit && edges_fit) {
        return Err(MeshError::invalid_param(
            "boundary",
            boundary.len(),
            "references elements outside the mesh",
        ));
    }
    Ok(())
}

/// Position of boundary vertex `i` of `count` on the unit square perimeter.
///
/// The parameter `t = 4 i / count` runs counter-clockwise from the origin:
/// bottom edge, right edge, top edge, left edge.
pub fn square_perimeter(i: usize, count: usize) -> Point2<f32> {
    let t = 4.0 * i as f32 / count as f32;

    if t < 1.0 {
        Point2::new(t, 0.0)
    } else if t < 2.0 {
        Point2::new(1.0, t - 1.0)
    } else if t < 3.0 {
        Point2::new(1.0 - (t - 2.0), 1.0)
    } else {
        Point2::new(0.0, 1.0 - (t - 3.0))
    }
}

/// Unweighted average of the coordinates of `ring`.
#[inline]
fn ring_average(uv: &[Point2<f32>], ring: &[usize]) -> Option<Point2<f32>> {
    if ring.is_empty() {
        return None;
    }
    let sum = ring
        .iter()
        .fold(nalgebra::Vector2::zeros(), |acc, &j| acc + uv[j].coords);
    Some(Point2::from(sum / ring.len() as f32))
}

/// Run relaxation rounds; returns the number of rounds performed.
///
/// Stops early once a round moves no coordinate by `tolerance` or more.
fn relax(
    uv: &mut Vec<Point2<f32>>,
    rings: &[Vec<usize>],
    num_boundary: usize,
    max_rounds: usize,
    tolerance: Option<f32>,
    parallel: bool,
    progress: &Progress,
) -> usize {
    let mut next = uv.clone();
    let mut last_delta = f32::INFINITY;

    for round in 0..max_rounds {
        if round % PROGRESS_INTERVAL == 0 {
            progress.report(round, max_rounds, "Tutte relaxation");
        }

        last_delta = jacobi_round(uv, &mut next, rings, num_boundary, parallel);
        std::mem::swap(uv, &mut next);

        if let Some(tolerance) = tolerance {
            if last_delta < tolerance {
                log::debug!("relaxation converged after {} rounds", round + 1);
                progress.report(max_rounds, max_rounds, "Tutte relaxation");
                return round + 1;
            }
        }
    }

    if let Some(tolerance) = tolerance {
        log::warn!(
            "relaxation stopped after {} rounds with change {:e} above tolerance {:e}",
            max_rounds,
            last_delta,
            tolerance
        );
    }
    progress.report(max_rounds, max_rounds, "Tutte relaxation");
    max_rounds
}

/// One synchronous round: every interior vertex moves to the average of its
/// neighbours' coordinates from `current`. Returns the largest change.
fn jacobi_round(
    current: &[Point2<f32>],
    next: &mut [Point2<f32>],
    rings: &[Vec<usize>],
    num_boundary: usize,
    parallel: bool,
) -> f32 {
    let update = |(k, (slot, ring)): (usize, (&mut Point2<f32>, &Vec<usize>))| {
        let old = current[num_boundary + k];
        let new = ring_average(current, ring).unwrap_or(old);
        *slot = new;
        (new - old).amax()
    };

    let interior = &mut next[num_boundary..];
    if parallel {
        interior
            .par_iter_mut()
            .zip(rings.par_iter())
            .enumerate()
            .map(update)
            .reduce(|| 0.0, f32::max)
    } else {
        interior
            .iter_mut()
            .zip(rings.iter())
            .enumerate()
            .map(update)
            .fold(0.0, f32::max)
    }
}

/// Solve the Laplace system for u and v directly; returns total CG iterations.
///
/// Row `k` reads `deg(k) x_k - sum(interior neighbours) = sum(boundary neighbours)`.
fn solve_direct(
    uv: &mut [Point2<f32>],
    rings: &[Vec<usize>],
    num_boundary: usize,
    tolerance: f64,
    max_iterations: usize,
) -> Result<usize> {
    let n = rings.len();
    let mut triplets = Vec::with_capacity(rings.iter().map(|r| r.len() + 1).sum());
    let mut rhs_u = DVector::zeros(n);
    let mut rhs_v = DVector::zeros(n);

    for (k, ring) in rings.iter().enumerate() {
        if ring.is_empty() {
            // Pin to the centre
            triplets.push((k, k, 1.0));
            rhs_u[k] = f64::from(CENTRE.x);
            rhs_v[k] = f64::from(CENTRE.y);
            continue;
        }

        triplets.push((k, k, ring.len() as f64));
        for &j in ring {
            if j >= num_boundary {
                triplets.push((k, j - num_boundary, -1.0));
            } else {
                rhs_u[k] += f64::from(uv[j].x);
                rhs_v[k] += f64::from(uv[j].y);
            }
        }
    }

    let matrix = CsrMatrix::from_triplets(n, n, triplets);
    let initial = DVector::from_element(n, 0.5);
    let u = conjugate_gradient(&matrix, &rhs_u, Some(&initial), max_iterations, tolerance)?;
    let v = conjugate_gradient(&matrix, &rhs_v, Some(&initial), max_iterations, tolerance)?;

    for k in 0..n {
        uv[num_boundary + k] = Point2::new(u.x[k] as f32, v.x[k] as f32);
    }

    Ok(u.iterations + v.iterations)
}

/// Largest per-coordinate gap between an interior vertex and its ring average.
fn fixed_point_residual(uv: &[Point2<f32>], rings: &[Vec<usize>], num_boundary: usize) -> f32 {
    rings
        .iter()
        .enumerate()
        .filter_map(|(k, ring)| {
            let avg = ring_average(uv, ring)?;
            Some((avg - uv[num_boundary + k]).amax())
        })
        .fold(0.0, f32::max)
}
