//! Tolerance defaults and structural limits (internal).
//!
//! Policy
//! - Defaults are fixed constants to avoid “tolerance juggling” at call sites.
//!   The ASU inside-epsilon and the sym-equiv epsilon are the only tolerances
//!   callers choose themselves.

/// Relative determinant threshold below which a facet triple is treated as singular.
/// Scaled by the product of the three normal lengths.
pub(crate) const DET_EPS: f64 = 1e-12;
/// Angular tolerance when testing facet normals against a candidate unbounded direction.
pub(crate) const RAY_EPS: f64 = 1e-9;
/// Inside-epsilon used when collecting vertices for the cached bounding box.
pub(crate) const BOX_VERTEX_EPS: f64 = 1e-6;
/// Smallest cartesian distance from the vertex centroid to every facet for a
/// region to count as having volume.
pub(crate) const MIN_THICKNESS: f64 = 1e-6;
/// Fractional slack added to each side of the unit-shift search window.
pub(crate) const SHIFT_SLACK: f64 = 1e-6;
/// Default minimum cartesian distance between two distinct symmetry images.
pub const DEFAULT_SYM_EQUIV_EPS: f64 = 1e-6;
/// A bounded region in 3D needs at least four cut planes.
pub(crate) const MIN_FACETS: usize = 4;
/// Upper bound on the facet count of a single ASU.
pub(crate) const MAX_FACETS: usize = 12;
/// Tolerance for identity / orthogonality checks on operation tables.
pub(crate) const OP_EPS: f64 = 1e-9;
