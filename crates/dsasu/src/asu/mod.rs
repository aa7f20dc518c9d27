//! Asymmetric units as intersections of cut planes.
//!
//! Purpose
//! - `HalfSpace`: one planar boundary condition `n·x + c >= 0` in fractional
//!   coordinates, with cartesian-correct buffering for oblique cells.
//! - `AsymmetricUnit`: a fixed set of facets, vertex enumeration from facet
//!   triples, and a cartesian bounding box computed at construction.
//!
//! Assumptions and conventions
//! - Facets are plain values owned by their region; buffering produces a new
//!   region instead of mutating one that may already be in use.
//! - Vertex enumeration is O(F³) with F <= 12 and runs once per region.

mod plane;
mod region;
pub mod special;
mod vertices;

pub use plane::HalfSpace;
pub use region::AsymmetricUnit;
pub use special::{half_cell_x, unit_cell_box};
