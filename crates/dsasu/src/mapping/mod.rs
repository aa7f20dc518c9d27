//! Per-site symmetry images inside a buffered asymmetric unit.
//!
//! Purpose
//! - `AsuMappings` owns the operation table, the caller's ASU and a buffered
//!   copy, and appends one ordered list of `AsuMapping`s per processed site.
//! - The enumerator walks operations in table order and, for each, the lattice
//!   shifts allowed by the covering sphere of the buffered ASU.
//!
//! Ordering and deduplication
//! - Images are emitted operation-major, shifts lexicographic ascending.
//! - Images closer than `sym_equiv_epsilon` (cartesian) to an earlier image are
//!   dropped, so the earliest (operation, shift) pair represents a special
//!   position.
//! - Periodic images on the far face of a closed region are genuine images and
//!   are reported (a site at x = 0 of a unit-cell box also maps to x = 1).

mod catalogue;
mod enumerate;
mod types;

pub use catalogue::AsuMappings;
pub use types::{AsuMapping, Sphere};
