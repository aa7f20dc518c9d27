//! Direct-space asymmetric units and per-site symmetry mappings.
//!
//! Purpose
//! - Describe an asymmetric unit (ASU) as an intersection of cut planes in
//!   fractional coordinates, with vertex enumeration and a cached cartesian
//!   bounding box.
//! - For every input site, find all space-group images (operation plus lattice
//!   translation) that land inside a buffered copy of the ASU, and keep them in
//!   an append-only catalogue indexed by site.
//!
//! Conventions
//! - Cut planes are `n·x + c >= 0` in fractional coordinates (inside is the
//!   non-negative side). Boundary points are inside at epsilon 0.
//! - Tolerances are fixed constants (see `cfg`); the two user-facing epsilons
//!   are the ASU `inside_epsilon` and the catalogue `sym_equiv_epsilon`.
//! - Mapped sites are reported in cartesian coordinates.

pub mod asu;
pub mod cell;
mod cfg;
pub mod error;
pub mod mapping;
pub mod sample;
pub mod space_group;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use asu::{AsymmetricUnit, HalfSpace};
pub use cell::UnitCell;
pub use cfg::DEFAULT_SYM_EQUIV_EPS;
pub use error::AsuError;
pub use mapping::{AsuMapping, AsuMappings, Sphere};
pub use space_group::{SpaceGroup, SymOp};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::asu::{AsymmetricUnit, HalfSpace};
    pub use crate::cell::UnitCell;
    pub use crate::error::AsuError;
    pub use crate::mapping::{AsuMapping, AsuMappings, Sphere};
    pub use crate::space_group::{SpaceGroup, SymOp};
    pub use nalgebra::{Matrix3, Vector3};
}
