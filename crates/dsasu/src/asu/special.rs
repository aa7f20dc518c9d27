//! Canned asymmetric units used in tests, benchmarks, and the CLI.

use nalgebra::Vector3;

use super::plane::HalfSpace;
use super::region::AsymmetricUnit;
use crate::cell::UnitCell;
use crate::error::AsuError;

/// Slab `lo <= x_axis <= hi` as two facets (lower face first).
fn slab(axis: usize, lo: f64, hi: f64) -> Result<[HalfSpace; 2], AsuError> {
    let mut n = Vector3::zeros();
    n[axis] = 1.0;
    Ok([HalfSpace::new(n, -lo)?, HalfSpace::new(-n, hi)?])
}

fn box_asu(unit_cell: UnitCell, hi: [f64; 3]) -> Result<AsymmetricUnit, AsuError> {
    let mut facets = Vec::with_capacity(6);
    for (axis, &h) in hi.iter().enumerate() {
        facets.extend(slab(axis, 0.0, h)?);
    }
    AsymmetricUnit::new(unit_cell, facets, 0.0)
}

/// The whole unit cell `0 <= x,y,z <= 1` (the P1 asymmetric unit).
///
/// Facet order: x >= 0, x <= 1, y >= 0, y <= 1, z >= 0, z <= 1.
pub fn unit_cell_box(unit_cell: UnitCell) -> Result<AsymmetricUnit, AsuError> {
    box_asu(unit_cell, [1.0, 1.0, 1.0])
}

/// Half cell `0 <= x <= 1/2, 0 <= y,z <= 1`.
///
/// A valid asymmetric unit for P-1 and for P2 / P2₁ with unique axis b.
pub fn half_cell_x(unit_cell: UnitCell) -> Result<AsymmetricUnit, AsuError> {
    box_asu(unit_cell, [0.5, 1.0, 1.0])
}
