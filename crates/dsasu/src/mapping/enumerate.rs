//! Candidate images of one site: every operation, every lattice shift that can
//! reach the covering sphere, filtered by the buffered asymmetric unit.

use std::ops::RangeInclusive;

use nalgebra::Vector3;

use super::types::{AsuMapping, Sphere};
use crate::asu::AsymmetricUnit;
use crate::cfg::SHIFT_SLACK;
use crate::space_group::SpaceGroup;

/// Read-only view over the inputs shared by all sites of one catalogue.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SymmetryImageEnumerator<'a> {
    space_group: &'a SpaceGroup,
    asu_buffer: &'a AsymmetricUnit,
    center_frac: Vector3<f64>,
    extent_frac: Vector3<f64>,
}

impl<'a> SymmetryImageEnumerator<'a> {
    pub(crate) fn new(
        space_group: &'a SpaceGroup,
        asu_buffer: &'a AsymmetricUnit,
        sphere: &Sphere,
    ) -> Self {
        let cell = asu_buffer.unit_cell();
        let extent_frac =
            cell.reciprocal_lengths() * sphere.radius + Vector3::repeat(SHIFT_SLACK);
        Self {
            space_group,
            asu_buffer,
            center_frac: cell.fractionalize(&sphere.center),
            extent_frac,
        }
    }

    /// Integer shifts per axis that can move `equiv` into the covering sphere.
    ///
    /// Along fractional axis `i` the sphere spans `center_i ± r·|a*_i|`; shifts
    /// outside that window cannot land in the sphere, hence not in the region.
    pub(crate) fn shift_window(&self, equiv: &Vector3<f64>) -> [RangeInclusive<i32>; 3] {
        std::array::from_fn(|i| {
            let lo = (self.center_frac[i] - self.extent_frac[i] - equiv[i]).ceil() as i32;
            let hi = (self.center_frac[i] + self.extent_frac[i] - equiv[i]).floor() as i32;
            lo..=hi
        })
    }

    /// All images inside the buffered region, before deduplication.
    ///
    /// Order: operations in table order, then shifts lexicographic ascending
    /// in `(u0, u1, u2)`.
    pub(crate) fn candidates(&self, original_site: &Vector3<f64>) -> Vec<AsuMapping> {
        let cell = self.asu_buffer.unit_cell();
        let mut out = Vec::with_capacity(self.space_group.order_z());
        for (i_sym_op, op) in self.space_group.ops().iter().enumerate() {
            let equiv = op.apply(original_site);
            let [r0, r1, r2] = self.shift_window(&equiv);
            for u0 in r0 {
                for u1 in r1.clone() {
                    for u2 in r2.clone() {
                        let shifts = Vector3::new(u0, u1, u2);
                        let site = equiv + shifts.map(|u| u as f64);
                        if self.asu_buffer.is_inside(&site) {
                            out.push(AsuMapping::new(i_sym_op, shifts, cell.orthogonalize(&site)));
                        }
                    }
                }
            }
        }
        out
    }
}

/// Drop every image closer than `eps` (cartesian) to an earlier kept image.
///
/// The first image in enumeration order wins, so on special positions the
/// lowest operation index (then the first shift) is the one reported.
pub(crate) fn dedup_first_wins(candidates: Vec<AsuMapping>, eps: f64) -> Vec<AsuMapping> {
    let mut kept: Vec<AsuMapping> = Vec::with_capacity(candidates.len());
    for m in candidates {
        let coincident = kept
            .iter()
            .any(|k| (k.mapped_site() - m.mapped_site()).norm() < eps);
        if !coincident {
            kept.push(m);
        }
    }
    kept
}
