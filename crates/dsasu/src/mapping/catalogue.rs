//! Append-only catalogue of per-site symmetry images.

use nalgebra::Vector3;
use rayon::prelude::*;

use super::enumerate::{dedup_first_wins, SymmetryImageEnumerator};
use super::types::{AsuMapping, Sphere};
use crate::asu::AsymmetricUnit;
use crate::cell::UnitCell;
use crate::cfg::DEFAULT_SYM_EQUIV_EPS;
use crate::error::AsuError;
use crate::space_group::{SpaceGroup, SymOp};

/// Symmetry images of processed sites inside a buffered asymmetric unit.
///
/// Invariants:
/// - `asu` is the caller's unbuffered region; `asu_buffer` is a private copy
///   expanded by `buffer_thickness` and always has volume. Neither changes
///   after construction.
/// - `mappings[i_seq]` belongs to the `i_seq`-th processed site. Entries are
///   only appended.
#[derive(Clone, Debug)]
pub struct AsuMappings {
    space_group: SpaceGroup,
    asu: AsymmetricUnit,
    asu_buffer: AsymmetricUnit,
    buffer_thickness: f64,
    sym_equiv_epsilon: f64,
    buffer_covering_sphere: Sphere,
    mappings: Vec<Vec<AsuMapping>>,
}

impl AsuMappings {
    pub fn new(
        space_group: SpaceGroup,
        asu: AsymmetricUnit,
        buffer_thickness: f64,
        sym_equiv_epsilon: f64,
    ) -> Result<Self, AsuError> {
        if !buffer_thickness.is_finite() || buffer_thickness < 0.0 {
            return Err(AsuError::config(format!(
                "buffer thickness must be finite and non-negative, got {buffer_thickness}"
            )));
        }
        if !sym_equiv_epsilon.is_finite() || sym_equiv_epsilon < 0.0 {
            return Err(AsuError::config(format!(
                "sym-equiv epsilon must be finite and non-negative, got {sym_equiv_epsilon}"
            )));
        }
        let asu_buffer = asu.add_buffer(buffer_thickness)?;
        if asu_buffer.is_degenerate() {
            return Err(AsuError::config(format!(
                "asymmetric unit has no volume (thickness {:e}) and buffer {buffer_thickness} does not give it one",
                asu.thickness()
            )));
        }
        let buffer_covering_sphere = Sphere::covering_box(asu_buffer.box_min(), asu_buffer.box_max());
        tracing::debug!(
            order_z = space_group.order_z(),
            buffer_thickness,
            radius = buffer_covering_sphere.radius,
            "asu mappings initialised"
        );
        Ok(Self {
            space_group,
            asu,
            asu_buffer,
            buffer_thickness,
            sym_equiv_epsilon,
            buffer_covering_sphere,
            mappings: Vec::new(),
        })
    }

    /// Same as [`AsuMappings::new`] with [`DEFAULT_SYM_EQUIV_EPS`].
    pub fn with_default_epsilon(
        space_group: SpaceGroup,
        asu: AsymmetricUnit,
        buffer_thickness: f64,
    ) -> Result<Self, AsuError> {
        Self::new(space_group, asu, buffer_thickness, DEFAULT_SYM_EQUIV_EPS)
    }

    /// Capacity hint for the expected total number of sites.
    pub fn reserve(&mut self, n_sites_final: usize) {
        self.mappings
            .reserve(n_sites_final.saturating_sub(self.mappings.len()));
    }

    /// Map one fractional site and append its images as a new entry.
    ///
    /// An empty entry is valid: no image reached the buffered region.
    pub fn process(&mut self, original_site: &Vector3<f64>) {
        let site_mappings = self.map_site(&self.enumerator(), original_site);
        self.mappings.push(site_mappings);
    }

    /// `process` for each site, in order.
    pub fn process_sites(&mut self, sites: &[Vector3<f64>]) {
        self.reserve(self.mappings.len() + sites.len());
        for site in sites {
            self.process(site);
        }
    }

    /// Parallel `process_sites`; entries are appended in input order.
    pub fn process_sites_par(&mut self, sites: &[Vector3<f64>]) {
        let per_site: Vec<Vec<AsuMapping>> = {
            let enumerator = self.enumerator();
            sites
                .par_iter()
                .map(|site| self.map_site(&enumerator, site))
                .collect()
        };
        self.mappings.extend(per_site);
    }

    fn enumerator(&self) -> SymmetryImageEnumerator<'_> {
        SymmetryImageEnumerator::new(
            &self.space_group,
            &self.asu_buffer,
            &self.buffer_covering_sphere,
        )
    }

    fn map_site(
        &self,
        enumerator: &SymmetryImageEnumerator<'_>,
        original_site: &Vector3<f64>,
    ) -> Vec<AsuMapping> {
        if !original_site.iter().all(|v| v.is_finite()) {
            tracing::warn!(site = ?original_site, "non-finite site has no symmetry images");
            return Vec::new();
        }
        let candidates = enumerator.candidates(original_site);
        let n_candidates = candidates.len();
        let kept = dedup_first_wins(candidates, self.sym_equiv_epsilon);
        if kept.is_empty() {
            tracing::warn!(
                site = ?original_site,
                buffer_thickness = self.buffer_thickness,
                "no symmetry image inside the buffered asymmetric unit"
            );
        } else {
            tracing::trace!(n_candidates, n_kept = kept.len(), "site processed");
        }
        kept
    }

    /// One entry per processed site, in call order.
    #[inline]
    pub fn mappings(&self) -> &[Vec<AsuMapping>] {
        &self.mappings
    }
    pub fn site_mappings(&self, i_seq: usize) -> Option<&[AsuMapping]> {
        self.mappings.get(i_seq).map(Vec::as_slice)
    }
    #[inline]
    pub fn n_sites(&self) -> usize {
        self.mappings.len()
    }

    /// Operator (including unit shifts) that takes site `i_seq` to its image `i_sym`.
    pub fn rt_mx(&self, i_seq: usize, i_sym: usize) -> Option<SymOp> {
        let m = self.mappings.get(i_seq)?.get(i_sym)?;
        let op = self.space_group.op(m.i_sym_op())?;
        Some(op.with_shifts(m.unit_shifts()))
    }

    #[inline]
    pub fn space_group(&self) -> &SpaceGroup {
        &self.space_group
    }
    /// The unbuffered region passed to the constructor.
    #[inline]
    pub fn asu(&self) -> &AsymmetricUnit {
        &self.asu
    }
    #[inline]
    pub fn asu_buffer(&self) -> &AsymmetricUnit {
        &self.asu_buffer
    }
    #[inline]
    pub fn unit_cell(&self) -> &UnitCell {
        self.asu.unit_cell()
    }
    #[inline]
    pub fn buffer_thickness(&self) -> f64 {
        self.buffer_thickness
    }
    #[inline]
    pub fn sym_equiv_epsilon(&self) -> f64 {
        self.sym_equiv_epsilon
    }
    #[inline]
    pub fn buffer_covering_sphere(&self) -> &Sphere {
        &self.buffer_covering_sphere
    }
}
