//! Asymmetric unit as an intersection of cut planes, with a cached bounding box.

use nalgebra::Vector3;

use super::plane::HalfSpace;
use super::vertices::{fractional_vertices, is_bounded};
use crate::cell::UnitCell;
use crate::cfg::{BOX_VERTEX_EPS, MAX_FACETS, MIN_FACETS, MIN_THICKNESS};
use crate::error::AsuError;

/// Convex region `{x : n_i·x + c_i >= -inside_epsilon for all facets}`.
///
/// Invariants:
/// - The facet count is fixed at construction (between 4 and 12).
/// - The facets enclose a bounded, non-empty region. A flat region is
///   accepted here and reported by [`AsymmetricUnit::is_degenerate`].
/// - `box_min`/`box_max` bound, in cartesian coordinates, every point that
///   `is_inside` accepts; they are computed in the constructor. Any change to the
///   facets goes through a new instance (see [`AsymmetricUnit::add_buffer`]).
#[derive(Clone, Debug)]
pub struct AsymmetricUnit {
    unit_cell: UnitCell,
    facets: Vec<HalfSpace>,
    inside_epsilon: f64,
    thickness: f64,
    box_min: Vector3<f64>,
    box_max: Vector3<f64>,
}

impl AsymmetricUnit {
    pub fn new(
        unit_cell: UnitCell,
        facets: Vec<HalfSpace>,
        inside_epsilon: f64,
    ) -> Result<Self, AsuError> {
        if facets.len() < MIN_FACETS || facets.len() > MAX_FACETS {
            return Err(AsuError::config(format!(
                "an asymmetric unit needs {MIN_FACETS}..={MAX_FACETS} facets, got {}",
                facets.len()
            )));
        }
        if !inside_epsilon.is_finite() || inside_epsilon < 0.0 {
            return Err(AsuError::config(format!(
                "inside epsilon must be finite and non-negative, got {inside_epsilon}"
            )));
        }
        if !is_bounded(&facets) {
            return Err(AsuError::config(
                "facet normals do not enclose a bounded region",
            ));
        }
        let verts = fractional_vertices(&facets, BOX_VERTEX_EPS);
        if verts.is_empty() {
            return Err(AsuError::config(
                "facets do not enclose any point (empty asymmetric unit)",
            ));
        }
        let thickness = centroid_thickness(&unit_cell, &facets, &verts);

        // The box bounds everything `is_inside` accepts, not just the exact region.
        let accepted: Vec<HalfSpace> = facets.iter().map(|f| f.relaxed(inside_epsilon)).collect();
        let mut it = fractional_vertices(&accepted, BOX_VERTEX_EPS)
            .into_iter()
            .map(|v| unit_cell.orthogonalize(&v));
        let Some(first) = it.next() else {
            return Err(AsuError::config(
                "facets do not enclose any point (empty asymmetric unit)",
            ));
        };
        let (box_min, box_max) = it.fold((first, first), |(lo, hi), x| (lo.inf(&x), hi.sup(&x)));
        Ok(Self {
            unit_cell,
            facets,
            inside_epsilon,
            thickness,
            box_min,
            box_max,
        })
    }

    #[inline]
    pub fn unit_cell(&self) -> &UnitCell {
        &self.unit_cell
    }
    #[inline]
    pub fn facets(&self) -> &[HalfSpace] {
        &self.facets
    }
    #[inline]
    pub fn inside_epsilon(&self) -> f64 {
        self.inside_epsilon
    }

    /// Cartesian distance from the vertex centroid to the nearest facet.
    ///
    /// Zero (up to rounding) for a flat region such as `x = 1/2`.
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// The region has no interior: every point lies on some facet.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.thickness <= MIN_THICKNESS
    }

    /// Fractional point inside every facet at `inside_epsilon`.
    pub fn is_inside(&self, frac: &Vector3<f64>) -> bool {
        self.facets
            .iter()
            .all(|f| f.is_inside_eps(frac, self.inside_epsilon))
    }

    pub fn is_inside_cart(&self, cart: &Vector3<f64>) -> bool {
        self.is_inside(&self.unit_cell.fractionalize(cart))
    }

    /// Copy with every facet moved outward by `thickness` cartesian units.
    ///
    /// The bounding box is recomputed; fails if a negative thickness empties the region.
    pub fn add_buffer(&self, thickness: f64) -> Result<Self, AsuError> {
        if !thickness.is_finite() {
            return Err(AsuError::config(format!(
                "buffer thickness must be finite, got {thickness}"
            )));
        }
        let facets = self
            .facets
            .iter()
            .map(|f| f.buffered(&self.unit_cell, thickness))
            .collect();
        Self::new(self.unit_cell.clone(), facets, self.inside_epsilon)
    }

    /// Vertices of the region, in lexicographic facet-triple order.
    ///
    /// Singular triples are skipped. Duplicates (more than three facets through
    /// one point) are not removed. Fractional unless `cartesian` is set.
    pub fn volume_vertices(&self, cartesian: bool, epsilon: f64) -> Vec<Vector3<f64>> {
        let verts = fractional_vertices(&self.facets, epsilon);
        if cartesian {
            verts
                .iter()
                .map(|v| self.unit_cell.orthogonalize(v))
                .collect()
        } else {
            verts
        }
    }

    #[inline]
    pub fn box_min(&self) -> &Vector3<f64> {
        &self.box_min
    }
    #[inline]
    pub fn box_max(&self) -> &Vector3<f64> {
        &self.box_max
    }
}

/// Smallest cartesian distance from the mean vertex to a facet.
///
/// The mean of all vertices is interior for a region with volume, and lies on
/// opposite facets at once for a flat one.
fn centroid_thickness(unit_cell: &UnitCell, facets: &[HalfSpace], verts: &[Vector3<f64>]) -> f64 {
    let centroid = verts.iter().sum::<Vector3<f64>>() / verts.len() as f64;
    facets
        .iter()
        .map(|f| f.evaluate(&centroid) / unit_cell.plane_normal_length(f.normal()))
        .fold(f64::INFINITY, f64::min)
}
