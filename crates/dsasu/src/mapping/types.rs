//! Value types produced by the catalogue.

use nalgebra::Vector3;

/// One symmetry image of an original site inside the buffered asymmetric unit.
///
/// `mapped_site = orthogonalize(op[i_sym_op](original) + unit_shifts)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsuMapping {
    i_sym_op: usize,
    unit_shifts: Vector3<i32>,
    mapped_site: Vector3<f64>,
}

impl AsuMapping {
    #[inline]
    pub(crate) fn new(i_sym_op: usize, unit_shifts: Vector3<i32>, mapped_site: Vector3<f64>) -> Self {
        Self {
            i_sym_op,
            unit_shifts,
            mapped_site,
        }
    }
    /// Index into the space-group operation table.
    #[inline]
    pub fn i_sym_op(&self) -> usize {
        self.i_sym_op
    }
    #[inline]
    pub fn unit_shifts(&self) -> &Vector3<i32> {
        &self.unit_shifts
    }
    /// Cartesian coordinates of the image.
    #[inline]
    pub fn mapped_site(&self) -> &Vector3<f64> {
        &self.mapped_site
    }
}

/// Sphere in cartesian space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl Sphere {
    /// Smallest sphere around the axis-aligned box: centred on the box,
    /// radius reaching the corners.
    pub fn covering_box(box_min: &Vector3<f64>, box_max: &Vector3<f64>) -> Self {
        Self {
            center: (box_min + box_max) * 0.5,
            radius: (box_max - box_min).norm() * 0.5,
        }
    }

    #[inline]
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        (p - self.center).norm() <= self.radius
    }
}
