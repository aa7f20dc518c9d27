//! Cut planes: closed half-spaces `n·x + c >= 0` in fractional coordinates.

use nalgebra::Vector3;

use crate::cell::UnitCell;
use crate::error::AsuError;

/// Closed half-space `n · x + c >= 0` (fractional `x`).
///
/// Invariants:
/// - `n` is non-zero and finite; it is not normalized.
/// - Membership at epsilon `e` is `n·x + c >= -e`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSpace {
    n: Vector3<f64>,
    c: f64,
}

impl HalfSpace {
    pub fn new(n: Vector3<f64>, c: f64) -> Result<Self, AsuError> {
        check_normal(&n)?;
        check_offset(c)?;
        Ok(Self { n, c })
    }

    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.n
    }
    #[inline]
    pub fn offset(&self) -> f64 {
        self.c
    }
    pub fn set_normal(&mut self, n: Vector3<f64>) -> Result<(), AsuError> {
        check_normal(&n)?;
        self.n = n;
        Ok(())
    }
    pub fn set_offset(&mut self, c: f64) -> Result<(), AsuError> {
        check_offset(c)?;
        self.c = c;
        Ok(())
    }

    /// Signed value `n·p + c` in fractional units.
    #[inline]
    pub fn evaluate(&self, p: &Vector3<f64>) -> f64 {
        self.n.dot(p) + self.c
    }
    /// Inside at epsilon 0; boundary points count as inside.
    #[inline]
    pub fn is_inside(&self, p: &Vector3<f64>) -> bool {
        self.is_inside_eps(p, 0.0)
    }
    #[inline]
    pub fn is_inside_eps(&self, p: &Vector3<f64>, eps: f64) -> bool {
        self.evaluate(p) >= -eps
    }

    /// A point on the plane: the first axis with a non-zero normal component
    /// carries `-c / n_i`, the others are zero.
    pub fn get_point_in_plane(&self) -> Result<Vector3<f64>, AsuError> {
        let axis = (0..3)
            .find(|&i| self.n[i] != 0.0)
            .ok_or_else(|| AsuError::degenerate("cut plane has a zero normal"))?;
        let mut p = Vector3::zeros();
        p[axis] = -self.c / self.n[axis];
        Ok(p)
    }

    /// Move the plane outward by `thickness` cartesian units.
    ///
    /// The cartesian distance of a fractional point to the plane is
    /// `(n·x + c) / sqrt(nᵀ G* n)`, so the offset grows by `thickness` times
    /// that norm. Negative thickness shrinks the half-space.
    pub fn add_buffer(&mut self, unit_cell: &UnitCell, thickness: f64) {
        self.c += thickness * unit_cell.plane_normal_length(&self.n);
    }

    /// Copy whose inside test at epsilon 0 matches this one's at `eps`.
    pub(crate) fn relaxed(&self, eps: f64) -> Self {
        Self {
            n: self.n,
            c: self.c + eps,
        }
    }

    /// Buffered copy; see [`HalfSpace::add_buffer`].
    pub fn buffered(&self, unit_cell: &UnitCell, thickness: f64) -> Self {
        let mut out = *self;
        out.add_buffer(unit_cell, thickness);
        out
    }
}

fn check_offset(c: f64) -> Result<(), AsuError> {
    if !c.is_finite() {
        return Err(AsuError::config("cut plane offset must be finite"));
    }
    Ok(())
}

fn check_normal(n: &Vector3<f64>) -> Result<(), AsuError> {
    if !n.iter().all(|v| v.is_finite()) {
        return Err(AsuError::config("cut plane normal must be finite"));
    }
    if n.iter().all(|&v| v == 0.0) {
        return Err(AsuError::config("cut plane normal must be non-zero"));
    }
    Ok(())
}
