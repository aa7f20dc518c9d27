//! Unit cell: parameters, metric, and fractional/cartesian conversion.
//!
//! Orthogonalization follows the usual crystallographic convention: `a` along
//! the cartesian x axis, `b` in the xy plane, `c` completing a right-handed
//! frame. Columns of `orthogonalization` are the direct basis vectors.

use nalgebra::{Matrix3, Vector3};

use crate::error::AsuError;

/// Unit cell described by `(a, b, c, alpha, beta, gamma)`, angles in degrees.
///
/// Invariants:
/// - Lengths are positive and finite; angles lie strictly in (0°, 180°) and
///   describe a cell with positive volume.
/// - `fractionalization` is the inverse of `orthogonalization`.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitCell {
    parameters: [f64; 6],
    orthogonalization: Matrix3<f64>,
    fractionalization: Matrix3<f64>,
    metric: Matrix3<f64>,
    reciprocal_metric: Matrix3<f64>,
    volume: f64,
}

impl UnitCell {
    pub fn new(parameters: [f64; 6]) -> Result<Self, AsuError> {
        let [a, b, c, alpha, beta, gamma] = parameters;
        if !parameters.iter().all(|p| p.is_finite()) {
            return Err(AsuError::config("unit cell parameters must be finite"));
        }
        if a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return Err(AsuError::config(format!(
                "unit cell lengths must be positive, got ({a}, {b}, {c})"
            )));
        }
        for angle in [alpha, beta, gamma] {
            if angle <= 0.0 || angle >= 180.0 {
                return Err(AsuError::config(format!(
                    "unit cell angle {angle} outside (0, 180)"
                )));
            }
        }
        let (ca, cb, cg) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sg = gamma.to_radians().sin();
        let d = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        if d <= 0.0 {
            return Err(AsuError::config(format!(
                "unit cell angles ({alpha}, {beta}, {gamma}) do not form a cell"
            )));
        }
        let volume = a * b * c * d.sqrt();
        #[rustfmt::skip]
        let orthogonalization = Matrix3::new(
            a,   b * cg, c * cb,
            0.0, b * sg, c * (ca - cb * cg) / sg,
            0.0, 0.0,    volume / (a * b * sg),
        );
        let fractionalization = orthogonalization
            .try_inverse()
            .ok_or_else(|| AsuError::config("orthogonalization matrix is singular"))?;
        let metric = orthogonalization.transpose() * orthogonalization;
        let reciprocal_metric = fractionalization * fractionalization.transpose();
        Ok(Self {
            parameters,
            orthogonalization,
            fractionalization,
            metric,
            reciprocal_metric,
            volume,
        })
    }

    /// Cubic cell with edge `a`.
    pub fn cubic(a: f64) -> Result<Self, AsuError> {
        Self::new([a, a, a, 90.0, 90.0, 90.0])
    }

    #[inline]
    pub fn parameters(&self) -> [f64; 6] {
        self.parameters
    }
    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }
    #[inline]
    pub fn orthogonalization_matrix(&self) -> &Matrix3<f64> {
        &self.orthogonalization
    }
    #[inline]
    pub fn fractionalization_matrix(&self) -> &Matrix3<f64> {
        &self.fractionalization
    }
    /// Direct metric `G = Oᵀ O`.
    #[inline]
    pub fn metric(&self) -> &Matrix3<f64> {
        &self.metric
    }
    /// Reciprocal metric `G* = F Fᵀ = G⁻¹`.
    #[inline]
    pub fn reciprocal_metric(&self) -> &Matrix3<f64> {
        &self.reciprocal_metric
    }

    #[inline]
    pub fn orthogonalize(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.orthogonalization * frac
    }
    #[inline]
    pub fn fractionalize(&self, cart: &Vector3<f64>) -> Vector3<f64> {
        self.fractionalization * cart
    }

    /// Lengths `|a*|, |b*|, |c*|` of the reciprocal basis (no 2π factor).
    ///
    /// A cartesian ball of radius `r` spans at most `r·|a*_i|` along fractional axis `i`.
    pub fn reciprocal_lengths(&self) -> Vector3<f64> {
        Vector3::new(
            self.reciprocal_metric[(0, 0)].sqrt(),
            self.reciprocal_metric[(1, 1)].sqrt(),
            self.reciprocal_metric[(2, 2)].sqrt(),
        )
    }

    /// Cartesian length of the gradient of `x ↦ n·x` (fractional `n`), i.e. `sqrt(nᵀ G* n)`.
    ///
    /// Dividing `n·x + c` by this value gives the cartesian signed distance to the plane.
    pub fn plane_normal_length(&self, n: &Vector3<f64>) -> f64 {
        n.dot(&(self.reciprocal_metric * n)).max(0.0).sqrt()
    }

    /// Cartesian distance between two fractional points (no lattice wrapping).
    pub fn distance(&self, f1: &Vector3<f64>, f2: &Vector3<f64>) -> f64 {
        self.orthogonalize(&(f1 - f2)).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn cubic_roundtrip_and_metric() {
        let cell = UnitCell::cubic(10.0).unwrap();
        let x = cell.orthogonalize(&vector![0.5, 0.25, 0.1]);
        assert!((x - vector![5.0, 2.5, 1.0]).norm() < 1e-12);
        assert!((cell.volume() - 1000.0).abs() < 1e-9);
        assert!((cell.metric() - Matrix3::identity() * 100.0).amax() < 1e-9);
        let rl = cell.reciprocal_lengths();
        assert!((rl - vector![0.1, 0.1, 0.1]).norm() < 1e-12);
    }

    #[test]
    fn hexagonal_conversion_is_inverse() {
        let cell = UnitCell::new([10.0, 10.0, 15.0, 90.0, 90.0, 120.0]).unwrap();
        let f = vector![0.3, -0.7, 1.2];
        let back = cell.fractionalize(&cell.orthogonalize(&f));
        assert!((back - f).norm() < 1e-12);
        // b sits at 120° from a in the xy plane.
        let b = cell.orthogonalize(&vector![0.0, 1.0, 0.0]);
        assert!((b.x + 5.0).abs() < 1e-9);
        assert!((b.norm() - 10.0).abs() < 1e-9);
        assert!((cell.metric() * cell.reciprocal_metric() - Matrix3::identity()).amax() < 1e-9);
    }

    #[test]
    fn rejects_impossible_cells() {
        assert!(UnitCell::new([0.0, 1.0, 1.0, 90.0, 90.0, 90.0]).is_err());
        assert!(UnitCell::new([1.0, 1.0, 1.0, 90.0, 180.0, 90.0]).is_err());
        // alpha + beta < gamma cannot close.
        assert!(UnitCell::new([1.0, 1.0, 1.0, 30.0, 30.0, 120.0]).is_err());
        assert!(UnitCell::new([1.0, f64::NAN, 1.0, 90.0, 90.0, 90.0]).is_err());
    }
}
