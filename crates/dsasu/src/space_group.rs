//! Space-group operation table: rotation + translation operators in table order.
//!
//! Only what the mapping code consumes lives here: an ordered, stable list of
//! affine operators acting on fractional coordinates, identity first. Deriving
//! the table from a Hall or Hermann-Mauguin symbol is out of scope; tables are
//! given explicitly, usually as `x,y,z` strings.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::cfg::OP_EPS;
use crate::error::AsuError;

/// Fractional affine operator `x ↦ R x + t` with an integer rotation part.
#[derive(Clone, Debug, PartialEq)]
pub struct SymOp {
    rotation: Matrix3<i32>,
    translation: Vector3<f64>,
    r: Matrix3<f64>,
}

impl SymOp {
    /// Fails unless `det(R) = ±1`.
    pub fn new(rotation: Matrix3<i32>, translation: Vector3<f64>) -> Result<Self, AsuError> {
        let r = rotation.map(|v| v as f64);
        let det = r.determinant();
        if (det.abs() - 1.0).abs() > OP_EPS {
            return Err(AsuError::config(format!(
                "rotation part must have determinant ±1, got {det}"
            )));
        }
        if !translation.iter().all(|t| t.is_finite()) {
            return Err(AsuError::config("translation part must be finite"));
        }
        Ok(Self {
            rotation,
            translation,
            r,
        })
    }

    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
            r: Matrix3::identity(),
        }
    }

    /// Parse `x,y,z` notation, e.g. `-x+1/2, y, -z` or `x-y,x,z+1/6`.
    pub fn from_xyz(text: &str) -> Result<Self, AsuError> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(AsuError::sym_op(
                text,
                format!("expected 3 comma-separated components, got {}", parts.len()),
            ));
        }
        let mut rotation = Matrix3::<i32>::zeros();
        let mut translation = Vector3::zeros();
        for (row, part) in parts.iter().enumerate() {
            let (coeffs, t) = parse_component(part, text)?;
            for (col, c) in coeffs.iter().enumerate() {
                rotation[(row, col)] = *c;
            }
            translation[row] = t;
        }
        Self::new(rotation, translation).map_err(|e| AsuError::sym_op(text, e.to_string()))
    }

    #[inline]
    pub fn rotation(&self) -> &Matrix3<i32> {
        &self.rotation
    }
    #[inline]
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// Apply to a fractional point.
    #[inline]
    pub fn apply(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.r * frac + self.translation
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix3::identity() && self.translation.amax() < OP_EPS
    }

    /// The operator followed by the lattice translation `shifts`.
    pub fn with_shifts(&self, shifts: &Vector3<i32>) -> Self {
        Self {
            rotation: self.rotation,
            translation: self.translation + shifts.map(|s| s as f64),
            r: self.r,
        }
    }

    /// Same rotation and translations equal modulo integer lattice vectors.
    fn is_lattice_equivalent(&self, other: &SymOp) -> bool {
        self.rotation == other.rotation
            && (self.translation - other.translation)
                .iter()
                .all(|d| (d - d.round()).abs() < OP_EPS)
    }
}

fn parse_component(part: &str, whole: &str) -> Result<([i32; 3], f64), AsuError> {
    let s: Vec<char> = part.chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Err(AsuError::sym_op(whole, "empty component"));
    }
    let mut coeffs = [0i32; 3];
    let mut t = 0.0;
    let mut i = 0;
    let mut first = true;
    while i < s.len() {
        let mut sign = 1;
        match s[i] {
            '+' => i += 1,
            '-' => {
                sign = -1;
                i += 1;
            }
            _ if !first => {
                return Err(AsuError::sym_op(
                    whole,
                    format!("missing '+' or '-' before {:?}", s[i]),
                ))
            }
            _ => {}
        }
        first = false;
        let Some(&ch) = s.get(i) else {
            return Err(AsuError::sym_op(whole, "dangling sign"));
        };
        if let Some(axis) = axis_index(ch) {
            coeffs[axis] += sign;
            i += 1;
            continue;
        }
        match ch {
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < s.len() && (s[i].is_ascii_digit() || s[i] == '.' || s[i] == '/') {
                    i += 1;
                }
                let token: String = s[start..i].iter().collect();
                let value = parse_number(&token, whole)?;
                if s.get(i) == Some(&'*') {
                    i += 1;
                }
                match s.get(i).and_then(|c| axis_index(*c)) {
                    Some(axis) => {
                        if value.fract() != 0.0 {
                            return Err(AsuError::sym_op(
                                whole,
                                format!("coefficient {token:?} is not an integer"),
                            ));
                        }
                        coeffs[axis] += sign * value as i32;
                        i += 1;
                    }
                    None if s.get(i - 1) == Some(&'*') => {
                        return Err(AsuError::sym_op(whole, "expected x, y or z after '*'"))
                    }
                    None => t += sign as f64 * value,
                }
            }
            other => {
                return Err(AsuError::sym_op(
                    whole,
                    format!("unexpected character {other:?}"),
                ))
            }
        }
    }
    Ok((coeffs, t))
}

fn axis_index(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        _ => None,
    }
}

fn parse_number(token: &str, whole: &str) -> Result<f64, AsuError> {
    let bad = || AsuError::sym_op(whole, format!("bad number {token:?}"));
    match token.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().map_err(|_| bad())?;
            let den: f64 = den.parse().map_err(|_| bad())?;
            if den == 0.0 {
                return Err(bad());
            }
            Ok(num / den)
        }
        None => token.parse().map_err(|_| bad()),
    }
}

/// Render a translation component as a small fraction when possible.
fn format_translation(t: f64) -> String {
    for den in [1i64, 2, 3, 4, 6, 8, 12] {
        let scaled = t * den as f64;
        if (scaled - scaled.round()).abs() < 1e-9 {
            let num = scaled.round() as i64;
            return if den == 1 {
                format!("{num}")
            } else {
                format!("{num}/{den}")
            };
        }
    }
    format!("{t}")
}

impl fmt::Display for SymOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AXES: [char; 3] = ['x', 'y', 'z'];
        for row in 0..3 {
            if row > 0 {
                write!(f, ",")?;
            }
            let mut term = String::new();
            for (col, axis) in AXES.iter().enumerate() {
                match self.rotation[(row, col)] {
                    0 => {}
                    1 => term.push_str(&format!("+{axis}")),
                    -1 => term.push_str(&format!("-{axis}")),
                    k => term.push_str(&format!("{k:+}*{axis}")),
                }
            }
            let t = self.translation[row];
            if t.abs() >= OP_EPS {
                let s = format_translation(t);
                if s.starts_with('-') {
                    term.push_str(&s);
                } else {
                    term.push('+');
                    term.push_str(&s);
                }
            }
            if term.is_empty() {
                term.push('0');
            }
            write!(f, "{}", term.strip_prefix('+').unwrap_or(term.as_str()))?;
        }
        Ok(())
    }
}

/// Ordered operation table. Index 0 is always the identity.
#[derive(Clone, Debug, PartialEq)]
pub struct SpaceGroup {
    ops: Vec<SymOp>,
}

impl SpaceGroup {
    /// Fails if the table is empty, does not start with the identity, or lists
    /// the same operator twice (modulo lattice translations).
    pub fn new(ops: Vec<SymOp>) -> Result<Self, AsuError> {
        let Some(first) = ops.first() else {
            return Err(AsuError::config("space group needs at least one operation"));
        };
        if !first.is_identity() {
            return Err(AsuError::config(format!(
                "first operation must be the identity, got {first}"
            )));
        }
        for (i, a) in ops.iter().enumerate() {
            if let Some(j) = ops[i + 1..].iter().position(|b| a.is_lattice_equivalent(b)) {
                return Err(AsuError::config(format!(
                    "operations {i} and {} are lattice-equivalent ({a})",
                    i + 1 + j
                )));
            }
        }
        Ok(Self { ops })
    }

    pub fn p1() -> Self {
        Self {
            ops: vec![SymOp::identity()],
        }
    }

    pub fn from_xyz<S: AsRef<str>>(ops: &[S]) -> Result<Self, AsuError> {
        let ops = ops
            .iter()
            .map(|s| SymOp::from_xyz(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(ops)
    }

    /// Number of operations in the table.
    #[inline]
    pub fn order_z(&self) -> usize {
        self.ops.len()
    }
    #[inline]
    pub fn ops(&self) -> &[SymOp] {
        &self.ops
    }
    #[inline]
    pub fn op(&self, i_sym_op: usize) -> Option<&SymOp> {
        self.ops.get(i_sym_op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn parse_and_apply() {
        let op = SymOp::from_xyz("-x+1/2, y, -z").unwrap();
        let p = op.apply(&vector![0.1, 0.2, 0.3]);
        assert!((p - vector![0.4, 0.2, -0.3]).norm() < 1e-12);
        let hex = SymOp::from_xyz("x-y,x,z+1/6").unwrap();
        assert_eq!(hex.rotation()[(0, 1)], -1);
        assert!((hex.translation().z - 1.0 / 6.0).abs() < 1e-12);
        assert!(SymOp::from_xyz("1/2+X,Y,Z").is_ok());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(SymOp::from_xyz("x,y").is_err());
        assert!(SymOp::from_xyz("x,y,w").is_err());
        assert!(SymOp::from_xyz("xy,y,z").is_err());
        assert!(SymOp::from_xyz("x,y,z+1/0").is_err());
        assert!(SymOp::from_xyz("x,x,z").is_err()); // singular
        assert!(SymOp::from_xyz("x,y,-").is_err());
    }

    #[test]
    fn display_roundtrips_common_ops() {
        for text in ["x,y,z", "-x+1/2,-y,z+1/2", "x-y,x,z+1/6", "-y,x-y,z+2/3"] {
            let op = SymOp::from_xyz(text).unwrap();
            assert_eq!(op.to_string(), text);
        }
    }

    #[test]
    fn integer_coefficients_parse_and_print() {
        let op = SymOp::from_xyz("2*x+y,x+y,-z+1/2").unwrap();
        assert_eq!(op.rotation()[(0, 0)], 2);
        assert_eq!(op.to_string(), "2*x+y,x+y,-z+1/2");
        assert_eq!(SymOp::from_xyz(&op.to_string()).unwrap(), op);
        assert_eq!(SymOp::from_xyz("2x+y,x+y,-z+1/2").unwrap(), op);
        // Matrix [[2,-1,0],[-3,2,0],[0,0,1]] has determinant 1.
        let neg = SymOp::from_xyz("2x-y,-3*x+2*y,z").unwrap();
        assert_eq!(neg.to_string(), "2*x-y,-3*x+2*y,z");
        assert!(SymOp::from_xyz("1/2*x,y,z").is_err());
        assert!(SymOp::from_xyz("2*,y,z").is_err());
    }

    #[test]
    fn group_validation() {
        assert!(SpaceGroup::new(Vec::new()).is_err());
        assert!(SpaceGroup::from_xyz(&["-x,-y,-z", "x,y,z"]).is_err());
        assert!(SpaceGroup::from_xyz(&["x,y,z", "-x,y,-z", "-x,y+1,-z"]).is_err());
        let g = SpaceGroup::from_xyz(&["x,y,z", "-x,y+1/2,-z"]).unwrap();
        assert_eq!(g.order_z(), 2);
        assert!(g.op(0).unwrap().is_identity());
        assert_eq!(SpaceGroup::p1().order_z(), 1);
    }

    #[test]
    fn with_shifts_adds_lattice_translation() {
        let op = SymOp::from_xyz("-x,y+1/2,-z").unwrap();
        let shifted = op.with_shifts(&vector![1, 0, -1]);
        let p = vector![0.2, 0.3, 0.4];
        assert!((shifted.apply(&p) - (op.apply(&p) + vector![1.0, 0.0, -1.0])).norm() < 1e-12);
    }
}
