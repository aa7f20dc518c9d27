//! Job description: cell, operation table, ASU facets, tolerances (JSON).

use anyhow::{Context, Result};
use dsasu::asu::unit_cell_box;
use dsasu::{AsuMappings, AsymmetricUnit, HalfSpace, SpaceGroup, UnitCell, DEFAULT_SYM_EQUIV_EPS};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One cut plane `n·x + c >= 0` in fractional coordinates.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FacetSpec {
    pub n: [f64; 3],
    pub c: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct JobConfig {
    /// `[a, b, c, alpha, beta, gamma]`, angles in degrees.
    pub unit_cell: [f64; 6],
    /// Operations in `x,y,z` notation, identity first.
    pub space_group: Vec<String>,
    /// ASU facets; the whole unit cell when omitted.
    #[serde(default)]
    pub facets: Option<Vec<FacetSpec>>,
    #[serde(default)]
    pub buffer_thickness: f64,
    #[serde(default = "default_sym_equiv_epsilon")]
    pub sym_equiv_epsilon: f64,
    #[serde(default)]
    pub inside_epsilon: f64,
}

fn default_sym_equiv_epsilon() -> f64 {
    DEFAULT_SYM_EQUIV_EPS
}

impl JobConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn unit_cell(&self) -> Result<UnitCell> {
        Ok(UnitCell::new(self.unit_cell)?)
    }

    pub fn space_group(&self) -> Result<SpaceGroup> {
        Ok(SpaceGroup::from_xyz(self.space_group.as_slice())?)
    }

    /// The unbuffered asymmetric unit.
    pub fn asu(&self) -> Result<AsymmetricUnit> {
        let cell = self.unit_cell()?;
        let asu = match &self.facets {
            None => unit_cell_box(cell)?,
            Some(specs) => {
                let facets = specs
                    .iter()
                    .enumerate()
                    .map(|(i, f)| {
                        HalfSpace::new(Vector3::from(f.n), f.c)
                            .with_context(|| format!("facet {i}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                AsymmetricUnit::new(cell, facets, self.inside_epsilon)?
            }
        };
        Ok(asu)
    }

    pub fn mappings(&self) -> Result<AsuMappings> {
        Ok(AsuMappings::new(
            self.space_group()?,
            self.asu()?,
            self.buffer_thickness,
            self.sym_equiv_epsilon,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const P21: &str = r#"{
        "unit_cell": [8.0, 6.0, 9.0, 90.0, 100.0, 90.0],
        "space_group": ["x,y,z", "-x,y+1/2,-z"],
        "facets": [
            {"n": [1, 0, 0], "c": 0},
            {"n": [-1, 0, 0], "c": 0.5},
            {"n": [0, 1, 0], "c": 0},
            {"n": [0, -1, 0], "c": 1},
            {"n": [0, 0, 1], "c": 0},
            {"n": [0, 0, -1], "c": 1}
        ],
        "buffer_thickness": 1.0
    }"#;

    #[test]
    fn defaults_and_build() {
        let cfg: JobConfig = serde_json::from_str(P21).unwrap();
        assert_eq!(cfg.sym_equiv_epsilon, DEFAULT_SYM_EQUIV_EPS);
        assert_eq!(cfg.inside_epsilon, 0.0);
        let am = cfg.mappings().unwrap();
        assert_eq!(am.space_group().order_z(), 2);
        assert_eq!(am.asu().facets().len(), 6);
        assert!((am.asu().box_max().y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn omitted_facets_mean_whole_cell() {
        let cfg: JobConfig = serde_json::from_str(
            r#"{"unit_cell": [5, 5, 5, 90, 90, 90], "space_group": ["x,y,z"]}"#,
        )
        .unwrap();
        let asu = cfg.asu().unwrap();
        assert!((asu.box_max() - Vector3::new(5.0, 5.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn bad_inputs_surface_as_errors() {
        let mut cfg: JobConfig = serde_json::from_str(P21).unwrap();
        cfg.space_group = vec!["x,y,q".into()];
        assert!(cfg.mappings().is_err());
        let mut cfg: JobConfig = serde_json::from_str(P21).unwrap();
        cfg.facets.as_mut().unwrap()[0].n = [0.0, 0.0, 0.0];
        let err = cfg.asu().unwrap_err();
        assert!(format!("{err:#}").contains("facet 0"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, P21).unwrap();
        let cfg = JobConfig::load(&path).unwrap();
        assert_eq!(cfg.space_group.len(), 2);
        assert!(JobConfig::load(dir.path().join("missing.json")).is_err());
    }
}
