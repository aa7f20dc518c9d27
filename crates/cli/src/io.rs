//! Tabular I/O: sites in, mappings out (CSV, or Parquet by extension).

use anyhow::{bail, Context, Result};
use dsasu::AsuMappings;
use nalgebra::Vector3;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Read fractional sites from a CSV with `x`, `y`, `z` columns.
pub fn read_sites<P: AsRef<Path>>(path: P) -> Result<Vec<Vector3<f64>>> {
    let path = path.as_ref();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening sites {}", path.display()))?
        .collect()
        .with_context(|| format!("reading sites {}", path.display()))?;
    let x = column_f64(&df, "x")?;
    let y = column_f64(&df, "y")?;
    let z = column_f64(&df, "z")?;
    Ok(x
        .into_iter()
        .zip(y)
        .zip(z)
        .map(|((x, y), z)| Vector3::new(x, y, z))
        .collect())
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .with_context(|| format!("sites table has no column {name:?}"))?
        .cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("row {row}: missing value in column {name:?}")))
        .collect()
}

/// One row per mapping: site index, image index, operation, shifts, cartesian site.
pub fn mappings_frame(am: &AsuMappings) -> Result<DataFrame> {
    let n: usize = am.mappings().iter().map(Vec::len).sum();
    let mut i_seq = Vec::with_capacity(n);
    let mut i_sym = Vec::with_capacity(n);
    let mut i_sym_op = Vec::with_capacity(n);
    let mut shifts: [Vec<i32>; 3] = std::array::from_fn(|_| Vec::with_capacity(n));
    let mut sites: [Vec<f64>; 3] = std::array::from_fn(|_| Vec::with_capacity(n));
    for (seq, site_mappings) in am.mappings().iter().enumerate() {
        for (sym, m) in site_mappings.iter().enumerate() {
            i_seq.push(seq as u64);
            i_sym.push(sym as u64);
            i_sym_op.push(m.i_sym_op() as u64);
            for axis in 0..3 {
                shifts[axis].push(m.unit_shifts()[axis]);
                sites[axis].push(m.mapped_site()[axis]);
            }
        }
    }
    let [u0, u1, u2] = shifts;
    let [x, y, z] = sites;
    Ok(df!(
        "i_seq" => i_seq,
        "i_sym" => i_sym,
        "i_sym_op" => i_sym_op,
        "u0" => u0,
        "u1" => u1,
        "u2" => u2,
        "x" => x,
        "y" => y,
        "z" => z
    )?)
}

pub fn write_mappings<P: AsRef<Path>>(path: P, am: &AsuMappings) -> Result<usize> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str());
    if !matches!(ext, Some("csv") | Some("parquet")) {
        bail!("unsupported output extension {ext:?} (use .csv or .parquet)");
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut df = mappings_frame(am)?;
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if ext == Some("csv") {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        ParquetWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(df.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsasu::asu::unit_cell_box;
    use dsasu::{SpaceGroup, UnitCell};
    use std::fs;
    use tempfile::tempdir;

    fn catalogue() -> AsuMappings {
        let asu = unit_cell_box(UnitCell::cubic(10.0).unwrap()).unwrap();
        let mut am = AsuMappings::with_default_epsilon(SpaceGroup::p1(), asu, 2.0).unwrap();
        am.process(&Vector3::new(0.5, 0.5, 0.5));
        am.process(&Vector3::new(0.01, 0.5, 0.5));
        am
    }

    #[test]
    fn sites_roundtrip_through_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(&path, "label,x,y,z\nA,0.1,0.2,0.3\nB,1,0,0.5\n").unwrap();
        let sites = read_sites(&path).unwrap();
        assert_eq!(sites, vec![Vector3::new(0.1, 0.2, 0.3), Vector3::new(1.0, 0.0, 0.5)]);
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(&path, "x,y\n0.1,0.2\n").unwrap();
        let err = read_sites(&path).unwrap_err();
        assert!(format!("{err:#}").contains("\"z\""));
    }

    #[test]
    fn mappings_frame_has_one_row_per_image() {
        let df = mappings_frame(&catalogue()).unwrap();
        assert_eq!(df.height(), 3);
        let u0: Vec<i32> = df.column("u0").unwrap().i32().unwrap().into_no_null_iter().collect();
        assert_eq!(u0, vec![0, 0, 1]);
        let seq: Vec<u64> = df.column("i_seq").unwrap().u64().unwrap().into_no_null_iter().collect();
        assert_eq!(seq, vec![0, 1, 1]);
    }

    #[test]
    fn write_csv_and_reject_unknown_extension() {
        let dir = tempdir().unwrap();
        let am = catalogue();
        let out = dir.path().join("nested/out.csv");
        assert_eq!(write_mappings(&out, &am).unwrap(), 3);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("i_seq,i_sym,i_sym_op,u0,u1,u2,x,y,z"));
        assert_eq!(text.lines().count(), 4);
        assert!(write_mappings(dir.path().join("out.txt"), &am).is_err());
    }
}
