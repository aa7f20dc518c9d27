use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata recorded next to a mappings table.
pub struct Payload {
    pub params: Value,
    pub tag: Option<String>,
}

impl Payload {
    pub fn new(params: Value, tag: Option<String>) -> Self {
        Self { params, tag }
    }
}

/// Build the provenance document for the given outputs.
#[track_caller]
pub fn document(payload: &Payload, outputs: &[String]) -> Value {
    let callsite = Location::caller();
    json!({
        "code_rev": code_rev(),
        "dsasu_version": dsasu::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "tag": payload.tag,
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write `<artifact file name>.provenance.json` containing the git commit, callsite, params, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = document(&payload, &[artifact.to_string_lossy().into_owned()]);
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

/// `mappings.csv` -> `mappings.csv.provenance.json`, so CSV and Parquet
/// outputs of the same run keep separate sidecars.
fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("mappings"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit of the running binary: `GIT_COMMIT` at build time, then at run time,
/// then `git rev-parse HEAD`. Falls back to the crate version so every
/// sidecar still names the code that produced it.
fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| format!("dsasu-{}", dsasu::VERSION))
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_string()).filter(|rev| !rev.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_name_keeps_the_output_extension() {
        let csv = provenance_path(Path::new("/tmp/output/mappings.csv"));
        assert_eq!(csv, Path::new("/tmp/output/mappings.csv.provenance.json"));
        let parquet = provenance_path(Path::new("/tmp/output/mappings.parquet"));
        assert_ne!(csv, parquet);
    }

    #[test]
    fn code_rev_is_never_empty() {
        assert!(!code_rev().is_empty());
    }

    #[test]
    fn write_sidecar_records_params_and_tag() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("m.csv");
        fs::write(&artifact, "").unwrap();
        let payload = Payload::new(json!({"buffer_thickness": 2.0}), Some("run-a".into()));
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["tag"], "run-a");
        assert_eq!(parsed["params"]["buffer_thickness"], 2.0);
        assert_eq!(parsed["dsasu_version"], dsasu::VERSION);
    }
}
