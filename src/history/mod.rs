// src/history/mod.rs

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Record of one completed run, written next to the intermediate tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub completed_at: DateTime<Utc>,
    /// Normalized row count per fiscal year.
    pub years: BTreeMap<u16, usize>,
    pub detailed_rows: usize,
    pub totals_rows: usize,
}

impl RunManifest {
    pub fn new(years: BTreeMap<u16, usize>, detailed_rows: usize, totals_rows: usize) -> Self {
        Self {
            completed_at: Utc::now(),
            years,
            detailed_rows,
            totals_rows,
        }
    }
}

/// Write `manifest` to `<dir>/manifest.json` via a temp file and rename.
pub fn record_run<P: AsRef<Path>>(dir: P, manifest: &RunManifest) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(MANIFEST_FILE);
    let tmp_path = dir.join(format!(".{}.tmp", MANIFEST_FILE));

    let mut tmp = fs::File::create(&tmp_path)?;
    serde_json::to_writer_pretty(&mut tmp, manifest)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("serializing manifest: {}", e)))?;
    tmp.write_all(b"\n")?;
    drop(tmp);

    fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// The last recorded run in `dir`, if any.
pub fn load_last_run<P: AsRef<Path>>(dir: P) -> Result<Option<RunManifest>> {
    let path = dir.as_ref().join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let file = fs::File::open(&path)?;
    let manifest = serde_json::from_reader(file).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("parsing {:?}: {}", path, e))
    })?;
    Ok(Some(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_is_written_and_read_back() -> anyhow::Result<()> {
        let dir = tempdir()?;
        assert_eq!(load_last_run(dir.path())?, None);

        let manifest = RunManifest::new(BTreeMap::from([(2013, 120), (2014, 98)]), 150, 40);
        let path = record_run(dir.path(), &manifest)?;
        assert!(path.ends_with(MANIFEST_FILE));

        let text = fs::read_to_string(&path)?;
        assert!(text.contains("\"detailed_rows\": 150"));
        assert_eq!(load_last_run(dir.path())?, Some(manifest));
        Ok(())
    }

    #[test]
    fn corrupt_manifest_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json")?;
        assert!(load_last_run(dir.path()).is_err());
        Ok(())
    }
}
