//! Reading bundle directories back.

use std::path::{Path, PathBuf};

use crate::assembler::PUBLICATIONS_DIR;
use crate::error::{OutputError, Result};

/// Files of a bundle directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleContents {
    pub manifest_path: PathBuf,
    /// Publication files, sorted by name.
    pub publications: Vec<PathBuf>,
}

/// Reads a bundle: exactly one `*.json` manifest at the root and a
/// `bundle_publications` folder.
pub fn read_bundle(dir: &Path) -> Result<BundleContents> {
    let invalid = |message: String| OutputError::InvalidLayout {
        path: dir.to_path_buf(),
        message,
    };
    if !dir.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }

    let mut manifests = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| OutputError::io(dir, e))? {
        let path = entry.map_err(|e| OutputError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            manifests.push(path);
        }
    }
    let manifest_path = match manifests.len() {
        1 => manifests.remove(0),
        0 => return Err(invalid("no json manifest".to_string())),
        n => return Err(invalid(format!("{n} json manifests"))),
    };

    let publications_dir = dir.join(PUBLICATIONS_DIR);
    if !publications_dir.is_dir() {
        return Err(invalid(format!("missing {PUBLICATIONS_DIR} folder")));
    }
    let mut publications = Vec::new();
    for entry in std::fs::read_dir(&publications_dir).map_err(|e| OutputError::io(&publications_dir, e))? {
        let path = entry.map_err(|e| OutputError::io(&publications_dir, e))?.path();
        if path.is_file() {
            publications.push(path);
        }
    }
    publications.sort();

    Ok(BundleContents {
        manifest_path,
        publications,
    })
}
