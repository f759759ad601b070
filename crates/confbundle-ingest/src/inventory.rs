//! Publication file pools.
//!
//! A [`FileInventory`] lists one directory of publication files (all PDFs or
//! all XMLs) and maps a normalized comparison key to each actual filename.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Prefix added by the renaming tool of some conferences, e.g. `012_final-`.
pub const DEFAULT_NOISE_PATTERN: &str = "^[0-9]{3}_final-";

/// OS artifacts that are never publication files.
pub const DEFAULT_IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

static DEFAULT_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_NOISE_PATTERN).expect("default noise pattern is a valid regex")
});

/// How filenames are filtered and normalized.
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    noise: Regex,
    ignored_files: Vec<String>,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            noise: DEFAULT_NOISE.clone(),
            ignored_files: DEFAULT_IGNORED_FILES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl InventoryOptions {
    /// Builds options from a noise regex and additional ignored filenames.
    pub fn new(noise_pattern: &str, ignored_files: &[String]) -> Result<Self> {
        let noise = Regex::new(noise_pattern).map_err(|source| IngestError::InvalidNoisePattern {
            pattern: noise_pattern.to_string(),
            source,
        })?;
        let mut options = Self {
            noise,
            ..Self::default()
        };
        for name in ignored_files {
            if !options.ignored_files.contains(name) {
                options.ignored_files.push(name.clone());
            }
        }
        Ok(options)
    }

    pub fn noise_pattern(&self) -> &str {
        self.noise.as_str()
    }

    /// Hidden files and configured OS artifacts are not publication files.
    pub fn is_ignored(&self, filename: &str) -> bool {
        filename.starts_with('.') || self.ignored_files.iter().any(|name| name == filename)
    }

    /// Comparison key for a filename: stem with the noise pattern removed.
    pub fn comparison_key(&self, filename: &str) -> String {
        self.noise.replace_all(file_stem(filename), "").into_owned()
    }
}

/// One comparison key and the file it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub comparison_key: String,
    pub actual_filename: String,
}

/// Sorted, single-format listing of a publication directory.
#[derive(Debug, Clone)]
pub struct FileInventory {
    directory: PathBuf,
    extension: String,
    files: Vec<String>,
    entries: Vec<InventoryEntry>,
}

impl FileInventory {
    /// Scans `directory` and builds the key mapping.
    ///
    /// Fails when the directory is unreadable, empty, or holds more than one
    /// file extension. Filenames are sorted before keys are built, so entry
    /// positions are stable between runs.
    pub fn build(directory: &Path, options: &InventoryOptions) -> Result<Self> {
        let files = list_publication_files(directory)?;
        Self::from_filenames(directory, files, options)
    }

    /// Builds an inventory from an already listed set of filenames.
    ///
    /// Ignored names are filtered out the same way [`FileInventory::build`]
    /// does; `directory` is only recorded for path resolution.
    pub fn from_filenames(
        directory: &Path,
        filenames: Vec<String>,
        options: &InventoryOptions,
    ) -> Result<Self> {
        let mut files: Vec<String> = filenames
            .into_iter()
            .filter(|name| !options.is_ignored(name))
            .collect();
        files.sort();

        let extensions: BTreeSet<String> =
            files.iter().map(|name| file_extension(name).to_string()).collect();
        if extensions.len() > 1 {
            warn!(
                directory = %directory.display(),
                extensions = ?extensions,
                "directory contains files with multiple formats"
            );
            return Err(IngestError::MixedFormat {
                path: directory.to_path_buf(),
                extensions: extensions.into_iter().collect(),
            });
        }
        let Some(extension) = extensions.into_iter().next() else {
            return Err(IngestError::EmptyDirectory {
                path: directory.to_path_buf(),
            });
        };

        let entries = build_entries(&files, options);
        debug!(
            directory = %directory.display(),
            files = files.len(),
            keys = entries.len(),
            extension = %extension,
            "built file inventory"
        );
        Ok(Self {
            directory: directory.to_path_buf(),
            extension,
            files,
            entries,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Shared extension of all files, including the dot (e.g. `.pdf`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every listed filename, sorted.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Key entries in sorted-filename order.
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.comparison_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Actual filename for a comparison key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.comparison_key == key)
            .map(|entry| entry.actual_filename.as_str())
    }

    /// Entry at a position of the sorted listing.
    pub fn at(&self, position: usize) -> Option<&InventoryEntry> {
        self.entries.get(position)
    }

    /// Position of a filename in the key listing.
    pub fn position_of(&self, filename: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.actual_filename == filename)
    }

    /// Filename whose stem equals `stem`.
    pub fn find_by_stem(&self, stem: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|name| file_stem(name) == stem)
            .map(String::as_str)
    }

    /// Stems of every listed file.
    pub fn stems(&self) -> BTreeSet<String> {
        self.files.iter().map(|name| file_stem(name).to_string()).collect()
    }

    /// Full path of a listed file.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }
}

/// Lists the regular files of a directory (unsorted).
fn list_publication_files(directory: &Path) -> Result<Vec<String>> {
    if !directory.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(directory).map_err(|e| IngestError::DirectoryRead {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: directory.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.as_encoded_bytes().starts_with(b".") {
            continue;
        }
        match name.into_string() {
            Ok(name) => files.push(name),
            Err(_) => return Err(IngestError::NonUtf8Filename { path }),
        }
    }
    Ok(files)
}

/// Builds key entries from sorted filenames.
///
/// A key produced by several files keeps its first position and points at the
/// last of those files.
fn build_entries(files: &[String], options: &InventoryOptions) -> Vec<InventoryEntry> {
    let mut entries: Vec<InventoryEntry> = Vec::with_capacity(files.len());
    for name in files {
        let key = options.comparison_key(name);
        match entries.iter_mut().find(|entry| entry.comparison_key == key) {
            Some(existing) => {
                warn!(
                    key = %key,
                    previous = %existing.actual_filename,
                    file = %name,
                    "comparison key produced by more than one file"
                );
                existing.actual_filename = name.clone();
            }
            None => entries.push(InventoryEntry {
                comparison_key: key,
                actual_filename: name.clone(),
            }),
        }
    }
    entries
}

/// Filename without its last extension (`a.b.pdf` -> `a.b`).
pub fn file_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(dot) => &filename[..dot],
    }
}

/// Last extension including the dot, or `""`.
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => "",
        Some(dot) => &filename[dot..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"%PDF").unwrap();
        }
        dir
    }

    #[test]
    fn test_stem_and_extension() {
        assert_eq!(file_stem("001_final-A.pdf"), "001_final-A");
        assert_eq!(file_stem("a.b.xml"), "a.b");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(file_extension("a.b.xml"), ".xml");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".hidden"), "");
    }

    #[test]
    fn test_comparison_key_strips_noise() {
        let options = InventoryOptions::default();
        assert_eq!(options.comparison_key("001_final-SmithPaper.pdf"), "SmithPaper");
        assert_eq!(options.comparison_key("SmithPaper.pdf"), "SmithPaper");
        // only a leading prefix is noise
        assert_eq!(
            options.comparison_key("Smith_001_final-Paper.pdf"),
            "Smith_001_final-Paper"
        );
    }

    #[test]
    fn test_custom_noise_pattern() {
        let options = InventoryOptions::new("^DHd2019_", &[]).unwrap();
        assert_eq!(options.comparison_key("DHd2019_Paper.pdf"), "Paper");
        assert_eq!(options.noise_pattern(), "^DHd2019_");
    }

    #[test]
    fn test_invalid_noise_pattern() {
        let err = InventoryOptions::new("([0-9]", &[]).unwrap_err();
        assert!(matches!(err, IngestError::InvalidNoisePattern { .. }));
    }

    #[test]
    fn test_ignores_hidden_and_configured_files() {
        let options = InventoryOptions::new(DEFAULT_NOISE_PATTERN, &["index.txt".to_string()]).unwrap();
        assert!(options.is_ignored(".DS_Store"));
        assert!(options.is_ignored("._001.pdf"));
        assert!(options.is_ignored("index.txt"));
        assert!(!options.is_ignored("001.pdf"));
    }

    #[test]
    fn test_build_sorts_and_maps_keys() {
        let dir = dir_with(&["002_final-JonesPaper.pdf", "001_final-SmithPaper.pdf", ".DS_Store"]);
        let inventory = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap();

        assert_eq!(inventory.extension(), ".pdf");
        assert_eq!(inventory.len(), 2);
        let keys: Vec<&str> = inventory.keys().collect();
        assert_eq!(keys, vec!["SmithPaper", "JonesPaper"]);
        assert_eq!(inventory.get("SmithPaper"), Some("001_final-SmithPaper.pdf"));
        assert_eq!(inventory.get("JonesPaper"), Some("002_final-JonesPaper.pdf"));
        assert_eq!(inventory.position_of("002_final-JonesPaper.pdf"), Some(1));
        assert_eq!(inventory.find_by_stem("001_final-SmithPaper"), Some("001_final-SmithPaper.pdf"));
    }

    #[test]
    fn test_duplicate_keys_keep_first_position() {
        let dir = dir_with(&["001_final-Paper.pdf", "002_final-Other.pdf", "003_final-Paper.pdf"]);
        let inventory = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap();

        assert_eq!(inventory.files().len(), 3);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.at(0).unwrap().comparison_key, "Paper");
        assert_eq!(inventory.at(0).unwrap().actual_filename, "003_final-Paper.pdf");
        assert_eq!(inventory.at(1).unwrap().comparison_key, "Other");
    }

    #[test]
    fn test_mixed_formats_fail() {
        let dir = dir_with(&["a.pdf", "b.txt"]);
        let err = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap_err();
        match err {
            IngestError::MixedFormat { extensions, .. } => {
                assert_eq!(extensions, vec![".pdf".to_string(), ".txt".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = dir_with(&[".DS_Store"]);
        let err = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyDirectory { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_filename_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = dir_with(&["001_final-SMITH_John_Big_Data.pdf"]);
        let latin1 = OsStr::from_bytes(b"002_final-M\xfcller.pdf");
        std::fs::write(dir.path().join(latin1), b"%PDF").unwrap();

        let err = FileInventory::build(dir.path(), &InventoryOptions::default()).unwrap_err();
        match err {
            IngestError::NonUtf8Filename { path } => {
                assert_eq!(path, dir.path().join(latin1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = FileInventory::build(&missing, &InventoryOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
