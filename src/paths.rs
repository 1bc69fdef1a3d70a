use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Type of dataset file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Csv,    // *.csv
    CsvZst, // *.csv.zst
}

impl FileKind {
    pub fn of(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".csv.zst") {
            Some(FileKind::CsvZst)
        } else if name.ends_with(".csv") {
            Some(FileKind::Csv)
        } else {
            None
        }
    }
}

/// Dataset files directly inside `dir` (no recursion), sorted by file name.
/// Hidden files (e.g. in-flight `.name.part` downloads) are skipped.
pub fn discover_dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::io(
            format!("read dir {}", dir.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let ent = entry.map_err(|e| {
            let msg = e.to_string();
            Error::io(format!("read dir {}", dir.display()), e.into_io_error().unwrap_or_else(|| std::io::Error::other(msg)))
        })?;
        if !ent.file_type().is_file() {
            continue;
        }
        let hidden = ent.file_name().to_str().map(|n| n.starts_with('.')).unwrap_or(true);
        if hidden {
            continue;
        }
        if FileKind::of(ent.path()).is_some() {
            files.push(ent.path().to_path_buf());
        }
    }
    Ok(files)
}
