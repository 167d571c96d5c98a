use super::error::{GvError, Result};
use super::CSV_DATA_FILE_NAME;
use std::path::{Path, PathBuf};

/// Checks the GasViewer sampling directory and returns the path of its sample file.
pub fn data_file_path(gv_sampling_dir_path: &Path) -> Result<PathBuf> {
    if !gv_sampling_dir_path.exists() {
        return Err(GvError::DirNotFound(gv_sampling_dir_path.to_path_buf()));
    }
    if !gv_sampling_dir_path.is_dir() {
        return Err(GvError::NotADirectory(gv_sampling_dir_path.to_path_buf()));
    }
    let entries = std::fs::read_dir(gv_sampling_dir_path).map_err(|source| GvError::Io {
        path: gv_sampling_dir_path.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        tracing::debug!(entry = %entry.path().display(), "sampling directory entry");
    }
    let fin = gv_sampling_dir_path.join(CSV_DATA_FILE_NAME);
    if !fin.is_file() {
        return Err(GvError::MissingDataFile(fin));
    }
    Ok(fin)
}
