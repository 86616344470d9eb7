//! Environment variable utilities for diffevo
//!
//! This module handles the DIFFEVO_DIR variable that points to the project
//! root. Generated files (sweep summaries, run logs) land in
//! `$DIFFEVO_DIR/data_generated`, or in `./data_generated` when the variable
//! is not set.

use crate::constants::{DATA_GENERATED, DIFFEVO_DIR_VAR};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "DIFFEVO_DIR environment variable is not set. Please set it to the project root directory (e.g., export DIFFEVO_DIR=/path/to/diffevo)"
    )]
    DiffevoDirNotSet,

    #[error("DIFFEVO_DIR points to a non-existent directory: {0}")]
    DiffevoDirNotFound(PathBuf),

    #[error("Failed to create output directory {0}: {1}")]
    OutputDirCreationFailed(PathBuf, std::io::Error),
}

/// Get the DIFFEVO_DIR environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if:
/// - DIFFEVO_DIR is not set
/// - DIFFEVO_DIR points to a non-existent directory
///
/// # Example
///
/// ```no_run
/// use diffevo_env::env_utils::get_diffevo_dir;
///
/// let root = get_diffevo_dir()?;
/// println!("diffevo directory: {}", root.display());
/// # Ok::<(), diffevo_env::env_utils::EnvError>(())
/// ```
pub fn get_diffevo_dir() -> Result<PathBuf, EnvError> {
    let root = env::var(DIFFEVO_DIR_VAR).map_err(|_| EnvError::DiffevoDirNotSet)?;
    let path = PathBuf::from(root);

    if !path.exists() {
        return Err(EnvError::DiffevoDirNotFound(path));
    }

    Ok(path)
}

/// Get the directory receiving generated files, creating it if necessary
///
/// Uses `$DIFFEVO_DIR/data_generated` when DIFFEVO_DIR is set, otherwise
/// `./data_generated` relative to the working directory.
///
/// # Errors
///
/// Returns an error if DIFFEVO_DIR is set but invalid, or if the directory
/// cannot be created.
pub fn get_output_dir() -> Result<PathBuf, EnvError> {
    let root = match get_diffevo_dir() {
        Ok(root) => root,
        Err(EnvError::DiffevoDirNotSet) => PathBuf::from("."),
        Err(e) => return Err(e),
    };
    ensure_output_dir(&root)
}

/// Create `<root>/data_generated` if missing and return its path
pub fn ensure_output_dir(root: &Path) -> Result<PathBuf, EnvError> {
    let out = root.join(DATA_GENERATED);
    if !out.exists() {
        std::fs::create_dir_all(&out)
            .map_err(|e| EnvError::OutputDirCreationFailed(out.clone(), e))?;
    }
    Ok(out)
}
