//! Keeps client-supplied file names inside the directory they are meant for.
//!
//! These checks are purely lexical and run before the filesystem is touched. Callers that open
//! an existing file should additionally compare canonical paths with [`is_within`] so that a
//! symlink cannot lead outside the directory.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("Invalid file path '{0}'")]
    OutsideDirectory(String),
}

/// Where an uploaded file called `file_name` is saved inside `dir`.
///
/// Like a browser would, only the final component of the client's file name is kept, so
/// `../../etc/passwd` is saved as `passwd`. Names without a usable final component are
/// rejected.
pub fn upload_path(dir: &Path, file_name: &str) -> Result<PathBuf, PathError> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let mut components = Path::new(base).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(dir.join(name)),
        _ => Err(PathError::InvalidFileName(file_name.to_string())),
    }
}

/// The path of the file requested as `file_name` inside `dir`.
///
/// `file_name` may name a file in a subdirectory, but every component must be a plain name:
/// `..`, `.`, and absolute paths are rejected.
pub fn download_path(dir: &Path, file_name: &str) -> Result<PathBuf, PathError> {
    let requested = Path::new(file_name);
    let mut path = dir.to_path_buf();
    let mut depth = 0;
    for component in requested.components() {
        match component {
            Component::Normal(name) => {
                path.push(name);
                depth += 1;
            }
            _ => return Err(PathError::OutsideDirectory(file_name.to_string())),
        }
    }
    if depth == 0 {
        return Err(PathError::InvalidFileName(file_name.to_string()));
    }
    Ok(path)
}

/// Whether `path` is `dir` itself or lies below it. Both should be canonical.
pub fn is_within(dir: &Path, path: &Path) -> bool {
    path.starts_with(dir)
}
