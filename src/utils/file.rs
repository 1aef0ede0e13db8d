use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Checks if a file exists at the given path
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Read a file into a string
pub fn file_get<P: AsRef<Path>>(path: P) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Resolve a host-supplied path against the process working directory.
///
/// Relative paths become working-directory-relative; an absolute path
/// resolves to itself. No further normalization is applied.
pub fn resolve_path(path: &str) -> io::Result<PathBuf> {
    Ok(env::current_dir()?.join(path))
}
