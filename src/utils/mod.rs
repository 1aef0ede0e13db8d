pub mod file;

// Re-export common utilities
pub use file::{file_exists, file_get, resolve_path};
