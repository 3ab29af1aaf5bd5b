//! Shared test utilities for the mapml-wms workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A sample map definition and its YAML map file
//! - Temporary map files for config loading tests
//! - GetMapML query builders
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{sample_map, write_map_file};
//! ```

use std::io::Write;

use tempfile::NamedTempFile;

pub mod fixtures;

// Re-export commonly used items at the crate root
pub use fixtures::*;

/// Write `contents` to a temporary `.yaml` file that lives as long as the handle.
pub fn write_map_file(contents: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_map_file() {
        let file = write_map_file(SAMPLE_MAP_YAML).unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("name: demo"));
        assert_eq!(file.path().extension().and_then(|e| e.to_str()), Some("yaml"));
    }
}
