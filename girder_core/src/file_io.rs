//! # File I/O Module
//!
//! Reads section parameters and drawing styles from JSON files and writes
//! exports with atomic semantics: bytes go to a `.tmp` sibling, are synced,
//! then renamed over the target, so an interrupted run never leaves a
//! truncated image or sheet behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::file_io::{load_parameters, write_export};
//! use std::path::Path;
//!
//! let params = load_parameters(Path::new("section.json"))?;
//! write_export(b"...", Path::new("steel_box_section.png"))?;
//! # Ok::<(), girder_core::errors::SectionError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::drawing::style::DrawingStyle;
use crate::errors::{SectionError, SectionResult};
use crate::section::SectionParameters;

fn read_json<T: DeserializeOwned>(path: &Path) -> SectionResult<T> {
    let mut file = File::open(path)
        .map_err(|e| SectionError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| SectionError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| SectionError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load and validate section parameters.
///
/// # Returns
///
/// * `Err(SectionError::FileError)` - I/O error
/// * `Err(SectionError::SerializationError)` - Invalid JSON or missing field
/// * `Err(SectionError::GeometryError)` - Parameters fail validation
pub fn load_parameters(path: &Path) -> SectionResult<SectionParameters> {
    let params: SectionParameters = read_json(path)?;
    params.validate()?;
    debug!(path = %path.display(), "loaded section parameters");
    Ok(params)
}

/// Load and validate a drawing style; omitted fields keep their defaults.
pub fn load_style(path: &Path) -> SectionResult<DrawingStyle> {
    let style: DrawingStyle = read_json(path)?;
    style.validate()?;
    debug!(path = %path.display(), "loaded drawing style");
    Ok(style)
}

/// Save section parameters as pretty JSON with an atomic write
pub fn save_parameters(params: &SectionParameters, path: &Path) -> SectionResult<()> {
    let json = serde_json::to_string_pretty(params)?;
    write_export(json.as_bytes(), path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to `path` atomically.
///
/// 1. Write to `<name>.tmp` next to the target
/// 2. Sync to disk
/// 3. Rename over the target
pub fn write_export(bytes: &[u8], path: &Path) -> SectionResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SectionError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        SectionError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        SectionError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SectionError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::style::TerminatorStyle;

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/out/steel_box_section.png")),
            Path::new("/out/steel_box_section.png.tmp")
        );
    }

    #[test]
    fn test_save_and_load_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("section.json");

        let params = SectionParameters {
            cell_count: 4,
            ..SectionParameters::default()
        };
        save_parameters(&params, &path).unwrap();

        let loaded = load_parameters(&path).unwrap();
        assert_eq!(loaded, params);
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("section.json");
        let params = SectionParameters {
            height: -5.0,
            ..SectionParameters::default()
        };
        fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();

        let err = load_parameters(&path).unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY_ERROR");
    }

    #[test]
    fn test_partial_style_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, r#"{ "version": 1, "arrow_style": "Tick", "tick_length": 60.0 }"#).unwrap();

        let style = load_style(&path).unwrap();
        assert_eq!(style.arrow_style, TerminatorStyle::Tick);
        assert_eq!(style.tick_length, 60.0);
        assert_eq!(style.dpi, 200.0);
    }

    #[test]
    fn test_style_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        fs::write(&path, r#"{ "version": 7 }"#).unwrap();

        assert_eq!(load_style(&path).unwrap_err().error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_bad_json_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_parameters(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");

        let missing = dir.path().join("missing.json");
        assert_eq!(load_style(&missing).unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_write_export_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steel_box_section.svg");
        write_export(b"first", &path).unwrap();
        write_export(b"second", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }
}
