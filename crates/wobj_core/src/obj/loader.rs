//! File-backed entry points.
//!
//! The parser itself only ever sees an in-memory `&str`, so how the bytes
//! get there (plain read, memory map, embedded asset) stays swappable
//! without touching the parsing passes. This module provides the plain-read
//! flavor.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::parser::{parse_obj, parse_obj_with, ParseError, ParseOptions, ParsedObj};
use super::types::ObjModel;

/// Errors that can occur while loading an OBJ file from disk.
///
/// A missing or unreadable file is reported with its path instead of being
/// collapsed into an empty model, so callers can tell "not found" from
/// "legitimately empty".
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Read and leniently parse the OBJ file at `path`.
///
/// # Example
///
/// ```ignore
/// use wobj_core::load_obj;
///
/// let model = load_obj("assets/teapot.obj")?;
/// println!("{} sub-objects", model.sub_objects.len());
/// ```
pub fn load_obj<P: AsRef<Path>>(path: P) -> LoadResult<ObjModel> {
    let path = path.as_ref();
    let content = read_contents(path)?;
    Ok(parse_obj(&content)?)
}

/// Read and parse the OBJ file at `path` with explicit options, returning
/// collected warnings alongside the model.
pub fn load_obj_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> LoadResult<ParsedObj> {
    let path = path.as_ref();
    let content = read_contents(path)?;
    Ok(parse_obj_with(&content, options)?)
}

fn read_contents(path: &Path) -> LoadResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_obj("definitely/not/here.obj").unwrap_err();
        match err {
            LoadError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("definitely/not/here.obj"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_round_trip() {
        let path = std::env::temp_dir().join("wobj_loader_test.obj");
        std::fs::write(&path, "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let model = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(model.sub_objects.len(), 1);
        assert_eq!(model.sub_objects[0].name, "Tri");
        assert_eq!(model.sub_objects[0].triangle_count(), 1);
    }

    #[test]
    fn test_strict_load_surfaces_parse_errors() {
        let path = std::env::temp_dir().join("wobj_loader_strict_test.obj");
        std::fs::write(&path, "o Bad\nv 1 2\n").unwrap();

        let options = ParseOptions {
            mode: crate::obj::ErrorMode::Strict,
        };
        let err = load_obj_with(&path, &options).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, LoadError::Parse(_)));
    }
}
