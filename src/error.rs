//! Shared error type for per-file pipeline failures.
//!
//! Every stage that touches a single asset (filename parsing, path planning,
//! SVG processing, code generation, stream writing) reports failures through
//! [`FileProcessingError`] so the offending input path travels with the error
//! all the way up to the batch driver. Per-file errors are never retried:
//! the batch driver treats the first one as fatal for the whole run.
//!
//! Configuration errors are a separate, pre-flight-only concern and live in
//! [`crate::config::ConfigError`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure while processing a single asset file.
///
/// Each variant corresponds to one stage of the per-file pipeline and carries
/// the path it was working on plus the underlying cause where one exists.
#[derive(Error, Debug)]
pub enum FileProcessingError {
    /// Filename does not match the `category[-mono][-dark|-light]` grammar.
    #[error("invalid filename, expected category[-mono][-dark|-light]: {0}")]
    MalformedFilename(String),

    /// The asset's parent directory has no final segment to use as the brand.
    #[error("unable to extract brand from parent path: {0}")]
    MissingBrand(PathBuf),

    /// Path rejected by the pre-write safety check.
    #[error("unsafe path ({reason}): {path}")]
    UnsafePath { path: PathBuf, reason: &'static str },

    /// `process_file` called before `initialize`.
    #[error("SVG processor not initialized, call initialize() first: {0}")]
    NotInitialized(PathBuf),

    /// Reading the raw source file failed.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The vector optimizer rejected the source markup.
    #[error("failed to optimize {path}")]
    Optimize {
        path: PathBuf,
        #[source]
        source: usvg::Error,
    },

    /// The optimized markup could not be parsed into a structural tree.
    #[error("failed to parse optimized markup for {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing a generated artifact or stream chunk failed.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write was issued against a stream that has already been closed.
    #[error("stream already closed: {0}")]
    StreamClosed(PathBuf),
}

impl FileProcessingError {
    /// The path this error is about, when one applies.
    ///
    /// `MalformedFilename` carries a bare filename rather than a path, so it
    /// is reported through the `Display` impl instead.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedFilename(_) => None,
            Self::MissingBrand(path) | Self::NotInitialized(path) | Self::StreamClosed(path) => {
                Some(path)
            }
            Self::UnsafePath { path, .. }
            | Self::Read { path, .. }
            | Self::Optimize { path, .. }
            | Self::Parse { path, .. }
            | Self::Write { path, .. } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_path() {
        let err = FileProcessingError::MissingBrand(PathBuf::from("somewhere"));
        assert!(err.to_string().contains("somewhere"));

        let err = FileProcessingError::UnsafePath {
            path: PathBuf::from("../escape"),
            reason: "path traversal",
        };
        assert!(err.to_string().contains("../escape"));
        assert!(err.to_string().contains("path traversal"));
    }

    #[test]
    fn path_accessor_covers_all_variants_with_paths() {
        let err = FileProcessingError::StreamClosed(PathBuf::from("index.ts"));
        assert_eq!(err.path(), Some(Path::new("index.ts")));

        let err = FileProcessingError::MalformedFilename("x!y".into());
        assert_eq!(err.path(), None);
    }
}
