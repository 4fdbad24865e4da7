//! Path planning for a single asset.
//!
//! Combines the discovery entry (parent directory + filename) with the parsed
//! filename identity into an [`AssetPaths`]: the full read/write plan for one
//! icon. The output tree mirrors the source tree's brand directories under a
//! separate output root so generated artifacts can never clobber inputs.
//!
//! ```text
//! assets/gitlab/arrow-mono.svg        (input)
//! .assets/gitlab/arrow-mono.ts        (generated component)
//! .assets/gitlab/arrow-mono.json      (structural tree)
//! ```
//!
//! Also home of [`validate_path`], the safety check applied to every
//! output-relative path before a write: empty paths, parent-directory
//! traversal, and absolute paths are all rejected.

use crate::error::FileProcessingError;
use crate::naming::{self, ColorVariant, ModeVariant};
use std::path::{Component, Path, PathBuf};

/// Fully resolved identity and filesystem plan for one asset.
///
/// Created once per asset and read-only thereafter.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// Filename stem, variant markers included (`arrow-mono`).
    pub name: String,
    pub color: ColorVariant,
    pub mode: ModeVariant,
    /// Pluralized category from the filename grammar.
    pub category: String,
    /// Brand directory the asset belongs to.
    pub brand: String,
    /// Display title: brand + normalized stem (`gitlab arrow mono`).
    pub title: String,
    /// Source file to read.
    pub input_path: PathBuf,
    /// Directory all generated artifacts for this asset land in.
    pub output_dir: PathBuf,
    /// `output_dir` relative to the output root, used by the safety check
    /// and the directory-creation cache.
    pub output_rel_dir: PathBuf,
    /// Generated component module (`<brand>/<name>.ts`).
    pub component_path: PathBuf,
    /// Generated structural-tree data file (`<brand>/<name>.json`).
    pub data_path: PathBuf,
}

impl AssetPaths {
    /// Plan all paths for one discovered asset file.
    ///
    /// `parent_dir` is the directory the file was discovered in; its final
    /// segment is the brand. The directory structure between `source_root`
    /// and the file is mirrored under `output_root`.
    pub fn plan(
        source_root: &Path,
        output_root: &Path,
        parent_dir: &Path,
        file_name: &str,
    ) -> Result<Self, FileProcessingError> {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());

        let parsed = naming::parse_file_name(&stem)?;

        let brand = parent_dir
            .file_name()
            .map(|b| b.to_string_lossy().to_string())
            .ok_or_else(|| FileProcessingError::MissingBrand(parent_dir.to_path_buf()))?;

        let title = format!("{brand} {}", naming::normalize(&stem));

        // Mirror the source-relative directory under the output root. A
        // parent outside the source root degrades to just the brand segment.
        let output_rel_dir = parent_dir
            .strip_prefix(source_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(&brand));
        validate_path(&output_rel_dir)?;

        let output_dir = output_root.join(&output_rel_dir);
        let component_path = output_dir.join(format!("{stem}.ts"));
        let data_path = output_dir.join(format!("{stem}.json"));

        Ok(Self {
            name: stem,
            color: parsed.color,
            mode: parsed.mode,
            category: parsed.category,
            brand,
            title,
            input_path: parent_dir.join(file_name),
            output_dir,
            output_rel_dir,
            component_path,
            data_path,
        })
    }
}

/// Validate that an output-relative path is safe to create files under.
///
/// Applied before any filesystem write. Rejects empty paths, paths with
/// parent-directory traversal segments, and absolute paths.
pub fn validate_path(path: &Path) -> Result<(), FileProcessingError> {
    let unsafe_path = |reason| FileProcessingError::UnsafePath {
        path: path.to_path_buf(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(unsafe_path("empty path"));
    }
    if path.is_absolute() {
        return Err(unsafe_path("absolute path"));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(unsafe_path("path traversal"));
    }
    Ok(())
}
