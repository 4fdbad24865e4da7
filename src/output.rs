//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every asset is its semantic identity — positional index, name,
//! category, and variant markers — with filesystem paths shown as secondary
//! context via indented `Source:` lines. This makes the output readable as a
//! catalog inventory while still letting users trace entries back to files.
//!
//! ## Scan
//!
//! ```text
//! Brands
//! 001 gitlab (3 assets)
//!     Source: assets/gitlab/
//!     001 arrow (arrows)
//!         Source: arrow.svg
//!     002 arrow-mono (arrows, mono)
//!         Source: arrow-mono.svg
//!
//! Skipped
//!     assets/gitlab/arrow-tiny.svg
//!         invalid filename, expected category[-mono][-dark|-light]: arrow-tiny
//! ```
//!
//! ## Generate
//!
//! ```text
//! Generated 3 components
//!     Output: .assets/
//!     Index: .assets/index.ts
//!     Catalog: .assets/metadata.ndjson
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::generate::GenerateSummary;
use crate::naming::{ColorVariant, ModeVariant};
use crate::paths::AssetPaths;
use std::collections::BTreeMap;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Identity detail shown after an asset name: category plus any variant
/// markers, e.g. `(arrows, mono, dark)`.
fn identity_detail(category: &str, color: ColorVariant, mode: ModeVariant) -> String {
    let mut parts = vec![category.to_string()];
    if color == ColorVariant::Mono {
        parts.push("mono".to_string());
    }
    match mode {
        ModeVariant::Dark => parts.push("dark".to_string()),
        ModeVariant::Light => parts.push("light".to_string()),
        ModeVariant::Default => {}
    }
    format!("({})", parts.join(", "))
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output showing the discovered asset inventory grouped by
/// brand, plus any files whose names failed the grammar.
pub fn format_scan_output(assets: &[AssetPaths], problems: &[(String, String)]) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Brands".to_string());

    let mut by_brand: BTreeMap<&str, Vec<&AssetPaths>> = BTreeMap::new();
    for asset in assets {
        by_brand.entry(&asset.brand).or_default().push(asset);
    }

    for (position, (brand, brand_assets)) in by_brand.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} assets)",
            format_index(position + 1),
            brand,
            brand_assets.len()
        ));
        if let Some(first) = brand_assets.first()
            && let Some(source_dir) = first.input_path.parent()
        {
            lines.push(format!("    Source: {}/", source_dir.display()));
        }

        for (i, asset) in brand_assets.iter().enumerate() {
            lines.push(format!(
                "    {} {} {}",
                format_index(i + 1),
                asset.name,
                identity_detail(&asset.category, asset.color, asset.mode)
            ));
            if let Some(file_name) = asset.input_path.file_name() {
                lines.push(format!("        Source: {}", file_name.to_string_lossy()));
            }
        }
    }

    if !problems.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for (source, message) in problems {
            lines.push(format!("    {}", source));
            lines.push(format!("        {}", message));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(assets: &[AssetPaths], problems: &[(String, String)]) {
    for line in format_scan_output(assets, problems) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format check output: every file that fails the filename grammar or the
/// path safety rules, or a single all-clear line.
pub fn format_check_output(checked: usize, problems: &[(String, String)]) -> Vec<String> {
    if problems.is_empty() {
        return vec![format!("All {} assets pass", checked)];
    }

    let mut lines = vec![format!(
        "{} of {} assets have problems",
        problems.len(),
        checked
    )];
    for (source, message) in problems {
        lines.push(format!("    {}", source));
        lines.push(format!("        {}", message));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(checked: usize, problems: &[(String, String)]) {
    for line in format_check_output(checked, problems) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

/// Format the post-run generation summary.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    vec![
        format!("Generated {} components", summary.assets),
        format!("    Output: {}/", summary.output_root.display()),
        format!("    Index: {}", summary.index_path.display()),
        format!("    Catalog: {}", summary.metadata_path.display()),
    ]
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}
