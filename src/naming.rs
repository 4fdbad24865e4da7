//! Filename grammar parsing and text normalization.
//!
//! Asset filenames follow a single convention across all brands:
//!
//! ```text
//! category[-mono][-dark|-light].svg
//! ```
//!
//! The stem encodes three pieces of identity: the semantic category, an
//! optional monochrome marker, and an optional dark/light mode marker.
//! Categories are pluralized so singular and plural filename variants
//! collapse to one catalog category (`brand.svg` and `brands.svg` both land
//! in `brands`).
//!
//! ## Text helpers
//!
//! Titles and generated identifiers are derived with the same normalization
//! everywhere: camel/Pascal boundaries become spaces, kebab/snake separators
//! collapse to single spaces, and the result is lowercased.
//! - `normalize("GitLab-logo")` → `"git lab logo"`
//! - `camel_case("gitlab logo-mono")` → `"gitlabLogoMono"`

use crate::error::FileProcessingError;
use serde::Serialize;
use std::fmt;

/// Color variant encoded in the filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    Mono,
    #[default]
    Default,
}

/// Display mode variant encoded in the filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeVariant {
    Dark,
    Light,
    #[default]
    Default,
}

impl fmt::Display for ColorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono => write!(f, "mono"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for ModeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Structured identity parsed from an asset filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentity {
    /// Pluralized category (`arrow` → `arrows`).
    pub category: String,
    pub color: ColorVariant,
    pub mode: ModeVariant,
}

/// Parse a filename stem following the `category[-mono][-dark|-light]`
/// grammar.
///
/// The category segment must be non-empty and contain no hyphens; the
/// optional markers must appear in order. Anything else is a data-quality
/// defect and fails with [`FileProcessingError::MalformedFilename`] carrying
/// the offending stem — it is never retried.
///
/// - `"arrow"` → category `arrows`, color `default`, mode `default`
/// - `"arrow-mono"` → category `arrows`, color `mono`, mode `default`
/// - `"arrow-mono-dark"` → category `arrows`, color `mono`, mode `dark`
/// - `"arrow-light"` → category `arrows`, color `default`, mode `light`
/// - `"-bad-"`, `"arrow-"`, `"arrow-dark-mono"` → malformed
pub fn parse_file_name(stem: &str) -> Result<ParsedIdentity, FileProcessingError> {
    let malformed = || FileProcessingError::MalformedFilename(stem.to_string());

    let mut segments = stem.split('-');
    let category = segments.next().filter(|c| !c.is_empty()).ok_or_else(malformed)?;

    let mut color = ColorVariant::Default;
    let mut mode = ModeVariant::Default;

    let mut next = segments.next();
    if next == Some("mono") {
        color = ColorVariant::Mono;
        next = segments.next();
    }
    match next {
        None => {}
        Some("dark") => {
            mode = ModeVariant::Dark;
            next = segments.next();
        }
        Some("light") => {
            mode = ModeVariant::Light;
            next = segments.next();
        }
        Some(_) => return Err(malformed()),
    }
    if next.is_some() {
        return Err(malformed());
    }

    Ok(ParsedIdentity {
        category: pluralize(category),
        color,
        mode,
    })
}

/// Pluralize a category name with standard English suffix rules.
///
/// Words that already end in a plural-looking `s` are left alone so that
/// singular and plural filename variants collapse to the same category.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();

    // Already plural: trailing `s` not part of a sibilant ending.
    if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return word.to_string();
    }

    if lower.ends_with("ss")
        || lower.ends_with("us")
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(prefix) = word.strip_suffix('y') {
        let before_y = prefix.chars().next_back();
        if before_y.is_some_and(|c| !"aeiou".contains(c.to_ascii_lowercase())) {
            return format!("{prefix}ies");
        }
    }

    format!("{word}s")
}

/// Lowercase a name, splitting camel/Pascal boundaries into spaces and
/// collapsing kebab/snake/whitespace separators to single spaces.
pub fn normalize(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in text.chars() {
        if c.is_ascii_uppercase() && prev_lower_or_digit {
            spaced.push(' ');
        }
        prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        spaced.push(c);
    }

    let mut out = String::with_capacity(spaced.len());
    let mut pending_space = false;
    for c in spaced.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Normalize, then uppercase the first letter of every word.
pub fn capitalize(text: &str) -> String {
    let mut out = String::new();
    for (i, word) in normalize(text).split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&upper_first(word));
    }
    out
}

/// Normalize, then join words camelCase style (`gitlab logo` → `gitlabLogo`).
pub fn camel_case(text: &str) -> String {
    let mut out = String::new();
    for (i, word) in normalize(text).split(' ').enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&upper_first(word));
        }
    }
    out
}

/// Normalize, then join words PascalCase style (`gitlab logo` → `GitlabLogo`).
pub fn pascal_case(text: &str) -> String {
    normalize(text)
        .split(' ')
        .map(upper_first)
        .collect()
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
