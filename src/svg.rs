//! Vector processing: read, optimize, and parse one SVG source file.
//!
//! The processor treats optimization and markup parsing as library calls:
//! [`usvg`] re-serializes the source through its simplified representation
//! (stripping comments, metadata, and editor cruft, normalizing attributes,
//! and prefixing ids so icons can coexist in one document), and
//! [`quick_xml`] parses the optimized text into the generic
//! [`ElementNode`] tree the transformer consumes.
//!
//! CSS class definitions inside `<defs><style>` blocks are lifted into
//! synthetic [`ElementNode::ClassRule`] children during parsing, so the
//! transformer sees structured per-class declaration maps instead of an
//! opaque stylesheet string.
//!
//! The processor must be initialized exactly once before first use;
//! `initialize` loads and validates the optimizer configuration, and using
//! the processor before that fails with `NotInitialized`.

use crate::config::ConfigError;
use crate::error::FileProcessingError;
use crate::tree::{ElementNode, parse_css_classes};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;
use std::path::Path;

type ParseError = Box<dyn std::error::Error + Send + Sync>;

/// Optimizer settings loaded once at processor initialization.
///
/// `precision` bounds coordinate/transform output digits; `prefix_ids`
/// namespaces element ids with the asset's filename stem so generated
/// documents can be inlined side by side without id collisions.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub precision: u8,
    pub prefix_ids: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            precision: 8,
            prefix_ids: true,
        }
    }
}

impl OptimizerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        // usvg caps serialization precision at 16 significant digits.
        if self.precision == 0 || self.precision > 16 {
            return Err(ConfigError::Validation(format!(
                "optimizer precision must be 1-16, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

struct InitializedState {
    options: usvg::Options<'static>,
    config: OptimizerConfig,
}

/// SVG processor handling optimization and structural parsing.
pub struct SvgProcessor {
    state: Option<InitializedState>,
}

impl SvgProcessor {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Load and validate the optimizer configuration.
    ///
    /// Must be called exactly once before [`Self::process_file`]. A
    /// configuration failure here is fatal for the run.
    pub fn initialize(&mut self, config: OptimizerConfig) -> Result<(), ConfigError> {
        config.validate()?;

        self.state = Some(InitializedState {
            options: usvg::Options::default(),
            config,
        });
        tracing::debug!("optimizer configuration loaded");
        Ok(())
    }

    /// Process one SVG file: read, optimize, parse.
    ///
    /// Pure transform apart from the read; any failure is wrapped with the
    /// input path and propagates without retry.
    pub async fn process_file(&self, input_path: &Path) -> Result<ElementNode, FileProcessingError> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| FileProcessingError::NotInitialized(input_path.to_path_buf()))?;

        let raw = tokio::fs::read_to_string(input_path).await.map_err(|source| {
            FileProcessingError::Read {
                path: input_path.to_path_buf(),
                source,
            }
        })?;

        let optimized = optimize(&raw, state, input_path)?;

        let tree = parse_markup(&optimized).map_err(|source| FileProcessingError::Parse {
            path: input_path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            input_path = %input_path.display(),
            original_size = raw.len(),
            optimized_size = optimized.len(),
            "processed SVG file"
        );

        Ok(tree)
    }

    /// Whether `initialize` has run.
    pub fn initialized(&self) -> bool {
        self.state.is_some()
    }
}

impl Default for SvgProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the optimizer: parse with usvg and re-serialize the simplified tree.
fn optimize(
    raw: &str,
    state: &InitializedState,
    input_path: &Path,
) -> Result<String, FileProcessingError> {
    let tree = usvg::Tree::from_data(raw.as_bytes(), &state.options).map_err(|source| {
        FileProcessingError::Optimize {
            path: input_path.to_path_buf(),
            source,
        }
    })?;

    let id_prefix = if state.config.prefix_ids {
        input_path
            .file_stem()
            .map(|stem| format!("{}_", stem.to_string_lossy()))
    } else {
        None
    };

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        id_prefix,
        coordinates_precision: state.config.precision,
        transforms_precision: state.config.precision,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options))
}

/// Parse optimized markup text into a structural tree.
///
/// Exposed separately from the processor so the parser can be exercised on
/// arbitrary markup (the optimizer strips `<defs><style>` in practice, but
/// the lifting below still applies to any markup that carries one).
pub fn parse_markup(xml: &str) -> Result<ElementNode, ParseError> {
    let mut reader = Reader::from_str(xml);

    // Stack of open elements; children accumulate on the top entry.
    let mut stack: Vec<(String, BTreeMap<String, String>, Vec<ElementNode>)> = Vec::new();
    let mut root: Option<ElementNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (name, attributes) = read_tag(&start)?;
                stack.push((name, attributes, Vec::new()));
            }
            Event::Empty(start) => {
                let (name, attributes) = read_tag(&start)?;
                let node = ElementNode::element(name, attributes, Vec::new());
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let (name, attributes, children) =
                    stack.pop().ok_or("unbalanced closing tag")?;
                let node = ElementNode::element(name, attributes, children);
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let decoded = reader.decoder().decode(text.as_ref())?.into_owned();
                let value = quick_xml::escape::unescape(&decoded)?.trim().to_string();
                if !value.is_empty()
                    && let Some((_, _, children)) = stack.last_mut()
                {
                    children.push(ElementNode::Text { value });
                }
            }
            Event::Eof => break,
            // Declarations, comments, CDATA, PIs and doctypes carry no
            // structural content for the component output.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unclosed element at end of input".into());
    }

    let mut root = root.ok_or("no root element found")?;
    lift_class_rules(&mut root);
    Ok(root)
}

fn read_tag(start: &BytesStart<'_>) -> Result<(String, BTreeMap<String, String>), ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        attributes.insert(key, value);
    }
    Ok((name, attributes))
}

fn attach(
    stack: &mut [(String, BTreeMap<String, String>, Vec<ElementNode>)],
    root: &mut Option<ElementNode>,
    node: ElementNode,
) -> Result<(), ParseError> {
    if let Some((_, _, children)) = stack.last_mut() {
        children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err("multiple root elements".into());
    }
    Ok(())
}

/// Replace the text children of any `<defs><style>` element with the CSS
/// class rules parsed from that text.
fn lift_class_rules(node: &mut ElementNode) {
    let ElementNode::Element { name, children, .. } = node else {
        return;
    };

    if name == "defs" {
        for child in children.iter_mut() {
            if child.name() == Some("style") {
                let ElementNode::Element { children: style_children, .. } = child else {
                    continue;
                };
                let css: String = style_children
                    .iter()
                    .filter_map(|c| match c {
                        ElementNode::Text { value } => Some(value.as_str()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                *style_children = parse_css_classes(&css);
            }
        }
    }

    for child in children {
        lift_class_rules(child);
    }
}
