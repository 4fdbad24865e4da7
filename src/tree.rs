//! Structural tree model for parsed vector markup.
//!
//! The optimized SVG text is parsed into a generic [`ElementNode`] tree that
//! the transformer walks to emit component source. The node kinds form a
//! closed sum type so the transformer's dispatch is exhaustive at compile
//! time:
//!
//! - `Element`: a markup element with attributes and children
//! - `Text`: character data
//! - `ClassRule`: a lifted CSS class from a `<defs><style>` block, holding
//!   its declaration map — styling metadata, not a renderable node
//!
//! Attribute and declaration maps are ordered (`BTreeMap`) so serializing or
//! transforming the same tree twice yields byte-identical output.

use serde::Serialize;
use std::collections::BTreeMap;

/// One node of the parsed markup tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ElementNode {
    Element {
        name: String,
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<ElementNode>,
    },
    Text {
        value: String,
    },
    /// A CSS class lifted out of a `<defs><style>` block: class name plus
    /// its `property → value` declarations.
    ClassRule {
        name: String,
        declarations: BTreeMap<String, String>,
    },
}

impl ElementNode {
    /// Convenience constructor for an element node.
    pub fn element(
        name: impl Into<String>,
        attributes: BTreeMap<String, String>,
        children: Vec<ElementNode>,
    ) -> Self {
        Self::Element {
            name: name.into(),
            attributes,
            children,
        }
    }

    pub fn is_class_rule(&self) -> bool {
        matches!(self, Self::ClassRule { .. })
    }

    /// Element name, if this is an element.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Parse CSS class rules (`.name { prop: value; ... }`) out of a style
/// block's text.
///
/// Parsing is lenient: a declaration without a `:` or with an empty property
/// or value is dropped (and logged at debug) rather than failing the file.
/// Selectors keep everything after a leading `.`; rules with an empty
/// selector or no surviving declarations are skipped entirely.
pub fn parse_css_classes(css: &str) -> Vec<ElementNode> {
    let mut rules = Vec::new();

    for block in css.split('}') {
        let Some((selector, body)) = block.split_once('{') else {
            continue;
        };
        let class_name = selector.trim().trim_start_matches('.');
        if class_name.is_empty() {
            continue;
        }

        let declarations = parse_declarations(body);
        if declarations.is_empty() {
            continue;
        }

        rules.push(ElementNode::ClassRule {
            name: class_name.to_string(),
            declarations,
        });
    }

    rules
}

/// Parse semicolon-delimited `property: value` declarations, dropping
/// malformed entries per-declaration.
pub fn parse_declarations(body: &str) -> BTreeMap<String, String> {
    let mut declarations = BTreeMap::new();

    for decl in body.split(';') {
        if decl.trim().is_empty() {
            continue;
        }
        match decl.split_once(':') {
            Some((prop, value)) => {
                let prop = prop.trim();
                let value = value.trim();
                if prop.is_empty() || value.is_empty() {
                    tracing::debug!(declaration = decl.trim(), "dropping malformed declaration");
                    continue;
                }
                declarations.insert(prop.to_string(), value.to_string());
            }
            None => {
                tracing::debug!(declaration = decl.trim(), "dropping malformed declaration");
            }
        }
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_class() {
        let rules = parse_css_classes(".cls-1{fill:#fff;stroke:none}");
        assert_eq!(rules.len(), 1);
        let ElementNode::ClassRule { name, declarations } = &rules[0] else {
            panic!("expected class rule");
        };
        assert_eq!(name, "cls-1");
        assert_eq!(declarations["fill"], "#fff");
        assert_eq!(declarations["stroke"], "none");
    }

    #[test]
    fn parses_multiple_classes() {
        let rules = parse_css_classes(".a{fill:red}.b{stroke:blue}");
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(ElementNode::is_class_rule));
    }

    #[test]
    fn trims_selectors_and_values() {
        let rules = parse_css_classes("  .cls-2 { fill : #000 ; } ");
        let ElementNode::ClassRule { name, declarations } = &rules[0] else {
            panic!("expected class rule");
        };
        assert_eq!(name, "cls-2");
        assert_eq!(declarations["fill"], "#000");
    }

    #[test]
    fn malformed_declaration_dropped_not_fatal() {
        let rules = parse_css_classes(".a{fill:red;nonsense;stroke:}");
        let ElementNode::ClassRule { declarations, .. } = &rules[0] else {
            panic!("expected class rule");
        };
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations["fill"], "red");
    }

    #[test]
    fn rule_with_no_valid_declarations_skipped() {
        assert!(parse_css_classes(".a{;;}").is_empty());
        assert!(parse_css_classes("garbage without braces").is_empty());
    }

    #[test]
    fn empty_selector_skipped() {
        assert!(parse_css_classes("{fill:red}").is_empty());
        assert!(parse_css_classes(".{fill:red}").is_empty());
    }

    #[test]
    fn tree_serializes_with_kind_tags() {
        let node = ElementNode::element(
            "svg",
            BTreeMap::from([("viewBox".to_string(), "0 0 24 24".to_string())]),
            vec![ElementNode::Text {
                value: "x".to_string(),
            }],
        );
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""type":"Element""#));
        assert!(json.contains(r#""type":"Text""#));
        assert!(json.contains(r#""viewBox":"0 0 24 24""#));
    }
}
