//! Markup-to-component transformation.
//!
//! Walks a [`ElementNode`] tree depth-first and prints the generated
//! TypeScript/JSX component module for one icon, plus the export statement
//! the index stream appends per asset.
//!
//! Translation rules:
//!
//! - An element with no children prints as a self-closing tag; otherwise as
//!   an opening tag, indented children, and a closing tag.
//! - Attribute keys are camelCased for JSX (`stroke-width` → `strokeWidth`).
//! - A `style` attribute is re-emitted as a structured object literal
//!   (`style={{ fillRule: "evenodd" }}`), not a string, so consuming code
//!   can merge or override individual declarations. Malformed declarations
//!   are dropped per-declaration (lenient policy, logged at debug by the
//!   declaration parser).
//! - The root element receives a `{...props}` spread so callers can pass
//!   class names, event handlers, and other overrides through.
//! - Lifted [`ElementNode::ClassRule`] children print as nested object
//!   literals rather than markup; they are styling metadata, not
//!   renderable nodes.
//!
//! Output is deterministic: the same tree always prints byte-identical
//! text (attribute and declaration maps are ordered).

use crate::naming::camel_case;
use crate::tree::{ElementNode, parse_declarations};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Generate the component module source for one icon.
///
/// `title` is the asset title (brand + normalized name); the exported
/// identifier is its camelCase form.
pub fn create_component(title: &str, tree: &ElementNode) -> String {
    let ident = camel_case(title);
    let mut out = String::new();

    out.push_str("import type { SVGProps } from \"react\";\n\n");
    let _ = writeln!(
        out,
        "export const {ident} = (props: SVGProps<SVGSVGElement>) => {{"
    );
    out.push_str("  return (\n");
    print_node(&mut out, tree, 2, true);
    out.push_str("  );\n};\n\n");
    let _ = writeln!(out, "export default {ident};");

    out
}

/// Generate the index re-export statement for one generated component.
///
/// `dir` is the component's directory relative to the output root (the
/// brand directory in the common case).
pub fn create_export(title: &str, dir: &str, name: &str) -> String {
    format!(
        "export {{ {} }} from \"./{dir}/{name}\";\n",
        camel_case(title)
    )
}

fn print_node(out: &mut String, node: &ElementNode, depth: usize, is_root: bool) {
    let pad = "  ".repeat(depth);

    match node {
        ElementNode::Element {
            name,
            attributes,
            children,
        } => {
            // A lifted style element holds only class rules; print them as
            // one combined object literal instead of a markup element.
            if name == "style"
                && !children.is_empty()
                && children.iter().all(ElementNode::is_class_rule)
            {
                let _ = writeln!(out, "{pad}{{{}}}", class_rules_literal(children));
                return;
            }

            let _ = write!(out, "{pad}<{name}");
            if is_root {
                out.push_str(" {...props}");
            }
            for (key, value) in attributes {
                out.push(' ');
                push_attribute(out, key, value);
            }

            if children.is_empty() {
                out.push_str(" />\n");
            } else {
                out.push_str(">\n");
                for child in children {
                    print_node(out, child, depth + 1, false);
                }
                let _ = writeln!(out, "{pad}</{name}>");
            }
        }
        ElementNode::Text { value } => {
            let _ = writeln!(out, "{pad}{{{}}}", js_string(value));
        }
        ElementNode::ClassRule { name, declarations } => {
            let _ = writeln!(
                out,
                "{pad}{{{{ {}: {} }}}}",
                js_string(name),
                object_literal(declarations)
            );
        }
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    if key == "style" {
        let declarations = parse_declarations(value);
        let _ = write!(out, "style={{{}}}", style_object(&declarations));
    } else {
        let _ = write!(out, "{}=\"{}\"", camel_case(key), value.replace('"', "&quot;"));
    }
}

/// `{ fillRule: "evenodd", clipRule: "evenodd" }` with camelCased keys.
fn style_object(declarations: &BTreeMap<String, String>) -> String {
    if declarations.is_empty() {
        return "{}".to_string();
    }
    let body = declarations
        .iter()
        .map(|(prop, value)| format!("{}: {}", camel_case(prop), js_string(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{ {body} }}")
}

/// `{ "cls-1": { fill: "#fff" }, "cls-2": { ... } }` across all rules of a
/// lifted style element, doubled into a JSX expression container.
fn class_rules_literal(rules: &[ElementNode]) -> String {
    let body = rules
        .iter()
        .filter_map(|rule| match rule {
            ElementNode::ClassRule { name, declarations } => Some(format!(
                "{}: {}",
                js_string(name),
                object_literal(declarations)
            )),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{ {body} }}")
}

fn object_literal(declarations: &BTreeMap<String, String>) -> String {
    style_object(declarations)
}

fn js_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementNode;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn leaf(name: &str, pairs: &[(&str, &str)]) -> ElementNode {
        ElementNode::element(name, attrs(pairs), Vec::new())
    }

    #[test]
    fn leaf_root_is_self_closing_with_props_spread() {
        let tree = leaf("svg", &[("viewBox", "0 0 24 24")]);
        let out = create_component("gitlab arrow", &tree);

        assert!(out.contains("import type { SVGProps } from \"react\";"));
        assert!(out.contains(
            "export const gitlabArrow = (props: SVGProps<SVGSVGElement>) => {"
        ));
        assert!(out.contains("<svg {...props} viewBox=\"0 0 24 24\" />"));
        assert!(out.contains("export default gitlabArrow;"));
    }

    #[test]
    fn nested_children_get_open_close_tags() {
        let tree = ElementNode::element(
            "svg",
            attrs(&[("viewBox", "0 0 24 24")]),
            vec![ElementNode::element(
                "g",
                attrs(&[("id", "a")]),
                vec![leaf("path", &[("d", "M0 0h24")])],
            )],
        );
        let out = create_component("gitlab arrow", &tree);

        assert!(out.contains("<svg {...props} viewBox=\"0 0 24 24\">"));
        assert!(out.contains("<g id=\"a\">"));
        assert!(out.contains("<path d=\"M0 0h24\" />"));
        assert!(out.contains("</g>"));
        assert!(out.contains("</svg>"));
    }

    #[test]
    fn only_root_gets_props_spread() {
        let tree = ElementNode::element(
            "svg",
            BTreeMap::new(),
            vec![leaf("path", &[("d", "M0 0")])],
        );
        let out = create_component("x", &tree);
        assert_eq!(out.matches("{...props}").count(), 1);
    }

    #[test]
    fn style_attribute_becomes_object_literal() {
        let tree = leaf(
            "svg",
            &[("style", "fill-rule: evenodd; clip-rule: evenodd")],
        );
        let out = create_component("x", &tree);
        assert!(out.contains(
            "style={{ clipRule: \"evenodd\", fillRule: \"evenodd\" }}"
        ));
    }

    #[test]
    fn malformed_style_declarations_dropped_not_fatal() {
        let tree = leaf("svg", &[("style", "fill: red; nonsense; stroke:")]);
        let out = create_component("x", &tree);
        assert!(out.contains("style={{ fill: \"red\" }}"));
    }

    #[test]
    fn attribute_keys_are_camel_cased() {
        let tree = leaf("path", &[("stroke-width", "2"), ("fill-rule", "evenodd")]);
        let out = create_component("x", &tree);
        assert!(out.contains("strokeWidth=\"2\""));
        assert!(out.contains("fillRule=\"evenodd\""));
    }

    #[test]
    fn class_rules_print_as_object_literal_not_markup() {
        let style = ElementNode::element(
            "style",
            BTreeMap::new(),
            vec![
                ElementNode::ClassRule {
                    name: "cls-1".to_string(),
                    declarations: attrs(&[("fill", "#fff")]),
                },
                ElementNode::ClassRule {
                    name: "cls-2".to_string(),
                    declarations: attrs(&[("stroke-width", "2")]),
                },
            ],
        );
        let tree = ElementNode::element(
            "svg",
            BTreeMap::new(),
            vec![ElementNode::element("defs", BTreeMap::new(), vec![style])],
        );
        let out = create_component("x", &tree);

        assert!(!out.contains("<style"));
        assert!(out.contains(
            "{{ \"cls-1\": { fill: \"#fff\" }, \"cls-2\": { strokeWidth: \"2\" } }}"
        ));
    }

    #[test]
    fn text_children_print_as_string_expressions() {
        let tree = ElementNode::element(
            "svg",
            BTreeMap::new(),
            vec![ElementNode::element(
                "title",
                BTreeMap::new(),
                vec![ElementNode::Text {
                    value: "An \"icon\"".to_string(),
                }],
            )],
        );
        let out = create_component("x", &tree);
        assert!(out.contains("{\"An \\\"icon\\\"\"}"));
    }

    #[test]
    fn output_is_deterministic() {
        let tree = ElementNode::element(
            "svg",
            attrs(&[("viewBox", "0 0 24 24"), ("fill", "none")]),
            vec![
                leaf("path", &[("d", "M0 0h24"), ("style", "fill:red;stroke:blue")]),
                leaf("circle", &[("cx", "12"), ("cy", "12"), ("r", "10")]),
            ],
        );
        let first = create_component("gitlab arrow-mono", &tree);
        let second = create_component("gitlab arrow-mono", &tree);
        assert_eq!(first, second);
    }

    #[test]
    fn export_statement_shape() {
        assert_eq!(
            create_export("gitlab arrow mono", "gitlab", "arrow-mono"),
            "export { gitlabArrowMono } from \"./gitlab/arrow-mono\";\n"
        );
    }
}
