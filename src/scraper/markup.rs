//! Serialize a scraped element back to markup, applying attribute overrides.
//!
//! Output is XHTML-friendly: void elements are self-closed and attributes are sorted by name.

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node};
use std::collections::{BTreeMap, HashMap};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Attribute values to set on specific nodes when serializing (name, value).
#[derive(Debug, Default)]
pub(crate) struct AttrOverrides {
    by_node: HashMap<NodeId, Vec<(String, String)>>,
}

impl AttrOverrides {
    pub(crate) fn set(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let attrs = self.by_node.entry(node).or_default();
        attrs.retain(|(n, _)| n != name);
        attrs.push((name.to_string(), value.into()));
    }

    fn get(&self, node: NodeId) -> &[(String, String)] {
        self.by_node.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Serialize `root` (including its own tag) to a markup string.
pub(crate) fn serialize_element(root: ElementRef<'_>, overrides: &AttrOverrides) -> String {
    let mut out = String::new();
    write_node(*root, overrides, false, &mut out);
    out
}

fn write_node(node: NodeRef<'_, Node>, overrides: &AttrOverrides, raw_text: bool, out: &mut String) {
    match node.value() {
        Node::Element(el) => {
            let name = el.name();
            let mut attrs: BTreeMap<&str, &str> = el.attrs().collect();
            for (k, v) in overrides.get(node.id()) {
                attrs.insert(k.as_str(), v.as_str());
            }
            out.push('<');
            out.push_str(name);
            for (k, v) in &attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(v));
                out.push('"');
            }
            if VOID_ELEMENTS.contains(&name) {
                out.push_str(" />");
                return;
            }
            out.push('>');
            let raw = RAW_TEXT_ELEMENTS.contains(&name);
            for child in node.children() {
                write_node(child, overrides, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&html_escape::encode_text(&**text));
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, overrides, raw_text, out);
            }
        }
        _ => {}
    }
}
