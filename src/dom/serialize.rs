//! HTML serialization of the arena tree.
//!
//! Output follows the whatwg serialization rules: void elements have no end
//! tag, `script`/`style` content is emitted raw, and text/attribute values
//! are escaped. Combined with the canonical attribute order established at
//! parse time, serialization is a fixed point: `serialize(parse(s)) == s`
//! for any `s` this module produced, which is what the
//! write-only-if-changed pass relies on.

use crate::dom::tree::{DomTree, ElementData, NodeData, NodeId};

/// Elements with no content and no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize the whole document.
pub fn serialize(tree: &DomTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        write_node(tree, child, false, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, raw_text: bool, out: &mut String) {
    match tree.data(id) {
        NodeData::Document => {}
        NodeData::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        NodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeData::Element(el) => write_element(tree, id, el, out),
    }
}

fn write_element(tree: &DomTree, id: NodeId, el: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in el.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
    for &child in tree.children(id) {
        write_node(tree, child, raw_text, out);
    }

    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_document;

    #[test]
    fn serialization_is_a_fixed_point() {
        let input = "<!DOCTYPE html><html><head><title>T &amp; U</title></head>\
                     <body><p class=\"a b\">x</p><img src=\"i.png\"></body></html>";
        let once = serialize(&parse_document(input));
        let twice = serialize(&parse_document(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn script_content_is_raw() {
        let input = "<html><body><script>if (a < b && c > d) go();</script></body></html>";
        let out = serialize(&parse_document(input));
        assert!(out.contains("if (a < b && c > d) go();"));
    }

    #[test]
    fn text_and_attrs_are_escaped() {
        let input = "<html><body><a href=\"/?q=1&amp;r=2\">a &amp; b</a></body></html>";
        let out = serialize(&parse_document(input));
        assert!(out.contains("href=\"/?q=1&amp;r=2\""));
        assert!(out.contains(">a &amp; b<"));
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let out = serialize(&parse_document("<html><head><meta name=\"a\" content=\"b\"></head></html>"));
        assert!(out.contains("<meta content=\"b\" name=\"a\">"));
        assert!(!out.contains("</meta>"));
    }
}
