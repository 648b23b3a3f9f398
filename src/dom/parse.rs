//! HTML parsing into the arena tree.
//!
//! Parsing goes through the `scraper` crate (html5ever underneath), so the
//! input is interpreted exactly as a browser would: implied `html`/`head`/
//! `body` elements are materialized, entities are decoded, and tag and
//! attribute names are lowercased.

use scraper::{Html, Node};

use crate::dom::tree::{DomTree, ElementData, NodeData, NodeId};

/// Parse a full HTML document into a [`DomTree`].
pub fn parse_document(html: &str) -> DomTree {
    let parsed = Html::parse_document(html);
    let mut tree = DomTree::new();
    let root = tree.root();
    for child in parsed.tree.root().children() {
        convert(&mut tree, root, child);
    }
    tree
}

fn convert(tree: &mut DomTree, parent: NodeId, node: ego_tree::NodeRef<'_, Node>) {
    match node.value() {
        // html5ever only emits these at the top; flatten into our root.
        Node::Document | Node::Fragment => {
            for child in node.children() {
                convert(tree, parent, child);
            }
        }
        Node::Doctype(doctype) => {
            tree.append(parent, NodeData::Doctype(doctype.name().to_string()));
        }
        Node::Comment(comment) => {
            tree.append(parent, NodeData::Comment(comment.to_string()));
        }
        Node::Text(text) => {
            tree.append(parent, NodeData::Text(text.to_string()));
        }
        Node::Element(element) => {
            let mut data = ElementData::new(element.name());
            for (name, value) in element.attrs() {
                data.set_attr(name, value);
            }
            let id = tree.append(parent, NodeData::Element(data));
            for child in node.children() {
                convert(tree, id, child);
            }
        }
        Node::ProcessingInstruction(_) => {}
    }
}
