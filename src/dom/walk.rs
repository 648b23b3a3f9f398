//! Depth-first text-node traversal with a per-element skip filter.

use crate::dom::tree::{DomTree, ElementData, NodeData, NodeId};

/// Verdict of the element filter during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// Descend into this element's subtree.
    Continue,
    /// Skip this element and everything under it.
    SkipSubtree,
}

enum Step {
    Recurse,
    Replace(Option<String>),
    Nothing,
}

/// Walk every text node under `root` in document order.
///
/// `filter` decides per element whether its subtree is visited; `visit`
/// receives each text node's content and may return a replacement. Returns
/// the number of text nodes rewritten. Text directly under `root` is always
/// visited; the filter applies to descendant elements only.
pub fn walk_text_nodes<F, V>(tree: &mut DomTree, root: NodeId, mut filter: F, mut visit: V) -> usize
where
    F: FnMut(&ElementData) -> WalkDecision,
    V: FnMut(&str) -> Option<String>,
{
    let mut rewritten = 0;
    let mut stack: Vec<NodeId> = tree.children(root).iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let step = match tree.data(id) {
            NodeData::Element(el) => match filter(el) {
                WalkDecision::Continue => Step::Recurse,
                WalkDecision::SkipSubtree => Step::Nothing,
            },
            NodeData::Text(text) => Step::Replace(visit(text)),
            _ => Step::Nothing,
        };

        match step {
            Step::Recurse => stack.extend(tree.children(id).iter().rev().copied()),
            Step::Replace(Some(next)) => {
                if let NodeData::Text(text) = tree.data_mut(id) {
                    *text = next;
                    rewritten += 1;
                }
            }
            Step::Replace(None) | Step::Nothing => {}
        }
    }

    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_document;

    #[test]
    fn rewrites_in_document_order() {
        let mut tree = parse_document("<html><body><p>one</p><p>two</p></body></html>");
        let body = tree.first_descendant_named(tree.root(), "body").unwrap();
        let mut seen = Vec::new();
        let n = walk_text_nodes(
            &mut tree,
            body,
            |_| WalkDecision::Continue,
            |text| {
                seen.push(text.to_string());
                Some(text.to_uppercase())
            },
        );
        assert_eq!(n, 2);
        assert_eq!(seen, vec!["one", "two"]);
        assert_eq!(tree.text_content(body), "ONETWO");
    }

    #[test]
    fn skip_subtree_shields_text() {
        let mut tree =
            parse_document("<html><body><p>keep</p><script>var placeholder;</script></body></html>");
        let body = tree.first_descendant_named(tree.root(), "body").unwrap();
        walk_text_nodes(
            &mut tree,
            body,
            |el| {
                if el.name == "script" {
                    WalkDecision::SkipSubtree
                } else {
                    WalkDecision::Continue
                }
            },
            |_| Some("X".to_string()),
        );
        let script = tree.first_descendant_named(tree.root(), "script").unwrap();
        assert_eq!(tree.text_content(script), "var placeholder;");
    }

    #[test]
    fn none_leaves_node_untouched() {
        let mut tree = parse_document("<html><body><p>stay</p></body></html>");
        let body = tree.first_descendant_named(tree.root(), "body").unwrap();
        let n = walk_text_nodes(&mut tree, body, |_| WalkDecision::Continue, |_| None);
        assert_eq!(n, 0);
        assert_eq!(tree.text_content(body), "stay");
    }
}
