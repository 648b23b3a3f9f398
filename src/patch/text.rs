//! Text-node and metadata replacement passes.

use crate::config::MetaConfig;
use crate::dom::{walk_text_nodes, DomTree, NodeId, WalkDecision};
use crate::patch::PassReport;
use crate::rules::RuleSet;

/// Elements whose text must never be rewritten.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Apply the rule list to every text node under `root` (default: the
/// `<body>` element; a document without one is left alone). Nodes are only
/// written back when the result differs.
pub(crate) fn apply_text_replacements(
    rules: &RuleSet,
    dom: &mut DomTree,
    root: Option<NodeId>,
    report: &mut PassReport,
) {
    let Some(root) = root.or_else(|| dom.first_descendant_named(dom.root(), "body")) else {
        return;
    };

    let rewritten = walk_text_nodes(
        dom,
        root,
        |el| {
            if SKIPPED_ELEMENTS.contains(&el.name.as_str()) {
                WalkDecision::SkipSubtree
            } else {
                WalkDecision::Continue
            }
        },
        |text| rules.apply(text),
    );
    report.text_nodes_rewritten += rewritten;
}

/// Apply the rule list to the document title and to the configured meta
/// tags' `content` attributes.
pub(crate) fn apply_meta_replacements(
    config: &MetaConfig,
    rules: &RuleSet,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    if let Some(title) = dom.first_descendant_named(dom.root(), "title") {
        let current = dom.text_content(title);
        if let Some(next) = rules.apply(&current) {
            dom.set_text(title, &next);
            report.metas_rewritten += 1;
        }
    }

    let mut updates: Vec<(NodeId, String)> = Vec::new();
    for meta in dom.elements_named(dom.root(), "meta") {
        let Some(el) = dom.element(meta) else { continue };
        let matched = el
            .attr("name")
            .map(|n| config.names.iter().any(|k| k == n))
            .unwrap_or(false)
            || el
                .attr("property")
                .map(|p| config.properties.iter().any(|k| k == p))
                .unwrap_or(false);
        if !matched {
            continue;
        }
        let Some(content) = el.attr("content") else { continue };
        if let Some(next) = rules.apply(content) {
            updates.push((meta, next));
        }
    }
    for (meta, next) in updates {
        if let Some(el) = dom.element_mut(meta) {
            el.set_attr("content", &next);
            report.metas_rewritten += 1;
        }
    }
}
