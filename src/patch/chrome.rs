//! Removal of vendor-inserted branding: the badge, the template promo
//! strip, and the footer credits.
//!
//! Each matcher prefers removing the vendor's animation/spacing wrapper (or
//! credit container) over the bare anchor so the layout closes up instead
//! of keeping an empty slot.

use crate::config::{ChromeConfig, StripRule};
use crate::dom::{DomTree, NodeId};
use crate::patch::PassReport;

/// Delete the vendor badge container by id. No-op when absent.
pub(crate) fn remove_badge(config: &ChromeConfig, dom: &mut DomTree, report: &mut PassReport) {
    if let Some(badge) = dom.element_by_id_attr(&config.badge_id) {
        dom.detach(badge);
        report.badges_removed += 1;
    }
}

/// Delete promo-strip anchors ("A minimal portfolio template", "View all
/// templates"), taking the nearest animation wrapper with them.
pub(crate) fn remove_promo_strips(
    config: &ChromeConfig,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    for anchor in matching_anchors(dom, &config.promo) {
        let wrapper = dom
            .closest(anchor, |el| el.attr(&config.wrapper_attr).is_some())
            .unwrap_or(anchor);
        dom.detach(wrapper);
        report.promos_removed += 1;
    }
}

/// Delete footer credit anchors ("Made in Framer" and friends). Removal
/// target preference: credit container div, then animation wrapper, then
/// the anchor itself.
pub(crate) fn remove_footer_credits(
    config: &ChromeConfig,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    for anchor in matching_anchors(dom, &config.footer) {
        let wrapper = dom
            .closest(anchor, |el| {
                el.name == "div"
                    && el
                        .attr("class")
                        .map(|c| c.ends_with(&config.container_class_suffix))
                        .unwrap_or(false)
            })
            .or_else(|| dom.closest(anchor, |el| el.attr(&config.wrapper_attr).is_some()))
            .unwrap_or(anchor);
        dom.detach(wrapper);
        report.credits_removed += 1;
    }
}

/// Anchors whose href starts with one of the rule's prefixes and whose
/// visible text is non-empty and contains one of its phrases.
fn matching_anchors(dom: &DomTree, rule: &StripRule) -> Vec<NodeId> {
    dom.elements_named(dom.root(), "a")
        .into_iter()
        .filter(|&a| {
            let Some(href) = dom.element(a).and_then(|el| el.attr("href")) else {
                return false;
            };
            if !rule.href_prefixes.iter().any(|p| href.starts_with(p)) {
                return false;
            }
            let text = dom.text_content(a);
            let text = text.trim();
            !text.is_empty() && rule.phrases.iter().any(|p| text.contains(p))
        })
        .collect()
}
