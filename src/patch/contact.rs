//! Hero heading and contact-link canonicalization.
//!
//! Contact entries are anchors wrapping an `<h3>` channel label and an
//! `<h4>` value. Hrefs are forced to the canonical targets whenever they
//! drift; display text is only rewritten inside a correctly labeled block,
//! so unrelated text that happens to contain "@" or a matching substring
//! is never corrupted. The vendor pipeline has been seen swapping the
//! GitHub card back to its Dribbble original, hence the redundant
//! Dribbble-href pass.

use url::Url;

use crate::config::{HeroConfig, Identity};
use crate::dom::{DomTree, NodeId};
use crate::patch::PassReport;

/// Attribute carrying the copy-to-clipboard payload on email links.
pub const COPY_EMAIL_ATTR: &str = "data-copy-email";

/// Overwrite the hero `<h1>` wholesale when it has drifted.
///
/// The guard fragment keeps this from clobbering unrelated headings: only
/// text that is recognizably the hero bio is replaced.
pub(crate) fn fix_hero_text(config: &HeroConfig, dom: &mut DomTree, report: &mut PassReport) {
    let header = dom.elements_named(dom.root(), "header").into_iter().find(|&h| {
        dom.element(h)
            .and_then(|el| el.attr(&config.header_marker_attr))
            .map(|v| v == config.header_marker_value)
            .unwrap_or(false)
    });
    let Some(header) = header else { return };
    let Some(h1) = dom.first_descendant_named(header, "h1") else {
        return;
    };

    let current = dom.text_content(h1);
    let current = current.trim();
    if current != config.target && current.contains(&config.guard_fragment) {
        dom.set_text(h1, &config.target);
        report.hero_rewritten = true;
    }
}

/// Canonicalize every contact link: email, GitHub, LinkedIn, Twitter/X.
pub(crate) fn fix_contact_links(identity: &Identity, dom: &mut DomTree, report: &mut PassReport) {
    let needles = Needles::for_identity(identity);
    fix_email_links(identity, dom, report);
    fix_github_labeled_links(identity, &needles, dom, report);
    fix_dribbble_mislabels(identity, dom, report);
    fix_linkedin_links(identity, &needles, dom, report);
    fix_twitter_links(identity, &needles, dom, report);
}

/// Substrings that identify an already-canonical href.
struct Needles {
    github: String,
    linkedin: String,
    x: String,
    x_twitter_alias: String,
}

impl Needles {
    fn for_identity(identity: &Identity) -> Self {
        let x = host_path(&identity.x_url);
        Self {
            github: host_path(&identity.github_url),
            linkedin: host_path(&identity.linkedin_url),
            x_twitter_alias: x.replacen("x.com", "twitter.com", 1),
            x,
        }
    }
}

/// `host/path` of a URL with the trailing slash dropped, for substring
/// matching against hrefs regardless of scheme or trailing slash.
fn host_path(raw: &str) -> String {
    let joined = match Url::parse(raw) {
        Ok(url) => format!("{}{}", url.host_str().unwrap_or(""), url.path()),
        Err(_) => raw
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string(),
    };
    joined.trim_end_matches('/').to_string()
}

/// Email links become copy-only: neutral href, no navigation target, the
/// canonical address as the copy payload and as the visible value.
fn fix_email_links(identity: &Identity, dom: &mut DomTree, report: &mut PassReport) {
    let anchors: Vec<NodeId> = dom
        .elements_named(dom.root(), "a")
        .into_iter()
        .filter(|&a| {
            dom.element(a)
                .map(|el| {
                    el.attr(COPY_EMAIL_ATTR).is_some()
                        || el.attr("href").map(|h| h.starts_with("mailto:")).unwrap_or(false)
                })
                .unwrap_or(false)
        })
        .collect();

    for anchor in anchors {
        let mut changed = false;
        if let Some(el) = dom.element_mut(anchor) {
            if el.attr(COPY_EMAIL_ATTR) != Some(identity.email.as_str()) {
                el.set_attr(COPY_EMAIL_ATTR, &identity.email);
                changed = true;
            }
            if el.attr("href") != Some("#") {
                el.set_attr("href", "#");
                changed = true;
            }
            if el.remove_attr("target") {
                changed = true;
            }
        }
        if let Some(value) = value_heading(dom, anchor) {
            let text = dom.text_content(value);
            let text = text.trim();
            if text != identity.email && text.contains('@') {
                dom.set_text(value, &identity.email);
                changed = true;
            }
        }
        if changed {
            report.links_fixed += 1;
        }
    }
}

/// Any contact anchor labeled "GitHub" gets the canonical href and handle,
/// wherever its href currently points.
fn fix_github_labeled_links(
    identity: &Identity,
    needles: &Needles,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    const CONTACT_HREF_MARKERS: &[&str] =
        &["github", "dribbble", "linkedin", "twitter", "x.com", "mailto"];

    let anchors: Vec<NodeId> = dom
        .elements_named(dom.root(), "a")
        .into_iter()
        .filter(|&a| {
            dom.element(a)
                .and_then(|el| el.attr("href"))
                .map(|h| CONTACT_HREF_MARKERS.iter().any(|m| h.contains(m)))
                .unwrap_or(false)
        })
        .collect();

    for anchor in anchors {
        if label_text(dom, anchor).as_deref() != Some("GitHub") {
            continue;
        }
        let mut changed = false;
        let href = dom
            .element(anchor)
            .and_then(|el| el.attr("href"))
            .unwrap_or("")
            .to_string();
        if href.contains("dribbble") || !href.contains(&needles.github) {
            if let Some(el) = dom.element_mut(anchor) {
                el.set_attr("href", &identity.github_url);
                changed = true;
            }
        }
        if set_value_text(dom, anchor, &identity.github_handle) {
            changed = true;
        }
        if changed {
            report.links_fixed += 1;
        }
    }
}

/// Redundant defensive pass: a Dribbble href under a "GitHub" label is
/// corrected even if the pass above missed it.
fn fix_dribbble_mislabels(identity: &Identity, dom: &mut DomTree, report: &mut PassReport) {
    let anchors: Vec<NodeId> = anchors_with_href_containing(dom, &["dribbble"]);
    for anchor in anchors {
        if label_text(dom, anchor).as_deref() != Some("GitHub") {
            continue;
        }
        let mut changed = false;
        if let Some(el) = dom.element_mut(anchor) {
            if el.attr("href") != Some(identity.github_url.as_str()) {
                el.set_attr("href", &identity.github_url);
                changed = true;
            }
        }
        if set_value_text(dom, anchor, &identity.github_handle) {
            changed = true;
        }
        if changed {
            report.links_fixed += 1;
        }
    }
}

fn fix_linkedin_links(
    identity: &Identity,
    needles: &Needles,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    let anchors = anchors_with_href_containing(dom, &["linkedin"]);
    for anchor in anchors {
        let mut changed = false;
        let href = dom
            .element(anchor)
            .and_then(|el| el.attr("href"))
            .unwrap_or("")
            .to_string();
        if !href.contains(&needles.linkedin) {
            if let Some(el) = dom.element_mut(anchor) {
                el.set_attr("href", &identity.linkedin_url);
                changed = true;
            }
        }
        if block_label(dom, anchor).as_deref() == Some("LinkedIn")
            && set_value_text(dom, anchor, &identity.linkedin_handle)
        {
            changed = true;
        }
        if changed {
            report.links_fixed += 1;
        }
    }
}

fn fix_twitter_links(
    identity: &Identity,
    needles: &Needles,
    dom: &mut DomTree,
    report: &mut PassReport,
) {
    let anchors = anchors_with_href_containing(dom, &["twitter", "x.com"]);
    for anchor in anchors {
        let mut changed = false;
        let href = dom
            .element(anchor)
            .and_then(|el| el.attr("href"))
            .unwrap_or("")
            .to_string();
        if !href.contains(&needles.x) && !href.contains(&needles.x_twitter_alias) {
            if let Some(el) = dom.element_mut(anchor) {
                el.set_attr("href", &identity.x_url);
                changed = true;
            }
        }
        if block_label(dom, anchor).as_deref() == Some("Twitter")
            && set_value_text(dom, anchor, &identity.x_handle)
        {
            changed = true;
        }
        if changed {
            report.links_fixed += 1;
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────────────

fn anchors_with_href_containing(dom: &DomTree, markers: &[&str]) -> Vec<NodeId> {
    dom.elements_named(dom.root(), "a")
        .into_iter()
        .filter(|&a| {
            dom.element(a)
                .and_then(|el| el.attr("href"))
                .map(|h| markers.iter().any(|m| h.contains(m)))
                .unwrap_or(false)
        })
        .collect()
}

/// The anchor's own `<h3>` label, trimmed.
fn label_text(dom: &DomTree, anchor: NodeId) -> Option<String> {
    let h3 = dom.first_descendant_named(anchor, "h3")?;
    Some(dom.text_content(h3).trim().to_string())
}

/// The label of the contact block around the anchor: the first `<h3>`
/// under its nearest `div` ancestor.
fn block_label(dom: &DomTree, anchor: NodeId) -> Option<String> {
    let block = dom.closest(anchor, |el| el.name == "div")?;
    let h3 = dom.first_descendant_named(block, "h3")?;
    Some(dom.text_content(h3).trim().to_string())
}

/// The anchor's `<h4>` value heading.
fn value_heading(dom: &DomTree, anchor: NodeId) -> Option<NodeId> {
    dom.first_descendant_named(anchor, "h4")
}

/// Rewrite the `<h4>` value when it differs. Returns whether it changed.
fn set_value_text(dom: &mut DomTree, anchor: NodeId, text: &str) -> bool {
    let Some(value) = value_heading(dom, anchor) else {
        return false;
    };
    if dom.text_content(value).trim() == text {
        return false;
    }
    dom.set_text(value, text);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HeroConfig, Identity};
    use crate::dom::parse_document;

    fn identity() -> Identity {
        Identity::default()
    }

    fn contact_card(label: &str, href: &str, value: &str) -> String {
        format!(
            "<div class=\"contact-card\"><a href=\"{href}\">\
             <h3>{label}</h3><h4>{value}</h4></a></div>"
        )
    }

    #[test]
    fn hero_is_overwritten_when_guarded_fragment_matches() {
        let config = HeroConfig::default();
        let mut dom = parse_document(
            "<html><body><header data-framer-name=\"Section / Header\">\
             <h1>I'm an AI-focused software engineer. Based somewhere else.</h1>\
             </header></body></html>",
        );
        let mut report = PassReport::default();
        fix_hero_text(&config, &mut dom, &mut report);
        assert!(report.hero_rewritten);
        let h1 = dom.first_descendant_named(dom.root(), "h1").unwrap();
        assert_eq!(dom.text_content(h1), config.target);

        // Converged heading is left alone.
        let mut second = PassReport::default();
        fix_hero_text(&config, &mut dom, &mut second);
        assert!(!second.hero_rewritten);
    }

    #[test]
    fn hero_without_fragment_is_untouched() {
        let mut dom = parse_document(
            "<html><body><header data-framer-name=\"Section / Header\">\
             <h1>Completely unrelated headline</h1></header></body></html>",
        );
        let mut report = PassReport::default();
        fix_hero_text(&HeroConfig::default(), &mut dom, &mut report);
        assert!(!report.hero_rewritten);
        let h1 = dom.first_descendant_named(dom.root(), "h1").unwrap();
        assert_eq!(dom.text_content(h1), "Completely unrelated headline");
    }

    #[test]
    fn github_label_heals_dribbble_href() {
        let html = format!(
            "<html><body>{}</body></html>",
            contact_card("GitHub", "https://dribbble.com/bryntaylor", "bryntaylor")
        );
        let mut dom = parse_document(&html);
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        assert!(report.links_fixed >= 1);
        let a = dom.first_descendant_named(dom.root(), "a").unwrap();
        assert_eq!(
            dom.element(a).unwrap().attr("href"),
            Some("https://github.com/youpesh")
        );
        let h4 = dom.first_descendant_named(a, "h4").unwrap();
        assert_eq!(dom.text_content(h4), "youpesh");
    }

    #[test]
    fn email_link_becomes_copy_only() {
        let html = format!(
            "<html><body>{}</body></html>",
            "<div><a href=\"mailto:hi@email.com\" target=\"_blank\">\
             <h3>Email</h3><h4>hi@email.com</h4></a></div>"
        );
        let mut dom = parse_document(&html);
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        let a = dom.first_descendant_named(dom.root(), "a").unwrap();
        let el = dom.element(a).unwrap();
        assert_eq!(el.attr("href"), Some("#"));
        assert_eq!(el.attr("target"), None);
        assert_eq!(el.attr(COPY_EMAIL_ATTR), Some("youssefbukhari4@gmail.com"));
        let h4 = dom.first_descendant_named(a, "h4").unwrap();
        assert_eq!(dom.text_content(h4), "youssefbukhari4@gmail.com");
    }

    #[test]
    fn unrelated_at_sign_text_is_left_alone() {
        let mut dom = parse_document(
            "<html><body><div><h4>reach me @ the office</h4></div>\
             <div><a href=\"/about\"><h4>me@not-a-contact.example</h4></a></div>\
             </body></html>",
        );
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        assert_eq!(report.links_fixed, 0);
        let body = dom.first_descendant_named(dom.root(), "body").unwrap();
        let text = dom.text_content(body);
        assert!(text.contains("reach me @ the office"));
        assert!(text.contains("me@not-a-contact.example"));
    }

    #[test]
    fn linkedin_and_twitter_are_canonicalized() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            contact_card("LinkedIn", "https://linkedin.com/in/bryntaylor", "bryntaylor"),
            contact_card("Twitter", "https://twitter.com/bryntaylor99", "@bryntaylor99")
        );
        let mut dom = parse_document(&html);
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        assert_eq!(report.links_fixed, 2);

        let anchors = dom.elements_named(dom.root(), "a");
        let hrefs: Vec<_> = anchors
            .iter()
            .map(|&a| dom.element(a).unwrap().attr("href").unwrap().to_string())
            .collect();
        assert!(hrefs.contains(&"https://www.linkedin.com/in/yousuf-bukhari/".to_string()));
        assert!(hrefs.contains(&"https://x.com/youssef_bukhari".to_string()));

        let values: Vec<_> = anchors
            .iter()
            .map(|&a| {
                let h4 = dom.first_descendant_named(a, "h4").unwrap();
                dom.text_content(h4)
            })
            .collect();
        assert!(values.contains(&"yousuf-bukhari".to_string()));
        assert!(values.contains(&"@youssef_bukhari".to_string()));
    }

    #[test]
    fn value_text_needs_a_confirming_label() {
        // A LinkedIn href inside a block labeled something else: the href is
        // still canonicalized, the visible text is not.
        let html = format!(
            "<html><body>{}</body></html>",
            contact_card("Profile", "https://linkedin.com/in/someone", "someone-else")
        );
        let mut dom = parse_document(&html);
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        let a = dom.first_descendant_named(dom.root(), "a").unwrap();
        assert_eq!(
            dom.element(a).unwrap().attr("href"),
            Some("https://www.linkedin.com/in/yousuf-bukhari/")
        );
        let h4 = dom.first_descendant_named(a, "h4").unwrap();
        assert_eq!(dom.text_content(h4), "someone-else");
    }

    #[test]
    fn converged_links_report_no_fixes() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            contact_card("GitHub", "https://github.com/youpesh", "youpesh"),
            "<div><a href=\"#\" data-copy-email=\"youssefbukhari4@gmail.com\">\
             <h3>Email</h3><h4>youssefbukhari4@gmail.com</h4></a></div>"
        );
        let mut dom = parse_document(&html);
        let mut report = PassReport::default();
        fix_contact_links(&identity(), &mut dom, &mut report);
        assert_eq!(report.links_fixed, 0, "{report:?}");
    }
}
