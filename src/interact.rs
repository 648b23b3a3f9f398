//! Click interception semantics for patched contact links.
//!
//! Classification happens in the capture phase, before any default
//! behavior: email clicks become clipboard copies with a transient
//! "copied" marker, and a GitHub-labeled link that still points somewhere
//! wrong is sent to the canonical URL in a new tab. Everything else passes
//! through untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::clipboard::ClipboardSink;
use crate::config::Identity;
use crate::dom::{DomTree, NodeId};
use crate::patch::COPY_EMAIL_ATTR;

/// Class applied to an element while its copy feedback is showing.
pub const MARKER_CLASS: &str = "is-copied";

/// A document shared with the marker timers.
pub type SharedDom = Arc<Mutex<DomTree>>;

/// What a click on a node should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Suppress navigation and copy the email address.
    CopyEmail { anchor: NodeId, email: String },
    /// Suppress navigation and open the canonical URL in a new tab.
    OpenCanonical { anchor: NodeId, url: String },
    /// Let the default behavior run.
    Default,
}

impl ClickOutcome {
    /// Whether the default action must be prevented.
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, ClickOutcome::Default)
    }
}

/// Classify a click on `target`, resolving the nearest enclosing anchor.
pub fn classify_click(identity: &Identity, dom: &DomTree, target: NodeId) -> ClickOutcome {
    let Some(anchor) = dom.closest(target, |el| el.name == "a") else {
        return ClickOutcome::Default;
    };
    let Some(el) = dom.element(anchor) else {
        return ClickOutcome::Default;
    };

    let is_email = el.attr(COPY_EMAIL_ATTR).is_some()
        || el.attr("href").map(|h| h.starts_with("mailto:")).unwrap_or(false);
    if is_email {
        let email = el
            .attr(COPY_EMAIL_ATTR)
            .filter(|payload| !payload.is_empty())
            .unwrap_or(&identity.email)
            .to_string();
        return ClickOutcome::CopyEmail { anchor, email };
    }

    let label = dom
        .first_descendant_named(anchor, "h3")
        .map(|h3| dom.text_content(h3).trim().to_string());
    if label.as_deref() == Some("GitHub") {
        let href = el.attr("href").unwrap_or("");
        let canonical_marker = identity
            .github_url
            .trim_start_matches("https://")
            .trim_end_matches('/');
        if href.contains("dribbble") || !href.contains(canonical_marker) {
            return ClickOutcome::OpenCanonical {
                anchor,
                url: identity.github_url.clone(),
            };
        }
    }

    ClickOutcome::Default
}

/// Manages the transient "copied" markers, one cancellable clear timer per
/// element. Re-marking an element restarts its timer.
pub struct MarkerRegistry {
    clear_after: Duration,
    timers: HashMap<NodeId, JoinHandle<()>>,
}

impl MarkerRegistry {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            clear_after,
            timers: HashMap::new(),
        }
    }

    /// Apply the marker class to `anchor` and schedule its removal. Must be
    /// called inside a tokio runtime.
    pub fn mark(&mut self, dom: &SharedDom, anchor: NodeId) {
        if let Ok(mut tree) = dom.lock() {
            if let Some(el) = tree.element_mut(anchor) {
                el.add_class(MARKER_CLASS);
            }
        }

        if let Some(previous) = self.timers.remove(&anchor) {
            previous.abort();
        }

        let dom = Arc::clone(dom);
        let clear_after = self.clear_after;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            if let Ok(mut tree) = dom.lock() {
                if let Some(el) = tree.element_mut(anchor) {
                    el.remove_class(MARKER_CLASS);
                }
            }
        });
        self.timers.insert(anchor, timer);
    }
}

impl Drop for MarkerRegistry {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

/// Result of [`handle_click`].
#[derive(Debug)]
pub struct ClickResult {
    pub outcome: ClickOutcome,
    /// Whether an email copy was attempted and succeeded.
    pub copied: bool,
}

/// Classify a click and execute its email side: copy to the clipboard and
/// show the copied marker on success. `OpenCanonical` is returned for the
/// embedder to act on; this layer never navigates.
pub fn handle_click(
    identity: &Identity,
    dom: &SharedDom,
    target: NodeId,
    clipboard: &dyn ClipboardSink,
    markers: &mut MarkerRegistry,
) -> ClickResult {
    let outcome = match dom.lock() {
        Ok(tree) => classify_click(identity, &tree, target),
        Err(_) => ClickOutcome::Default,
    };

    let mut copied = false;
    if let ClickOutcome::CopyEmail { anchor, email } = &outcome {
        copied = clipboard.copy(email);
        if copied {
            markers.mark(dom, *anchor);
        }
    }

    ClickResult { outcome, copied }
}
