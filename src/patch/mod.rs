//! The patcher: one idempotent reconciliation pass over a document tree.
//!
//! There is no state machine here. Every operation checks the current DOM
//! and only mutates what differs from the canonical content, so running a
//! pass any number of times converges to the same document, and a pass over
//! a converged document reports no changes. Absent targets are silent
//! no-ops, never errors.

mod chrome;
mod contact;
mod text;

pub use contact::COPY_EMAIL_ATTR;

use serde::{Deserialize, Serialize};

use crate::config::PatchConfig;
use crate::dom::DomTree;
use crate::rules::RuleSet;

/// What one pass changed. All counters are zero on a converged document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub badges_removed: usize,
    pub promos_removed: usize,
    pub credits_removed: usize,
    pub text_nodes_rewritten: usize,
    pub metas_rewritten: usize,
    pub hero_rewritten: bool,
    pub links_fixed: usize,
}

impl PassReport {
    /// Whether the pass changed anything at all.
    pub fn changed(&self) -> bool {
        self.badges_removed > 0
            || self.promos_removed > 0
            || self.credits_removed > 0
            || self.text_nodes_rewritten > 0
            || self.metas_rewritten > 0
            || self.hero_rewritten
            || self.links_fixed > 0
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: &PassReport) {
        self.badges_removed += other.badges_removed;
        self.promos_removed += other.promos_removed;
        self.credits_removed += other.credits_removed;
        self.text_nodes_rewritten += other.text_nodes_rewritten;
        self.metas_rewritten += other.metas_rewritten;
        self.hero_rewritten |= other.hero_rewritten;
        self.links_fixed += other.links_fixed;
    }
}

/// Converges a document tree to the canonical content and branding.
pub struct Patcher {
    config: PatchConfig,
    rules: RuleSet,
}

impl Patcher {
    pub fn new(config: PatchConfig) -> Self {
        let rules = RuleSet::new(config.rules.clone());
        Self { config, rules }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// The full pass, in fixed order: vendor badge, promo strips, footer
    /// credits, text replacements, meta replacements, hero fix, contact
    /// links.
    pub fn run(&self, dom: &mut DomTree) -> PassReport {
        let mut report = PassReport::default();
        chrome::remove_badge(&self.config.chrome, dom, &mut report);
        chrome::remove_promo_strips(&self.config.chrome, dom, &mut report);
        chrome::remove_footer_credits(&self.config.chrome, dom, &mut report);
        text::apply_text_replacements(&self.rules, dom, None, &mut report);
        text::apply_meta_replacements(&self.config.meta, &self.rules, dom, &mut report);
        contact::fix_hero_text(&self.config.hero, dom, &mut report);
        contact::fix_contact_links(&self.config.identity, dom, &mut report);
        if report.changed() {
            tracing::debug!(?report, "patch pass changed the document");
        }
        report
    }

    /// The hero/contact subset re-run by the delayed recheck and the
    /// polling fallback; the vendor pipeline rewrites these last.
    pub fn touch_up(&self, dom: &mut DomTree) -> PassReport {
        let mut report = PassReport::default();
        contact::fix_hero_text(&self.config.hero, dom, &mut report);
        contact::fix_contact_links(&self.config.identity, dom, &mut report);
        report
    }
}
