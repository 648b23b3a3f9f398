//! Patch configuration: identity constants, replacement rules, vendor
//! chrome matchers, and timing knobs.
//!
//! Everything the patcher consults lives in one immutable [`PatchConfig`]
//! value built at startup, either from the embedded defaults or from a
//! `reclaim.toml` override. Passing the value in (rather than reading
//! process-wide constants) is what lets tests substitute identities and
//! rule lists freely.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::ReplacementRule;

/// Configuration load/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The site owner's canonical identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub email: String,
    pub github_url: String,
    pub github_handle: String,
    pub linkedin_url: String,
    pub linkedin_handle: String,
    pub x_url: String,
    pub x_handle: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            email: "youssefbukhari4@gmail.com".to_string(),
            github_url: "https://github.com/youpesh".to_string(),
            github_handle: "youpesh".to_string(),
            linkedin_url: "https://www.linkedin.com/in/yousuf-bukhari/".to_string(),
            linkedin_handle: "yousuf-bukhari".to_string(),
            x_url: "https://x.com/youssef_bukhari".to_string(),
            x_handle: "@youssef_bukhari".to_string(),
        }
    }
}

/// Matcher for one family of vendor-inserted links: an anchor qualifies
/// when its href starts with any prefix and its visible text contains any
/// phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripRule {
    pub href_prefixes: Vec<String>,
    pub phrases: Vec<String>,
}

impl Default for StripRule {
    fn default() -> Self {
        Self {
            href_prefixes: Vec::new(),
            phrases: Vec::new(),
        }
    }
}

/// Vendor chrome matchers: badge, promo strip, footer credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// `id` attribute of the vendor badge container.
    pub badge_id: String,
    /// Attribute marking the vendor's animation/spacing wrapper; removing
    /// the wrapper rather than the bare anchor avoids leaving layout gaps.
    pub wrapper_attr: String,
    /// Suffix of the `class` attribute value identifying a footer credit
    /// container `div`.
    pub container_class_suffix: String,
    pub promo: StripRule,
    pub footer: StripRule,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            badge_id: "__framer-badge-container".to_string(),
            wrapper_attr: "data-framer-appear-id".to_string(),
            container_class_suffix: "-container".to_string(),
            promo: StripRule {
                href_prefixes: vec!["https://www.framer.com/@bryn-taylor".to_string()],
                phrases: vec![
                    "A minimal portfolio template".to_string(),
                    "View all templates".to_string(),
                ],
            },
            footer: StripRule {
                href_prefixes: vec![
                    "https://www.bryntaylor.co.uk/".to_string(),
                    "https://www.framer.com?via=bryn".to_string(),
                ],
                phrases: vec![
                    "Unlimited Access templates".to_string(),
                    "Made in Framer".to_string(),
                    "Built by Bryn".to_string(),
                ],
            },
        }
    }
}

/// Hero heading fix: which `<h1>` to target and what to write into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Attribute identifying the header landmark.
    pub header_marker_attr: String,
    /// Required value of that attribute.
    pub header_marker_value: String,
    /// Text the heading converges to.
    pub target: String,
    /// The heading is only overwritten when its current text contains this
    /// fragment, so unrelated headings are never clobbered.
    pub guard_fragment: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            header_marker_attr: "data-framer-name".to_string(),
            header_marker_value: "Section / Header".to_string(),
            target: "I'm an AI-focused software engineer in Atlanta, GA. I build LLM-powered \
                     features, ML pipelines, and backend systems—from prototype to production."
                .to_string(),
            guard_fragment: "AI-focused software engineer".to_string(),
        }
    }
}

/// Which meta tags the replacement rules also apply to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Values of `meta[name=...]` to patch.
    pub names: Vec<String>,
    /// Values of `meta[property=...]` to patch.
    pub properties: Vec<String>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            names: vec![
                "description".to_string(),
                "twitter:title".to_string(),
                "twitter:description".to_string(),
            ],
            properties: vec!["og:title".to_string(), "og:description".to_string()],
        }
    }
}

/// Reconciliation timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Mirror change-detection sampling interval.
    pub scan_interval_ms: u64,
    /// Delay before the post-change touch-up pass, catching a second wave
    /// of re-rendering.
    pub recheck_delay_ms: u64,
    /// Fallback polling interval for the hero/contact touch-up.
    pub poll_interval_ms: u64,
    /// How long the transient "copied" marker stays on an element.
    pub marker_clear_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 250,
            recheck_delay_ms: 100,
            poll_interval_ms: 500,
            marker_clear_ms: 1200,
        }
    }
}

impl TimingConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn recheck_delay(&self) -> Duration {
        Duration::from_millis(self.recheck_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn marker_clear(&self) -> Duration {
        Duration::from_millis(self.marker_clear_ms)
    }
}

/// The full, immutable patch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub identity: Identity,
    /// Ordered replacement rules. An empty list means "derive the default
    /// list from `identity`", so overriding only the identity in TOML keeps
    /// the rules consistent with it.
    #[serde(default)]
    pub rules: Vec<ReplacementRule>,
    pub chrome: ChromeConfig,
    pub hero: HeroConfig,
    pub meta: MetaConfig,
    pub timing: TimingConfig,
}

impl Default for PatchConfig {
    fn default() -> Self {
        let identity = Identity::default();
        let rules = default_rules(&identity);
        Self {
            identity,
            rules,
            chrome: ChromeConfig::default(),
            hero: HeroConfig::default(),
            meta: MetaConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl PatchConfig {
    /// Load from a TOML file. Missing sections fall back to defaults; an
    /// absent rule list is derived from the (possibly overridden) identity.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: PatchConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        if config.rules.is_empty() {
            config.rules = default_rules(&config.identity);
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a site: `<root>/reclaim.toml` if present,
    /// else the user-level config file, else the embedded defaults.
    pub fn discover(site_root: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(root) = site_root {
            let local = root.join("reclaim.toml");
            if local.is_file() {
                return Self::load(&local);
            }
        }
        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("reclaim").join("reclaim.toml");
            if user.is_file() {
                return Self::load(&user);
            }
        }
        Ok(Self::default())
    }

    /// Reject configurations the patcher cannot act on sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.email.is_empty() {
            return Err(ConfigError::Invalid("identity.email is empty".to_string()));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.from.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "replacement rule with empty `from` (to = {:?})",
                rule.to
            )));
        }
        Ok(())
    }
}

/// The default replacement list, parameterized by identity. Order matters:
/// later rules may match text earlier rules produced.
pub fn default_rules(identity: &Identity) -> Vec<ReplacementRule> {
    let rule = ReplacementRule::new;
    vec![
        rule("Landon Aguirre", "Yousuf Bukhari"),
        rule("About Landon", "About Yousuf"),
        rule("Independent Visual Designer", "AI-focused Software Engineer"),
        rule("independent visual designer", "AI-focused software engineer"),
        rule("Currently based in Lisbon, Portugal.", "Based in Atlanta, GA."),
        rule("Senior Visual designer", "Senior Software Engineer (AI)"),
        rule("Visual designer", "Software Engineer"),
        rule("Product designer", "Machine Learning Engineer"),
        rule("Interface design", "Machine learning"),
        rule("Visual design", "LLM applications"),
        rule("Design systems", "AI Engineering"),
        rule("Brand identity", "AI Engineering"),
        rule("Design system", "AI Engineering"),
        rule("Product design", "AI Engineering"),
        rule("Dribbble", "GitHub"),
        rule("dribbble.com/bryntaylor", "github.com/youpesh"),
        rule("landonaguirre", "youpesh"),
        ReplacementRule::new("hi@email.com", &identity.email),
        rule("linkedin.com/in/bryntaylor", "linkedin.com/in/yousuf-bukhari/"),
        rule("twitter.com/bryntaylor99", "x.com/youssef_bukhari"),
        rule("@twitterhandle", "@youssef_bukhari"),
        // Keep key homepage copy stable after the vendor pipeline re-renders.
        rule(
            "I’m an AI-focused software engineer. I build production-ready, human-centered \
             products powered by modern AI. Based in Atlanta, Georgia (US).",
            "I’m an AI-focused software engineer in Atlanta, GA. I build LLM-powered features, \
             ML pipelines, and backend systems—from prototype to production.",
        ),
        rule(
            "I'm an AI-focused software engineer. For the last 7 years I've been crafting world \
             class digital experiences. Based in Atlanta, GA.",
            "I'm an AI-focused software engineer in Atlanta, GA. I build LLM-powered features, \
             ML pipelines, and backend systems—from prototype to production.",
        ),
        // Keep titles stable the same way.
        rule(
            "Yousuf Bukhari · AI-focused Software Engineer",
            "Yousuf Bukhari | AI Software Engineer in Atlanta, GA",
        ),
        rule("Yousuf Bukhari · About", "About | Yousuf Bukhari"),
    ]
}
