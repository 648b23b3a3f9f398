//! `reclaim copy-email`: copy the canonical email to the clipboard.

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::output::{self, Styled};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::PatchConfig;

/// Copy the configured email address, using the same fallback chain the
/// patched site's copy-only links rely on.
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => PatchConfig::load(path)?,
        None => PatchConfig::discover(None)?,
    };

    let copied = SystemClipboard::new().copy(&config.identity.email);
    if output::is_json() {
        output::print_json(&serde_json::json!({
            "email": config.identity.email,
            "copied": copied,
        }));
    } else if !output::is_quiet() {
        let styled = Styled::new();
        if copied {
            println!("  {} copied {}", styled.ok_sym(), config.identity.email);
        }
    }

    if !copied {
        bail!("no clipboard mechanism available");
    }
    Ok(())
}
