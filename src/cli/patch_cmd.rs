//! `reclaim patch <root>`: one full pass over the mirror.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{self, Styled};
use crate::config::PatchConfig;
use crate::patch::{PassReport, Patcher};
use crate::site::{MirrorSite, PassMode};

/// Run a single full pass and report what changed.
pub async fn run(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(root, config_path)?;
    let site = MirrorSite::open(root).context("cannot open site root")?;
    let patcher = Patcher::new(config);

    let outcomes = site.patch_all(&patcher, PassMode::Full);
    let mut total = PassReport::default();
    let mut files_changed = 0;
    let styled = Styled::new();

    for outcome in &outcomes {
        total.merge(&outcome.report);
        if outcome.changed {
            files_changed += 1;
            if !output::is_quiet() && !output::is_json() {
                println!("  {} {}", styled.ok_sym(), outcome.path.display());
            }
        }
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "files": outcomes.len(),
            "files_changed": files_changed,
            "report": total,
        }));
    } else if !output::is_quiet() {
        if files_changed == 0 {
            println!("  {} already converged ({} file(s))", styled.ok_sym(), outcomes.len());
        } else {
            println!(
                "  {} patched {files_changed} of {} file(s)",
                styled.ok_sym(),
                outcomes.len()
            );
            println!("    {}", styled.dim(&summary(&total)));
        }
    }

    Ok(())
}

pub(crate) fn load_config(root: &Path, config_path: Option<&Path>) -> Result<PatchConfig> {
    let config = match config_path {
        Some(path) => PatchConfig::load(path)?,
        None => PatchConfig::discover(Some(root))?,
    };
    Ok(config)
}

pub(crate) fn summary(report: &PassReport) -> String {
    format!(
        "badges {} · promos {} · credits {} · text nodes {} · metas {} · hero {} · links {}",
        report.badges_removed,
        report.promos_removed,
        report.credits_removed,
        report.text_nodes_rewritten,
        report.metas_rewritten,
        if report.hero_rewritten { 1 } else { 0 },
        report.links_fixed
    )
}
