//! `reclaim check <root>`: dry-run convergence check.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::output::{self, Styled};
use crate::patch::Patcher;
use crate::site::{MirrorSite, PassMode};

/// Report which files a pass would change, without writing. Exits nonzero
/// when the mirror is not converged.
pub async fn run(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = super::patch_cmd::load_config(root, config_path)?;
    let site = MirrorSite::open(root).context("cannot open site root")?;
    let patcher = Patcher::new(config);

    let outcomes = site.preview_all(&patcher, PassMode::Full);
    let drifted: Vec<_> = outcomes.iter().filter(|o| o.changed).collect();
    let styled = Styled::new();

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "files": outcomes.len(),
            "drifted": drifted.iter().map(|o| o.path.display().to_string()).collect::<Vec<_>>(),
        }));
    } else if !output::is_quiet() {
        for outcome in &drifted {
            println!(
                "  {} {} {}",
                styled.warn_sym(),
                outcome.path.display(),
                styled.dim(&super::patch_cmd::summary(&outcome.report))
            );
        }
        if drifted.is_empty() {
            println!("  {} converged ({} file(s))", styled.ok_sym(), outcomes.len());
        }
    }

    if !drifted.is_empty() {
        bail!("{} file(s) not converged", drifted.len());
    }
    Ok(())
}
