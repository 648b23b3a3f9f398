//! `reclaim watch <root>`: keep the mirror converged until interrupted.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::output::{self, Styled};
use crate::events::PatchEvent;
use crate::patch::Patcher;
use crate::reconcile::Reconciler;
use crate::site::MirrorSite;

/// Start the reconciler, stream its events, and stop cleanly on ctrl-c.
pub async fn run(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = super::patch_cmd::load_config(root, config_path)?;
    let site = MirrorSite::open(root).context("cannot open site root")?;
    let timing = config.timing.clone();
    let reconciler = Reconciler::new(site, Patcher::new(config), timing);

    let mut events = reconciler.bus().subscribe();
    let handle = reconciler.start();
    info!("watching {}", root.display());

    let printer = tokio::spawn(async move {
        let styled = Styled::new();
        while let Ok(event) = events.recv().await {
            if output::is_json() {
                if let Ok(value) = serde_json::to_value(&event) {
                    output::print_json(&value);
                }
                continue;
            }
            if output::is_quiet() {
                continue;
            }
            match event {
                PatchEvent::ReconcilerStarted { root, .. } => {
                    println!("  {} watching {root}", styled.ok_sym());
                }
                PatchEvent::FileChanged { path } => {
                    println!("  {} mirror rewrote {path}", styled.warn_sym());
                }
                PatchEvent::FilePatched { path, trigger, .. } => {
                    println!("  {} re-patched {path} {}", styled.ok_sym(), styled.dim(&format!("({trigger:?})")));
                }
                PatchEvent::PassCompleted { .. } | PatchEvent::ReconcilerStopped { .. } => {}
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("stopping");
    handle.stop().await;
    printer.abort();

    Ok(())
}
