//! The reconciliation loop: keep a mirror converged while the vendor
//! pipeline rewrites it.
//!
//! Three triggers re-apply the patcher, with no coordination between them
//! beyond shared idempotence:
//!
//! 1. an initial full pass at startup,
//! 2. a change scanner that samples file signatures and re-runs the full
//!    pass on any externally rewritten file, followed by one delayed
//!    touch-up to catch a second wave of re-rendering,
//! 3. a fixed-interval polling fallback that re-runs the hero/contact
//!    touch-up for updates the scanner misses.
//!
//! The whole loop is an explicit resource: [`Reconciler::start`] returns a
//! [`ReconcilerHandle`], and [`ReconcilerHandle::stop`] signals every task
//! and joins it. Dropping the handle aborts whatever is still running.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::config::TimingConfig;
use crate::events::{now_timestamp, EventBus, PatchEvent, Trigger};
use crate::patch::Patcher;
use crate::site::{FileOutcome, MirrorSite, PassMode};

/// Size (mtime, length) signature used to detect external rewrites.
type Signature = (Option<SystemTime>, u64);

struct Shared {
    site: MirrorSite,
    patcher: Patcher,
    bus: EventBus,
    /// Serializes passes so overlapping triggers never interleave a
    /// read-modify-write on the same file.
    pass_lock: Mutex<()>,
}

impl Shared {
    async fn run_pass(&self, mode: PassMode, trigger: Trigger) -> usize {
        let _guard = self.pass_lock.lock().await;
        let outcomes = self.site.patch_all(&self.patcher, mode);
        self.emit_outcomes(&outcomes, trigger)
    }

    async fn run_file(&self, path: &Path, mode: PassMode, trigger: Trigger) {
        let _guard = self.pass_lock.lock().await;
        match self.site.patch_file(&self.patcher, path, mode) {
            Ok(outcome) => {
                self.emit_outcomes(std::slice::from_ref(&outcome), trigger);
            }
            Err(err) => tracing::warn!("pass over {} failed: {err}", path.display()),
        }
    }

    fn emit_outcomes(&self, outcomes: &[FileOutcome], trigger: Trigger) -> usize {
        let mut files_changed = 0;
        for outcome in outcomes {
            if outcome.changed {
                files_changed += 1;
                self.bus.emit(PatchEvent::FilePatched {
                    path: outcome.path.display().to_string(),
                    trigger,
                    report: outcome.report,
                });
            }
        }
        if files_changed > 0 {
            self.bus.emit(PatchEvent::PassCompleted {
                trigger,
                files_changed,
            });
        }
        files_changed
    }

    fn signatures(&self) -> HashMap<PathBuf, Signature> {
        self.site
            .discover()
            .into_iter()
            .filter_map(|path| {
                let meta = std::fs::metadata(&path).ok()?;
                Some((path, (meta.modified().ok(), meta.len())))
            })
            .collect()
    }
}

/// Owns the mirror, the patcher, and the trigger configuration; consumed
/// by [`start`](Self::start).
pub struct Reconciler {
    shared: Arc<Shared>,
    timing: TimingConfig,
}

impl Reconciler {
    pub fn new(site: MirrorSite, patcher: Patcher, timing: TimingConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                site,
                patcher,
                bus: EventBus::new(256),
                pass_lock: Mutex::new(()),
            }),
            timing,
        }
    }

    /// Subscribe before starting to observe the initial pass.
    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    /// Run the initial pass and spawn the scanner and polling tasks.
    pub fn start(self) -> ReconcilerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let root = self.shared.site.root().to_path_buf();
        let bus = self.shared.bus.clone();

        let scanner = tokio::spawn(scan_loop(
            Arc::clone(&self.shared),
            self.timing.clone(),
            shutdown_rx.clone(),
        ));
        let poller = tokio::spawn(poll_loop(
            Arc::clone(&self.shared),
            self.timing.poll_interval(),
            shutdown_rx,
        ));

        ReconcilerHandle {
            root,
            bus,
            shutdown: shutdown_tx,
            tasks: vec![scanner, poller],
        }
    }
}

/// Cancellation handle for a running reconciler.
pub struct ReconcilerHandle {
    root: PathBuf,
    bus: EventBus,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl ReconcilerHandle {
    /// Subscribe to reconciliation events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PatchEvent> {
        self.bus.subscribe()
    }

    /// Signal every task and wait for them to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        self.bus.emit(PatchEvent::ReconcilerStopped {
            root: self.root.display().to_string(),
        });
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        // stop() drains the task list; anything left is a hard abort.
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Initial pass, then signature sampling. A detected rewrite triggers a
/// full pass on that file and schedules one delayed touch-up.
async fn scan_loop(shared: Arc<Shared>, timing: TimingConfig, mut shutdown: watch::Receiver<bool>) {
    shared.bus.emit(PatchEvent::ReconcilerStarted {
        root: shared.site.root().display().to_string(),
        timestamp: now_timestamp(),
    });
    shared.run_pass(PassMode::Full, Trigger::Initial).await;

    // Snapshot after the initial pass so our own writes are not mistaken
    // for vendor activity.
    let mut snapshot = shared.signatures();
    let mut interval = tokio::time::interval(timing.scan_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => return,
        }

        let current = shared.signatures();
        for (path, signature) in &current {
            if snapshot.get(path) != Some(signature) {
                shared.bus.emit(PatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
                shared.run_file(path, PassMode::Full, Trigger::Mutation).await;
                spawn_recheck(
                    Arc::clone(&shared),
                    path.clone(),
                    timing.recheck_delay(),
                    shutdown.clone(),
                );
            }
        }
        // Re-stat so the signatures reflect any write the pass just made.
        snapshot = shared.signatures();
    }
}

/// One delayed touch-up after a detected change, catching the second wave
/// of vendor re-rendering.
fn spawn_recheck(
    shared: Arc<Shared>,
    path: PathBuf,
    delay: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return,
        }
        shared.run_file(&path, PassMode::TouchUp, Trigger::Recheck).await;
    });
}

/// Fixed-interval hero/contact touch-up over the whole mirror.
async fn poll_loop(
    shared: Arc<Shared>,
    interval: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; the initial pass already covers it.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => return,
        }
        shared.run_pass(PassMode::TouchUp, Trigger::Poll).await;
    }
}
