//! Clipboard writing with a legacy fallback chain.
//!
//! Copying must never raise: the primary mechanism is tried first, then a
//! chain of platform copy tools, and ultimate failure is reported as a
//! resolved `false`.

use std::io::Write;
use std::process::{Command, Stdio};

/// Seam for anything that can receive copied text. Tests substitute their
/// own sink; production uses [`SystemClipboard`].
pub trait ClipboardSink: Send + Sync {
    /// Copy `text`. Returns whether the copy succeeded.
    fn copy(&self, text: &str) -> bool;
}

/// The real system clipboard: `arboard` first, platform tools second.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> bool {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("clipboard write failed ({err}), trying platform tools");
                copy_via_command(text)
            }
        }
    }
}

/// Sink that accepts everything and copies nothing. Useful for headless
/// embedders that only want the classification side of click handling.
#[derive(Debug, Default)]
pub struct NoopClipboard;

impl ClipboardSink for NoopClipboard {
    fn copy(&self, _text: &str) -> bool {
        true
    }
}

/// Pipe the text through the first working platform copy tool.
fn copy_via_command(text: &str) -> bool {
    const TOOLS: &[(&str, &[&str])] = &[
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
        ("clip", &[]),
    ];

    for (tool, args) in TOOLS {
        let spawned = Command::new(tool)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = spawned else { continue };

        let wrote = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()).is_ok(),
            None => false,
        };
        if !wrote {
            let _ = child.kill();
            let _ = child.wait();
            continue;
        }
        if matches!(child.wait(), Ok(status) if status.success()) {
            return true;
        }
    }
    false
}
