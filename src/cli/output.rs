//! Output helpers shared by the subcommands.
//!
//! Global flags are carried in environment variables set by `main` so
//! every module can check them without threading state through.

/// Whether `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("RECLAIM_QUIET").is_ok()
}

/// Whether `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("RECLAIM_JSON").is_ok()
}

/// Print a machine-readable JSON line.
pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

/// Minimal ANSI styling, disabled by `--no-color`.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            color: std::env::var("RECLAIM_NO_COLOR").is_err(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "✓"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "!"
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[2m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
