//! CLI subcommand implementations for the `reclaim` binary.

pub mod check_cmd;
pub mod copy_cmd;
pub mod output;
pub mod patch_cmd;
pub mod watch_cmd;
