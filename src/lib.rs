// Copyright 2026 Reclaim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reclaim library: idempotent identity patcher for mirrored template
//! sites.
//!
//! This library crate exposes the core modules for embedding and
//! integration testing.

#![allow(dead_code, clippy::new_without_default)]

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod events;
pub mod interact;
pub mod patch;
pub mod reconcile;
pub mod rules;
pub mod site;
