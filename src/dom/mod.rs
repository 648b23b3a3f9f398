//! Browser-independent document model.
//!
//! The patcher edits text, attributes, and element presence, none of which
//! the read-oriented parser types allow. Documents are parsed into a small
//! arena tree, mutated in place, and serialized back to HTML. Traversal is
//! a plain depth-first walk with a per-element skip filter, so every pass
//! is testable without a browser.

pub mod parse;
pub mod serialize;
pub mod tree;
pub mod walk;

pub use parse::parse_document;
pub use serialize::serialize;
pub use tree::{DomTree, ElementData, NodeData, NodeId};
pub use walk::{walk_text_nodes, WalkDecision};
