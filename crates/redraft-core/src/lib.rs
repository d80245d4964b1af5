//! Core engine for redraft.
//!
//! This crate provides the language-agnostic refactoring infrastructure:
//! - Whitespace-preserving tree model (`Tree`, `SourceFile`, `Formatting`)
//! - Cursor-tracking depth-first traversal
//! - Indentation inference and formatting synthesis
//! - Aggregate rule-configuration validation
//! - Change materialization: attributable unified diffs between tree snapshots
//!
//! Concrete node catalogs and refactor rules live in per-domain crates
//! (e.g. `redraft-maven`) layered on top of this one.

pub mod change;
pub mod error;
pub mod format;
pub mod tree;
pub mod validate;
pub mod visitor;
