//! Maven POM refactoring for redraft.
//!
//! This crate layers the Maven domain on the redraft core engine:
//! - [`tree`]: the whitespace-preserving POM node catalog
//! - [`refactor`]: the [`PomRefactor`](refactor::PomRefactor) rule protocol
//!   and the rewrite driver that materializes attributable changes
//! - [`rules`]: the shipping upgrade rule catalog
//!
//! Trees come from an external parser or are constructed programmatically;
//! this crate trusts their formatting prefixes and never re-derives them
//! from raw text. One driver pass is scoped to one document; run passes for
//! independent documents in parallel freely.

pub mod error;
pub mod refactor;
pub mod rules;
pub mod tree;
