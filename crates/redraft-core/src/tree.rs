//! Tree and formatting model.
//!
//! Trees are immutable values: every node carries a stable [`TreeId`] and a
//! [`Formatting`] holding the verbatim text that precedes the node's
//! significant content in the original (or synthesized) source. Rewrites
//! never mutate a node in place; they build replacement values that share
//! unchanged children.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable opaque identity for one tree node.
///
/// Preserved by with-field updates; a freshly constructed node gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u64);

impl TreeId {
    /// Allocate the next id. Safe to call from concurrent rewrite passes.
    pub fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verbatim text preceding a node's significant content: whitespace,
/// newlines, and comments, exactly as they appeared in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatting {
    pub prefix: String,
}

impl Formatting {
    pub fn new(prefix: impl Into<String>) -> Self {
        Formatting {
            prefix: prefix.into(),
        }
    }

    /// Formatting with an empty prefix (node glued to its predecessor).
    pub fn none() -> Self {
        Formatting::default()
    }
}

/// An immutable syntax tree node.
///
/// Implemented by each domain's node sum type. Children are owned strictly
/// parent-to-child; ancestor context is only ever available through the
/// ephemeral traversal cursor, never stored on nodes.
pub trait Tree: Clone + PartialEq {
    fn id(&self) -> TreeId;

    fn formatting(&self) -> &Formatting;

    /// Direct children in source order (left to right, top to bottom).
    fn children(&self) -> Vec<&Self>;

    /// For block-like nodes, the cached absolute column of the line the
    /// block starts on: the baseline its body is measured against.
    fn block_indent(&self) -> Option<usize> {
        None
    }

    /// Rebuild this node and every descendant with each whitespace-prefix
    /// slot passed through `f`, sharing everything else.
    fn map_prefixes(&self, f: &mut dyn FnMut(&str) -> String) -> Self;
}

/// One complete source file snapshot that can be rendered back to text.
pub trait SourceFile {
    fn id(&self) -> TreeId;

    fn source_path(&self) -> &Path;

    /// Render the full textual form of this snapshot, byte-exact for
    /// unchanged nodes.
    fn print(&self) -> String;
}

// ============================================================================
// Tests
// ============================================================================
