//! Indentation inference and formatting synthesis.
//!
//! [`FindIndentVisitor`] discovers the dominant indentation step and
//! character of a scanned scope from node prefixes. [`Formatter`] wraps the
//! analysis for one compilation unit, caching the whole-file answer, and
//! synthesizes prefixes for inserted statements ([`Formatter::format`]) and
//! whitespace shifts for relocated subtrees ([`Formatter::shift_right`]).
//!
//! Indentation is inferred locally (closest enclosing scope) with a
//! whole-file fallback: one file can mix conventions set by different
//! authors or tools in different regions, and a scope with too few samples
//! falls back to the file-wide mode.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use tracing::debug;

use crate::tree::{Formatting, Tree};
use crate::visitor::{visit, walk_children, Cursor, TreeVisitor};

// ============================================================================
// Prefix helpers
// ============================================================================

/// Whether a prefix starts a new source line (leads with a newline or CR).
pub fn starts_new_line(prefix: &str) -> bool {
    prefix.starts_with(['\n', '\r'])
}

/// The whitespace run that follows a prefix's leading newline characters,
/// up to the first non-whitespace character.
fn indent_run(prefix: &str) -> &str {
    let rest = prefix.trim_start_matches(['\n', '\r']);
    let end = rest
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Width in characters of the indentation carried by a prefix.
pub fn indent_width(prefix: &str) -> usize {
    indent_run(prefix).chars().count()
}

// ============================================================================
// Indentation analyzer
// ============================================================================

/// Discovers the most common indentation step of a scope, and whether that
/// scope is predominantly indented with spaces or tabs.
///
/// Every node whose prefix starts a new line contributes one sample: the
/// signed offset of its line indent from the enclosing baseline, plus a
/// space-vs-tab tally for that line. Nodes on the same line as their
/// predecessor contribute nothing.
pub struct FindIndentVisitor {
    enclosing_indent: usize,
    indent_frequencies: BTreeMap<isize, u64>,
    lines_with_space_indents: u64,
    lines_with_tab_indents: u64,
}

impl FindIndentVisitor {
    pub fn new(enclosing_indent: usize) -> Self {
        FindIndentVisitor {
            enclosing_indent,
            indent_frequencies: BTreeMap::new(),
            lines_with_space_indents: 0,
            lines_with_tab_indents: 0,
        }
    }

    /// The most probable single indentation step of the scanned scope, or
    /// zero when no line carried a positive offset (caller supplies a
    /// fallback).
    ///
    /// A zero offset is not a nesting signal and is discarded. Nested scopes
    /// sample at multiples of the base step, so each candidate width is
    /// scored by the total count of all sampled widths it divides; ties
    /// break toward the smallest width. Width 1 divides everything and only
    /// scores its own count.
    pub fn most_common_indent(&self) -> usize {
        let mut best: Option<(isize, u64)> = None;
        for (&width, &count) in self.indent_frequencies.range(1..) {
            let score = if width == 1 {
                count
            } else {
                self.indent_frequencies
                    .range(width..)
                    .filter(|(w, _)| *w % width == 0)
                    .map(|(_, c)| *c)
                    .sum()
            };
            match best {
                Some((_, high)) if score <= high => {}
                _ => best = Some((width, score)),
            }
        }
        best.map(|(width, _)| width as usize).unwrap_or(0)
    }

    /// One majority decision per query, from the running totals across the
    /// whole scanned scope. Ties favor spaces.
    pub fn indented_with_spaces(&self) -> bool {
        self.lines_with_space_indents >= self.lines_with_tab_indents
    }

    /// The number of source lines the indent decision was made on. Zero
    /// means the scan found no information.
    pub fn total_lines(&self) -> u64 {
        self.lines_with_space_indents + self.lines_with_tab_indents
    }
}

impl<T: Tree> TreeVisitor<T> for FindIndentVisitor {
    fn visit_tree(&mut self, tree: &T, cursor: &Cursor<'_, T>) {
        let prefix = &tree.formatting().prefix;
        if starts_new_line(prefix) {
            let run = indent_run(prefix);
            let width = run.chars().count() as isize;
            *self
                .indent_frequencies
                .entry(width - self.enclosing_indent as isize)
                .or_insert(0) += 1;

            let spaces = run.chars().filter(|&c| c == ' ').count() as u64;
            let others = run.chars().count() as u64 - spaces;
            if spaces >= others {
                self.lines_with_space_indents += 1;
            } else {
                self.lines_with_tab_indents += 1;
            }
        }
        walk_children(self, tree, cursor);
    }
}

// ============================================================================
// Formatting synthesis
// ============================================================================

/// Result of one indentation query: the caller-supplied baseline, the
/// inferred per-level step width, and the inferred character convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    pub enclosing_indent: usize,
    pub indent_to_use: usize,
    pub indented_with_spaces: bool,
}

impl IndentStyle {
    pub fn indent_char(&self) -> char {
        if self.indented_with_spaces {
            ' '
        } else {
            '\t'
        }
    }

    /// Prefix for a statement inserted one level inside the enclosing
    /// scope: one newline, then `indent_to_use + enclosing_indent`
    /// repetitions of the indent character.
    pub fn statement_prefix(&self) -> Formatting {
        let mut prefix = String::from("\n");
        for _ in 0..self.indent_to_use + self.enclosing_indent {
            prefix.push(self.indent_char());
        }
        Formatting::new(prefix)
    }
}

/// Formatting synthesizer bound to one compilation unit.
///
/// The whole-file indentation style is computed lazily on first use and
/// cached for the lifetime of the instance; it cannot change across queries
/// within the same unit. Instances are single-threaded and must not be
/// shared across units.
pub struct Formatter<'a, T: Tree> {
    unit: &'a T,
    whole_source_indent: OnceCell<IndentStyle>,
}

impl<'a, T: Tree> Formatter<'a, T> {
    pub fn new(unit: &'a T) -> Formatter<'a, T> {
        Formatter {
            unit,
            whole_source_indent: OnceCell::new(),
        }
    }

    fn whole_source_indent(&self) -> IndentStyle {
        *self.whole_source_indent.get_or_init(|| {
            let mut visitor = FindIndentVisitor::new(0);
            visit(&mut visitor, self.unit);
            let discovered = visitor.most_common_indent();
            let style = IndentStyle {
                enclosing_indent: 0,
                // no usable signal: default to a 4-wide step
                indent_to_use: if discovered > 0 { discovered } else { 4 },
                indented_with_spaces: visitor.indented_with_spaces(),
            };
            debug!(
                indent = style.indent_to_use,
                spaces = style.indented_with_spaces,
                "inferred whole-source indentation"
            );
            style
        })
    }

    /// Infer the indentation style of `trees` measured against
    /// `enclosing_indent`, falling back to the whole-file style when the
    /// scope yields no positive step (width) or no samples at all
    /// (character convention). The returned style carries the supplied
    /// baseline unchanged.
    pub fn find_indent<'t>(
        &self,
        enclosing_indent: usize,
        trees: impl IntoIterator<Item = &'t T>,
    ) -> IndentStyle
    where
        T: 't,
    {
        let whole = self.whole_source_indent();
        let mut visitor = FindIndentVisitor::new(enclosing_indent);
        for tree in trees {
            visit(&mut visitor, tree);
        }
        let discovered = visitor.most_common_indent();
        IndentStyle {
            enclosing_indent,
            indent_to_use: if discovered > 0 {
                discovered
            } else {
                whole.indent_to_use
            },
            indented_with_spaces: if visitor.total_lines() > 0 {
                visitor.indented_with_spaces()
            } else {
                whole.indented_with_spaces
            },
        }
    }

    /// Formatting for a node freshly inserted as a new statement of
    /// `block`: seeded with the block's baseline and the style of its
    /// existing statements.
    pub fn format(&self, block: &T) -> Formatting {
        self.find_indent(self.enclosing_indent(block), block.children())
            .statement_prefix()
    }

    /// Whitespace transformer for relocating `moving` into `into`, where
    /// `encloses_both` is a scope enclosing both endpoints. The shift may be
    /// negative (moving to a shallower scope) or zero (safe no-op).
    pub fn shift_right(&self, moving: &T, into: &T, encloses_both: &T) -> ShiftFormat {
        let baseline = self
            .find_indent(self.enclosing_indent(encloses_both), [moving])
            .enclosing_indent;
        ShiftFormat {
            shift: self.enclosing_indent(into) as isize - baseline as isize,
            indented_with_spaces: self.whole_source_indent().indented_with_spaces,
        }
    }

    /// The baseline column of `tree`: the cached indent for blocks,
    /// otherwise the indentation carried by the node's own prefix.
    pub fn enclosing_indent(&self, tree: &T) -> usize {
        tree.block_indent()
            .unwrap_or_else(|| indent_width(&tree.formatting().prefix))
    }
}

// ============================================================================
// Whitespace shifting
// ============================================================================

/// Rewrites the prefixes of a subtree to move it left or right by a fixed
/// number of indent characters, preserving its internal relative
/// indentation. Non-whitespace content is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftFormat {
    shift: isize,
    indented_with_spaces: bool,
}

impl ShiftFormat {
    pub fn shift(&self) -> isize {
        self.shift
    }

    /// Apply the shift to `tree` and every descendant.
    pub fn apply<T: Tree>(&self, tree: &T) -> T {
        if self.shift == 0 {
            return tree.clone();
        }
        let shift = self.shift;
        let indent_char = if self.indented_with_spaces { ' ' } else { '\t' };
        tree.map_prefixes(&mut |prefix| shift_prefix(prefix, shift, indent_char))
    }
}

/// Insert (or, when `shift` is negative, remove up to) `|shift|` indent
/// characters immediately after each line-starting newline run in `prefix`.
pub fn shift_prefix(prefix: &str, shift: isize, indent_char: char) -> String {
    let mut out = String::with_capacity(prefix.len());
    let mut chars = prefix.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        let run_ends = (c == '\n' || c == '\r')
            && !matches!(chars.peek(), Some(&next) if next == '\n' || next == '\r');
        if run_ends {
            if shift > 0 {
                for _ in 0..shift {
                    out.push(indent_char);
                }
            } else {
                let mut remaining = shift.unsigned_abs();
                while remaining > 0 {
                    match chars.peek() {
                        Some(&next) if next == ' ' || next == '\t' => {
                            chars.next();
                            remaining -= 1;
                        }
                        _ => break,
                    }
                }
            }
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
