//! Change materialization: attributable unified diffs between snapshots.
//!
//! A [`Change`] pairs an optional original and optional fixed snapshot of
//! the same logical source file with the set of rule identities that
//! produced the fix. [`Change::diff`] renders both snapshots, short-circuits
//! on identical content, and otherwise emits a unified diff whose first hunk
//! header names every contributing rule.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use similar::{ChangeTag, TextDiff};
use tracing::trace;

use crate::error::CoreError;
use crate::tree::{SourceFile, TreeId};

/// SHA-256 content identity of one rendered snapshot (hex encoded).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outcome of one rewrite pass over one file: before and after
/// snapshots plus the identities of the rules that changed something.
///
/// Produced exactly once per pass per file and immutable thereafter. An
/// absent original models file creation; an absent fixed snapshot models
/// deletion.
#[derive(Debug)]
pub struct Change<S: SourceFile> {
    original: Option<S>,
    fixed: Option<S>,
    tree_id: TreeId,
    visitors_that_made_changes: BTreeSet<String>,
}

impl<S: SourceFile> Change<S> {
    pub fn new(
        original: Option<S>,
        fixed: Option<S>,
        visitors_that_made_changes: BTreeSet<String>,
    ) -> Result<Change<S>, CoreError> {
        let tree_id = match (&fixed, &original) {
            (Some(fixed), _) => fixed.id(),
            (None, Some(original)) => original.id(),
            (None, None) => return Err(CoreError::EmptySnapshotPair),
        };
        Ok(Change {
            original,
            fixed,
            tree_id,
            visitors_that_made_changes,
        })
    }

    pub fn original(&self) -> Option<&S> {
        self.original.as_ref()
    }

    pub fn fixed(&self) -> Option<&S> {
        self.fixed.as_ref()
    }

    pub fn visitors_that_made_changes(&self) -> &BTreeSet<String> {
        &self.visitors_that_made_changes
    }

    /// Unified diff of the two snapshots. Empty string when the rendered
    /// texts are byte-identical, even if rules nominally ran.
    pub fn diff(&self) -> String {
        self.diff_relative_to(None)
    }

    /// Like [`Change::diff`], with reported paths relativized against
    /// `relative_to`.
    pub fn diff_relative_to(&self, relative_to: Option<&Path>) -> String {
        let old_text = self.original.as_ref().map(S::print).unwrap_or_default();
        let new_text = self.fixed.as_ref().map(S::print).unwrap_or_default();

        let old_hash = ContentHash::compute(old_text.as_bytes());
        let new_hash = ContentHash::compute(new_text.as_bytes());
        if old_hash == new_hash {
            trace!(%old_hash, "snapshots are content-identical, no diff");
            return String::new();
        }

        render_unified_diff(
            &self.diff_path(relative_to),
            &old_text,
            &new_text,
            &self.visitors_that_made_changes,
        )
    }

    /// The path reported in the diff: the fixed snapshot's source path when
    /// present, else a deletion placeholder derived from the base path and
    /// the tree's identity.
    fn diff_path(&self, relative_to: Option<&Path>) -> PathBuf {
        let source_path = match &self.fixed {
            Some(fixed) => fixed.source_path().to_path_buf(),
            None => relative_to
                .unwrap_or_else(|| Path::new("."))
                .join(format!("partial-{}", self.tree_id)),
        };
        match relative_to {
            Some(base) => match source_path.strip_prefix(base) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => source_path,
            },
            None => source_path,
        }
    }
}

/// Render a unified diff with three lines of context, stamping the first
/// hunk header with the sorted, comma-separated rule identities.
fn render_unified_diff(
    path: &Path,
    old_text: &str,
    new_text: &str,
    rules: &BTreeSet<String>,
) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut out = String::new();
    out.push_str(&format!("--- a/{}\n", path.display()));
    out.push_str(&format!("+++ b/{}\n", path.display()));

    let mut attributed = false;
    for group in diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            old_len,
            new_start + 1,
            new_len
        ));
        if !attributed && !rules.is_empty() {
            attributed = true;
            let names: Vec<&str> = rules.iter().map(String::as_str).collect();
            out.push(' ');
            out.push_str(&names.join(", "));
        }
        out.push('\n');

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                out.push(sign);
                out.push_str(change.value());
                if !change.value().ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct FakeFile {
        id: TreeId,
        path: PathBuf,
        text: String,
    }

    impl FakeFile {
        fn new(path: &str, text: &str) -> FakeFile {
            FakeFile {
                id: TreeId::next(),
                path: PathBuf::from(path),
                text: text.to_string(),
            }
        }
    }

    impl SourceFile for FakeFile {
        fn id(&self) -> TreeId {
            self.id
        }

        fn source_path(&self) -> &Path {
            &self.path
        }

        fn print(&self) -> String {
            self.text.clone()
        }
    }

    fn rules(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn identical_snapshots_produce_empty_diff() {
        let original = FakeFile::new("pom.xml", "a\nb\n");
        let fixed = FakeFile::new("pom.xml", "a\nb\n");
        let change =
            Change::new(Some(original), Some(fixed), rules(&["some-rule"])).unwrap();
        assert_eq!(change.diff(), "");
    }

    #[test]
    fn first_hunk_header_names_rules_alphabetically() {
        let original = FakeFile::new("pom.xml", "a\nversion=1.0\nb\n");
        let fixed = FakeFile::new("pom.xml", "a\nversion=2.0\nb\n");
        let change =
            Change::new(Some(original), Some(fixed), rules(&["B-rule", "A-rule"])).unwrap();
        let diff = change.diff();
        assert!(diff.contains("@@ -1,3 +1,3 @@ A-rule, B-rule\n"), "{diff}");
        assert!(diff.contains("-version=1.0\n"));
        assert!(diff.contains("+version=2.0\n"));
    }

    #[test]
    fn attribution_lands_only_on_the_first_hunk() {
        let mut old_text = String::from("first=1\n");
        let mut new_text = String::from("first=2\n");
        for i in 0..20 {
            old_text.push_str(&format!("line{i}\n"));
            new_text.push_str(&format!("line{i}\n"));
        }
        old_text.push_str("last=1\n");
        new_text.push_str("last=2\n");

        let change = Change::new(
            Some(FakeFile::new("pom.xml", &old_text)),
            Some(FakeFile::new("pom.xml", &new_text)),
            rules(&["only-rule"]),
        )
        .unwrap();
        let diff = change.diff();
        let hunk_headers: Vec<&str> =
            diff.lines().filter(|l| l.starts_with("@@")).collect();
        assert_eq!(hunk_headers.len(), 2);
        assert!(hunk_headers[0].ends_with("only-rule"));
        assert!(hunk_headers[1].ends_with("@@"));
    }

    #[test]
    fn diff_carries_standard_headers_and_trailing_newline() {
        let change = Change::new(
            Some(FakeFile::new("sub/pom.xml", "a\n")),
            Some(FakeFile::new("sub/pom.xml", "b\n")),
            rules(&["r"]),
        )
        .unwrap();
        let diff = change.diff();
        assert!(diff.starts_with("--- a/sub/pom.xml\n+++ b/sub/pom.xml\n"));
        assert!(diff.ends_with('\n'));
    }

    #[test]
    fn diff_is_idempotent() {
        let change = Change::new(
            Some(FakeFile::new("pom.xml", "a\n")),
            Some(FakeFile::new("pom.xml", "b\n")),
            rules(&["r"]),
        )
        .unwrap();
        assert_eq!(change.diff(), change.diff());
    }

    #[test]
    fn absent_original_models_file_creation() {
        let change = Change::new(
            None,
            Some(FakeFile::new("pom.xml", "a\nb\n")),
            rules(&["r"]),
        )
        .unwrap();
        let diff = change.diff();
        assert!(diff.contains("+a\n"));
        assert!(diff.contains("+b\n"));
        assert!(!diff.lines().any(|l| l.starts_with('-') && !l.starts_with("---")));
    }

    #[test]
    fn absent_fixed_uses_placeholder_path() {
        let original = FakeFile::new("pom.xml", "a\n");
        let id = original.id;
        let change = Change::new(Some(original), None, rules(&["r"])).unwrap();
        let diff = change.diff();
        assert!(diff.starts_with(&format!("--- a/./partial-{id}\n")), "{diff}");
        assert!(diff.contains("-a\n"));
    }

    #[test]
    fn paths_are_relativized_against_base() {
        let change = Change::new(
            Some(FakeFile::new("/repo/module/pom.xml", "a\n")),
            Some(FakeFile::new("/repo/module/pom.xml", "b\n")),
            rules(&["r"]),
        )
        .unwrap();
        let diff = change.diff_relative_to(Some(Path::new("/repo")));
        assert!(diff.starts_with("--- a/module/pom.xml\n"), "{diff}");
    }

    #[test]
    fn deletion_placeholder_is_relative_to_base() {
        let original = FakeFile::new("/repo/module/pom.xml", "a\n");
        let id = original.id;
        let change = Change::new(Some(original), None, rules(&["r"])).unwrap();
        let diff = change.diff_relative_to(Some(Path::new("/repo")));
        assert!(diff.starts_with(&format!("--- a/partial-{id}\n")), "{diff}");
    }

    #[test]
    fn neither_snapshot_is_rejected() {
        let change = Change::<FakeFile>::new(None, None, rules(&[]));
        assert!(matches!(change, Err(CoreError::EmptySnapshotPair)));
    }

    #[test]
    fn content_hash_is_stable_hex() {
        let a = ContentHash::compute(b"abc");
        let b = ContentHash::compute(b"abc");
        assert_eq!(a, b);
        assert_eq!(a.as_hex().len(), 64);
        assert_ne!(a, ContentHash::compute(b"abd"));
    }
}
