//! Refactor rule protocol and rewrite driver.
//!
//! A [`PomRefactor`] is one configurable rewrite rule. The driver walks the
//! tree bottom-up: children are rebuilt before a node's `visit_*` hook runs,
//! so a hook always sees its node with already-rewritten children and either
//! returns it unchanged or returns a with-field-updated replacement. Hooks
//! receive the unit's [`Formatter`] for synthesizing whitespace and the
//! ancestor [`Cursor`] (over the pre-rewrite tree) for context checks.
//!
//! One [`Refactor`] pass is scoped to one document. Rules are applied in
//! the configured order, each over the previous rule's result; a rule whose
//! pass produced a differing document is recorded in the resulting
//! [`Change`]'s identity set.

use std::collections::BTreeSet;

use redraft_core::change::Change;
use redraft_core::format::Formatter;
use redraft_core::validate::Validated;
use redraft_core::visitor::Cursor;
use tracing::debug;

use crate::error::{InvalidRule, RefactorError};
use crate::tree::{Block, Dependency, Document, Parent, Pom, Property};

/// One configurable rewrite rule over POM trees.
pub trait PomRefactor {
    /// Stable identity used for change attribution.
    fn name(&self) -> &'static str;

    /// Aggregate configuration check. The driver refuses to apply any rule
    /// that fails, reporting every offending field.
    fn validate(&self) -> Validated {
        Validated::valid()
    }

    fn visit_document(
        &mut self,
        document: Document,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Document {
        document
    }

    fn visit_block(
        &mut self,
        block: Block,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Block {
        block
    }

    fn visit_parent(
        &mut self,
        parent: Parent,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Parent {
        parent
    }

    fn visit_dependency(
        &mut self,
        dependency: Dependency,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Dependency {
        dependency
    }

    fn visit_property(
        &mut self,
        property: Property,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Property {
        property
    }
}

/// One rewrite pass: an ordered set of rules applied to one document.
#[derive(Default)]
pub struct Refactor {
    rules: Vec<Box<dyn PomRefactor>>,
}

impl Refactor {
    pub fn new() -> Refactor {
        Refactor::default()
    }

    /// Append a rule; rules apply in the order they were added.
    pub fn rule(mut self, rule: impl PomRefactor + 'static) -> Refactor {
        self.rules.push(Box::new(rule));
        self
    }

    /// Validate every rule, apply them in order, and materialize the
    /// resulting [`Change`]. Validation failures abort the pass before any
    /// tree is touched.
    pub fn run(mut self, original: Document) -> Result<Change<Document>, RefactorError> {
        let invalid: Vec<InvalidRule> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let validated = rule.validate();
                if validated.is_valid() {
                    None
                } else {
                    Some(InvalidRule {
                        rule: rule.name().to_string(),
                        failures: validated.failures().to_vec(),
                    })
                }
            })
            .collect();
        if !invalid.is_empty() {
            return Err(RefactorError::InvalidRules { invalid });
        }

        let mut visitors_that_made_changes = BTreeSet::new();
        let mut current = original.clone();
        for rule in &mut self.rules {
            let unit = Pom::Document(current.clone());
            let formatter = Formatter::new(&unit);
            let cursor = Cursor::root(&unit);
            let next = rewrite_document(rule.as_mut(), &current, &formatter, &cursor);
            let changed = next != current;
            debug!(rule = rule.name(), changed, "applied refactor rule");
            if changed {
                visitors_that_made_changes.insert(rule.name().to_string());
                current = next;
            }
        }

        Ok(Change::new(
            Some(original),
            Some(current),
            visitors_that_made_changes,
        )?)
    }
}

fn rewrite_document(
    rule: &mut dyn PomRefactor,
    document: &Document,
    formatter: &Formatter<'_, Pom>,
    cursor: &Cursor<'_, Pom>,
) -> Document {
    let mut statements = Vec::with_capacity(document.statements().len());
    for statement in document.statements() {
        let child_cursor = cursor.child(statement);
        statements.push(rewrite_node(rule, statement, formatter, &child_cursor));
    }
    rule.visit_document(document.with_statements(statements), formatter, cursor)
}

fn rewrite_node(
    rule: &mut dyn PomRefactor,
    node: &Pom,
    formatter: &Formatter<'_, Pom>,
    cursor: &Cursor<'_, Pom>,
) -> Pom {
    match node {
        Pom::Document(document) => {
            Pom::Document(rewrite_document(rule, document, formatter, cursor))
        }
        Pom::Block(block) => {
            let mut statements = Vec::with_capacity(block.statements().len());
            for statement in block.statements() {
                let child_cursor = cursor.child(statement);
                statements.push(rewrite_node(rule, statement, formatter, &child_cursor));
            }
            Pom::Block(rule.visit_block(block.with_statements(statements), formatter, cursor))
        }
        Pom::Parent(parent) => {
            Pom::Parent(rule.visit_parent(parent.clone(), formatter, cursor))
        }
        Pom::Dependency(dependency) => {
            Pom::Dependency(rule.visit_dependency(dependency.clone(), formatter, cursor))
        }
        Pom::Property(property) => {
            Pom::Property(rule.visit_property(property.clone(), formatter, cursor))
        }
        Pom::Literal(literal) => Pom::Literal(literal.clone()),
    }
}

// ============================================================================
// Tests
// ============================================================================
