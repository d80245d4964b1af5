//! Maven POM node catalog.
//!
//! An immutable, whitespace-preserving model of one POM file. Every node
//! carries the verbatim prefix that preceded it in the source, so printing
//! an untouched tree reproduces the original bytes exactly. Field updates
//! go through `with_*` methods that build a replacement value sharing
//! unchanged children and keeping the node's identity.
//!
//! Declarations (`<parent>`, `<dependency>`) keep their fields as ordered
//! literal children; the typed accessors look fields up by tag and return
//! `None` when a declaration omits one (e.g. a managed dependency without
//! an explicit version).

use std::path::{Path, PathBuf};

use redraft_core::format::{indent_width, starts_new_line};
use redraft_core::tree::{Formatting, SourceFile, Tree, TreeId};

const GROUP_ID: &str = "groupId";
const ARTIFACT_ID: &str = "artifactId";
const VERSION: &str = "version";

// ============================================================================
// Node kinds
// ============================================================================

/// A leaf `<tag>value</tag>` element used for declaration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    id: TreeId,
    formatting: Formatting,
    tag: String,
    value: String,
}

impl Literal {
    pub fn new(tag: impl Into<String>, value: impl Into<String>, formatting: Formatting) -> Literal {
        Literal {
            id: TreeId::next(),
            formatting,
            tag: tag.into(),
            value: value.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    pub fn with_value(&self, value: impl Into<String>) -> Literal {
        Literal {
            id: self.id,
            formatting: self.formatting.clone(),
            tag: self.tag.clone(),
            value: value.into(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        out.push_str(&format!("<{}>{}</{}>", self.tag, self.value, self.tag));
    }
}

/// A `<properties>` entry: `<key>value</key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    id: TreeId,
    formatting: Formatting,
    key: String,
    value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>, formatting: Formatting) -> Property {
        Property {
            id: TreeId::next(),
            formatting,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    pub fn with_value(&self, value: impl Into<String>) -> Property {
        Property {
            id: self.id,
            formatting: self.formatting.clone(),
            key: self.key.clone(),
            value: value.into(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        out.push_str(&format!("<{}>{}</{}>", self.key, self.value, self.key));
    }
}

/// A `<parent>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    id: TreeId,
    formatting: Formatting,
    fields: Vec<Pom>,
    close_prefix: String,
}

impl Parent {
    pub fn new(
        formatting: Formatting,
        group_id: Literal,
        artifact_id: Literal,
        version: Literal,
        close_prefix: impl Into<String>,
    ) -> Parent {
        Parent {
            id: TreeId::next(),
            formatting,
            fields: vec![
                Pom::Literal(group_id),
                Pom::Literal(artifact_id),
                Pom::Literal(version),
            ],
            close_prefix: close_prefix.into(),
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        field(&self.fields, GROUP_ID)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        field(&self.fields, ARTIFACT_ID)
    }

    pub fn version(&self) -> Option<&str> {
        field(&self.fields, VERSION)
    }

    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    pub fn with_version(&self, to_version: &str) -> Parent {
        Parent {
            id: self.id,
            formatting: self.formatting.clone(),
            fields: replace_field(&self.fields, VERSION, to_version),
            close_prefix: self.close_prefix.clone(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        out.push_str("<parent>");
        for field in &self.fields {
            field.print_into(out);
        }
        out.push_str(&self.close_prefix);
        out.push_str("</parent>");
    }
}

/// A `<dependency>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    id: TreeId,
    formatting: Formatting,
    fields: Vec<Pom>,
    close_prefix: String,
}

impl Dependency {
    pub fn new(
        formatting: Formatting,
        group_id: Literal,
        artifact_id: Literal,
        version: Option<Literal>,
        scope: Option<Literal>,
        close_prefix: impl Into<String>,
    ) -> Dependency {
        let mut fields = vec![Pom::Literal(group_id), Pom::Literal(artifact_id)];
        if let Some(version) = version {
            fields.push(Pom::Literal(version));
        }
        if let Some(scope) = scope {
            fields.push(Pom::Literal(scope));
        }
        Dependency {
            id: TreeId::next(),
            formatting,
            fields,
            close_prefix: close_prefix.into(),
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        field(&self.fields, GROUP_ID)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        field(&self.fields, ARTIFACT_ID)
    }

    /// `None` for managed dependencies that inherit their version.
    pub fn version(&self) -> Option<&str> {
        field(&self.fields, VERSION)
    }

    pub fn scope(&self) -> Option<&str> {
        field(&self.fields, "scope")
    }

    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    /// Replace the explicit version field. A dependency without one is
    /// returned unchanged.
    pub fn with_version(&self, to_version: &str) -> Dependency {
        Dependency {
            id: self.id,
            formatting: self.formatting.clone(),
            fields: replace_field(&self.fields, VERSION, to_version),
            close_prefix: self.close_prefix.clone(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        out.push_str("<dependency>");
        for field in &self.fields {
            field.print_into(out);
        }
        out.push_str(&self.close_prefix);
        out.push_str("</dependency>");
    }
}

/// A container element that owns an ordered sequence of statements:
/// `<project>`, `<dependencies>`, `<dependencyManagement>`, `<properties>`.
///
/// `indent` caches the absolute column of the line the block starts on: the
/// baseline its body is measured against. It is derived data, recomputed
/// whenever the tree is rebuilt with different whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: TreeId,
    formatting: Formatting,
    tag: String,
    statements: Vec<Pom>,
    indent: usize,
    close_prefix: String,
}

impl Block {
    pub fn new(
        tag: impl Into<String>,
        formatting: Formatting,
        statements: Vec<Pom>,
        indent: usize,
        close_prefix: impl Into<String>,
    ) -> Block {
        Block {
            id: TreeId::next(),
            formatting,
            tag: tag.into(),
            statements,
            indent,
            close_prefix: close_prefix.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn statements(&self) -> &[Pom] {
        &self.statements
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn formatting(&self) -> &Formatting {
        &self.formatting
    }

    pub fn with_statements(&self, statements: Vec<Pom>) -> Block {
        Block {
            id: self.id,
            formatting: self.formatting.clone(),
            tag: self.tag.clone(),
            statements,
            indent: self.indent,
            close_prefix: self.close_prefix.clone(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        out.push_str(&format!("<{}>", self.tag));
        for statement in &self.statements {
            statement.print_into(out);
        }
        out.push_str(&self.close_prefix);
        out.push_str(&format!("</{}>", self.tag));
    }
}

/// One POM compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: TreeId,
    formatting: Formatting,
    source_path: PathBuf,
    statements: Vec<Pom>,
    suffix: String,
}

impl Document {
    pub fn new(
        source_path: impl Into<PathBuf>,
        formatting: Formatting,
        statements: Vec<Pom>,
        suffix: impl Into<String>,
    ) -> Document {
        Document {
            id: TreeId::next(),
            formatting,
            source_path: source_path.into(),
            statements,
            suffix: suffix.into(),
        }
    }

    pub fn statements(&self) -> &[Pom] {
        &self.statements
    }

    pub fn with_statements(&self, statements: Vec<Pom>) -> Document {
        Document {
            id: self.id,
            formatting: self.formatting.clone(),
            source_path: self.source_path.clone(),
            statements,
            suffix: self.suffix.clone(),
        }
    }

    fn print_into(&self, out: &mut String) {
        out.push_str(&self.formatting.prefix);
        for statement in &self.statements {
            statement.print_into(out);
        }
        out.push_str(&self.suffix);
    }
}

impl SourceFile for Document {
    fn id(&self) -> TreeId {
        self.id
    }

    fn source_path(&self) -> &Path {
        &self.source_path
    }

    fn print(&self) -> String {
        let mut out = String::new();
        self.print_into(&mut out);
        out
    }
}

// ============================================================================
// The node sum type
// ============================================================================

/// One POM tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pom {
    Document(Document),
    Block(Block),
    Parent(Parent),
    Dependency(Dependency),
    Property(Property),
    Literal(Literal),
}

impl Pom {
    /// Render this subtree to text, its own prefix included.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_into(&mut out);
        out
    }

    pub(crate) fn print_into(&self, out: &mut String) {
        match self {
            Pom::Document(document) => document.print_into(out),
            Pom::Block(block) => block.print_into(out),
            Pom::Parent(parent) => parent.print_into(out),
            Pom::Dependency(dependency) => dependency.print_into(out),
            Pom::Property(property) => property.print_into(out),
            Pom::Literal(literal) => literal.print_into(out),
        }
    }
}

impl Tree for Pom {
    fn id(&self) -> TreeId {
        match self {
            Pom::Document(document) => document.id,
            Pom::Block(block) => block.id,
            Pom::Parent(parent) => parent.id,
            Pom::Dependency(dependency) => dependency.id,
            Pom::Property(property) => property.id,
            Pom::Literal(literal) => literal.id,
        }
    }

    fn formatting(&self) -> &Formatting {
        match self {
            Pom::Document(document) => &document.formatting,
            Pom::Block(block) => &block.formatting,
            Pom::Parent(parent) => &parent.formatting,
            Pom::Dependency(dependency) => &dependency.formatting,
            Pom::Property(property) => &property.formatting,
            Pom::Literal(literal) => &literal.formatting,
        }
    }

    fn children(&self) -> Vec<&Pom> {
        match self {
            Pom::Document(document) => document.statements.iter().collect(),
            Pom::Block(block) => block.statements.iter().collect(),
            Pom::Parent(parent) => parent.fields.iter().collect(),
            Pom::Dependency(dependency) => dependency.fields.iter().collect(),
            Pom::Property(_) | Pom::Literal(_) => Vec::new(),
        }
    }

    fn block_indent(&self) -> Option<usize> {
        match self {
            Pom::Block(block) => Some(block.indent),
            _ => None,
        }
    }

    fn map_prefixes(&self, f: &mut dyn FnMut(&str) -> String) -> Pom {
        match self {
            Pom::Document(document) => {
                let formatting = Formatting::new(f(&document.formatting.prefix));
                let statements = document
                    .statements
                    .iter()
                    .map(|s| s.map_prefixes(f))
                    .collect();
                Pom::Document(Document {
                    id: document.id,
                    formatting,
                    source_path: document.source_path.clone(),
                    statements,
                    suffix: document.suffix.clone(),
                })
            }
            Pom::Block(block) => {
                let formatting = Formatting::new(f(&block.formatting.prefix));
                let statements = block.statements.iter().map(|s| s.map_prefixes(f)).collect();
                let close_prefix = f(&block.close_prefix);
                let indent = if starts_new_line(&formatting.prefix) {
                    indent_width(&formatting.prefix)
                } else {
                    block.indent
                };
                Pom::Block(Block {
                    id: block.id,
                    formatting,
                    tag: block.tag.clone(),
                    statements,
                    indent,
                    close_prefix,
                })
            }
            Pom::Parent(parent) => {
                let formatting = Formatting::new(f(&parent.formatting.prefix));
                let fields = parent.fields.iter().map(|c| c.map_prefixes(f)).collect();
                Pom::Parent(Parent {
                    id: parent.id,
                    formatting,
                    fields,
                    close_prefix: f(&parent.close_prefix),
                })
            }
            Pom::Dependency(dependency) => {
                let formatting = Formatting::new(f(&dependency.formatting.prefix));
                let fields = dependency.fields.iter().map(|c| c.map_prefixes(f)).collect();
                Pom::Dependency(Dependency {
                    id: dependency.id,
                    formatting,
                    fields,
                    close_prefix: f(&dependency.close_prefix),
                })
            }
            Pom::Property(property) => Pom::Property(Property {
                id: property.id,
                formatting: Formatting::new(f(&property.formatting.prefix)),
                key: property.key.clone(),
                value: property.value.clone(),
            }),
            Pom::Literal(literal) => Pom::Literal(Literal {
                id: literal.id,
                formatting: Formatting::new(f(&literal.formatting.prefix)),
                tag: literal.tag.clone(),
                value: literal.value.clone(),
            }),
        }
    }
}

// ============================================================================
// Field lookup
// ============================================================================

fn field<'a>(fields: &'a [Pom], tag: &str) -> Option<&'a str> {
    fields.iter().find_map(|field| match field {
        Pom::Literal(literal) if literal.tag == tag => Some(literal.value.as_str()),
        _ => None,
    })
}

fn replace_field(fields: &[Pom], tag: &str, value: &str) -> Vec<Pom> {
    fields
        .iter()
        .map(|field| match field {
            Pom::Literal(literal) if literal.tag == tag => {
                Pom::Literal(literal.with_value(value))
            }
            other => other.clone(),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
