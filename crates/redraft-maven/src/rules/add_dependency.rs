//! Add a `<dependency>` declaration to the project's dependency list.

use redraft_core::error::CoreError;
use redraft_core::format::{Formatter, IndentStyle};
use redraft_core::tree::Formatting;
use redraft_core::validate::{required, Validated};
use redraft_core::visitor::Cursor;
use serde::{Deserialize, Serialize};

use crate::refactor::PomRefactor;
use crate::tree::{Block, Dependency, Literal, Pom};

/// Configuration for [`AddDependency`]. Coordinates and version are
/// required; `scope` defaults to none (compile scope).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddDependencyConfig {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
}

impl AddDependencyConfig {
    pub fn validate(&self) -> Validated {
        required("group_id", self.group_id.as_deref())
            .and(required("artifact_id", self.artifact_id.as_deref()))
            .and(required("version", self.version.as_deref()))
    }
}

/// Appends a dependency to each `<dependencies>` block directly under the
/// project root, unless the coordinate is already declared there. All
/// synthesized whitespace comes from the formatting synthesizer, so the
/// insertion matches the file's own conventions.
#[derive(Debug)]
pub struct AddDependency {
    group_id: String,
    artifact_id: String,
    version: String,
    scope: Option<String>,
}

impl AddDependency {
    pub const NAME: &'static str = "maven.add-dependency";

    pub fn from_config(config: AddDependencyConfig) -> Result<AddDependency, CoreError> {
        config.validate().into_result(Self::NAME)?;
        Ok(AddDependency {
            group_id: config.group_id.unwrap_or_default(),
            artifact_id: config.artifact_id.unwrap_or_default(),
            version: config.version.unwrap_or_default(),
            scope: config.scope,
        })
    }

    fn declaration(&self, style: IndentStyle) -> Dependency {
        let field_prefix = indent_prefix(
            style.enclosing_indent + 2 * style.indent_to_use,
            style.indent_char(),
        );
        let close_prefix = indent_prefix(
            style.enclosing_indent + style.indent_to_use,
            style.indent_char(),
        );
        Dependency::new(
            style.statement_prefix(),
            Literal::new(
                "groupId",
                self.group_id.as_str(),
                Formatting::new(field_prefix.clone()),
            ),
            Literal::new(
                "artifactId",
                self.artifact_id.as_str(),
                Formatting::new(field_prefix.clone()),
            ),
            Some(Literal::new(
                "version",
                self.version.as_str(),
                Formatting::new(field_prefix.clone()),
            )),
            self.scope
                .as_ref()
                .map(|scope| Literal::new("scope", scope.as_str(), Formatting::new(field_prefix))),
            close_prefix,
        )
    }
}

impl PomRefactor for AddDependency {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn visit_block(
        &mut self,
        block: Block,
        formatter: &Formatter<'_, Pom>,
        cursor: &Cursor<'_, Pom>,
    ) -> Block {
        if block.tag() != "dependencies" {
            return block;
        }
        // skip <dependencyManagement><dependencies> and the like
        let under_project = matches!(
            cursor.parent_node(),
            Some(Pom::Block(parent)) if parent.tag() == "project"
        );
        if !under_project {
            return block;
        }
        let declared = block.statements().iter().any(|statement| {
            matches!(
                statement,
                Pom::Dependency(dependency)
                    if dependency.group_id() == Some(self.group_id.as_str())
                        && dependency.artifact_id() == Some(self.artifact_id.as_str())
            )
        });
        if declared {
            return block;
        }

        let style = formatter.find_indent(block.indent(), block.statements().iter());
        let mut statements = block.statements().to_vec();
        statements.push(Pom::Dependency(self.declaration(style)));
        block.with_statements(statements)
    }
}

fn indent_prefix(width: usize, indent_char: char) -> String {
    let mut prefix = String::from("\n");
    for _ in 0..width {
        prefix.push(indent_char);
    }
    prefix
}

// ============================================================================
// Tests
// ============================================================================
