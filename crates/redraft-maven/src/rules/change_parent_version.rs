//! Change the version of a matching `<parent>` declaration.

use redraft_core::error::CoreError;
use redraft_core::format::Formatter;
use redraft_core::validate::{required, Validated};
use redraft_core::visitor::Cursor;
use serde::{Deserialize, Serialize};

use crate::refactor::PomRefactor;
use crate::tree::{Parent, Pom};

/// Configuration for [`ChangeParentVersion`]. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeParentVersionConfig {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub to_version: Option<String>,
}

impl ChangeParentVersionConfig {
    pub fn validate(&self) -> Validated {
        required("group_id", self.group_id.as_deref())
            .and(required("artifact_id", self.artifact_id.as_deref()))
            .and(required("to_version", self.to_version.as_deref()))
    }
}

/// Rewrites the version of the parent declaration matching the configured
/// coordinates; parents already at the target version are left untouched.
#[derive(Debug)]
pub struct ChangeParentVersion {
    group_id: String,
    artifact_id: String,
    to_version: String,
}

impl ChangeParentVersion {
    pub const NAME: &'static str = "maven.change-parent-version";

    pub fn from_config(
        config: ChangeParentVersionConfig,
    ) -> Result<ChangeParentVersion, CoreError> {
        config.validate().into_result(Self::NAME)?;
        Ok(ChangeParentVersion {
            group_id: config.group_id.unwrap_or_default(),
            artifact_id: config.artifact_id.unwrap_or_default(),
            to_version: config.to_version.unwrap_or_default(),
        })
    }
}

impl PomRefactor for ChangeParentVersion {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn visit_parent(
        &mut self,
        parent: Parent,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Parent {
        if parent.group_id() == Some(self.group_id.as_str())
            && parent.artifact_id() == Some(self.artifact_id.as_str())
            && parent
                .version()
                .is_some_and(|version| version != self.to_version)
        {
            return parent.with_version(&self.to_version);
        }
        parent
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use redraft_core::tree::Formatting;
    use redraft_core::visitor::Cursor;
    use crate::tree::Literal;

    fn config(group_id: &str, artifact_id: &str, to_version: &str) -> ChangeParentVersionConfig {
        ChangeParentVersionConfig {
            group_id: Some(group_id.to_string()),
            artifact_id: Some(artifact_id.to_string()),
            to_version: Some(to_version.to_string()),
        }
    }

    fn sample_parent(version: &str) -> Parent {
        Parent::new(
            Formatting::new("\n  "),
            Literal::new("groupId", "com.foo", Formatting::new("\n    ")),
            Literal::new("artifactId", "bar", Formatting::new("\n    ")),
            Literal::new("version", version, Formatting::new("\n    ")),
            "\n  ",
        )
    }

    fn apply(rule: &mut ChangeParentVersion, parent: Parent) -> Parent {
        let unit = Pom::Parent(parent.clone());
        let formatter = Formatter::new(&unit);
        let cursor = Cursor::root(&unit);
        rule.visit_parent(parent, &formatter, &cursor)
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let config = ChangeParentVersionConfig {
            group_id: Some("com.foo".to_string()),
            ..ChangeParentVersionConfig::default()
        };
        let err = ChangeParentVersion::from_config(config).unwrap_err();
        assert_eq!(err.failed_fields(), ["artifact_id", "to_version"]);
    }

    #[test]
    fn matching_parent_gets_the_new_version() {
        let mut rule =
            ChangeParentVersion::from_config(config("com.foo", "bar", "2.0")).unwrap();
        let updated = apply(&mut rule, sample_parent("1.0"));
        assert_eq!(updated.version(), Some("2.0"));
    }

    #[test]
    fn non_matching_coordinates_are_untouched() {
        let mut rule =
            ChangeParentVersion::from_config(config("com.other", "bar", "2.0")).unwrap();
        let parent = sample_parent("1.0");
        assert_eq!(apply(&mut rule, parent.clone()), parent);
    }

    #[test]
    fn parent_already_at_target_version_is_untouched() {
        let mut rule =
            ChangeParentVersion::from_config(config("com.foo", "bar", "2.0")).unwrap();
        let parent = sample_parent("2.0");
        assert_eq!(apply(&mut rule, parent.clone()), parent);
    }
}
