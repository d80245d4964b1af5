//! Change the version of matching `<dependency>` declarations.

use redraft_core::error::CoreError;
use redraft_core::format::Formatter;
use redraft_core::validate::{required, Validated};
use redraft_core::visitor::Cursor;
use serde::{Deserialize, Serialize};

use crate::refactor::PomRefactor;
use crate::tree::{Dependency, Pom};

/// Configuration for [`ChangeDependencyVersion`]. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeDependencyVersionConfig {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub to_version: Option<String>,
}

impl ChangeDependencyVersionConfig {
    pub fn validate(&self) -> Validated {
        required("group_id", self.group_id.as_deref())
            .and(required("artifact_id", self.artifact_id.as_deref()))
            .and(required("to_version", self.to_version.as_deref()))
    }
}

/// Rewrites the explicit version of every dependency matching the
/// configured coordinates. Managed dependencies (no version of their own)
/// are left untouched.
#[derive(Debug)]
pub struct ChangeDependencyVersion {
    group_id: String,
    artifact_id: String,
    to_version: String,
}

impl ChangeDependencyVersion {
    pub const NAME: &'static str = "maven.change-dependency-version";

    pub fn from_config(
        config: ChangeDependencyVersionConfig,
    ) -> Result<ChangeDependencyVersion, CoreError> {
        config.validate().into_result(Self::NAME)?;
        Ok(ChangeDependencyVersion {
            group_id: config.group_id.unwrap_or_default(),
            artifact_id: config.artifact_id.unwrap_or_default(),
            to_version: config.to_version.unwrap_or_default(),
        })
    }
}

impl PomRefactor for ChangeDependencyVersion {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn visit_dependency(
        &mut self,
        dependency: Dependency,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Dependency {
        if dependency.group_id() == Some(self.group_id.as_str())
            && dependency.artifact_id() == Some(self.artifact_id.as_str())
            && dependency
                .version()
                .is_some_and(|version| version != self.to_version)
        {
            return dependency.with_version(&self.to_version);
        }
        dependency
    }
}

// ============================================================================
// Tests
// ============================================================================
