//! Change the value of a `<properties>` entry.

use redraft_core::error::CoreError;
use redraft_core::format::Formatter;
use redraft_core::validate::{required, Validated};
use redraft_core::visitor::Cursor;
use serde::{Deserialize, Serialize};

use crate::refactor::PomRefactor;
use crate::tree::{Pom, Property};

/// Configuration for [`ChangePropertyValue`]. Both fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangePropertyValueConfig {
    pub key: Option<String>,
    pub to_value: Option<String>,
}

impl ChangePropertyValueConfig {
    pub fn validate(&self) -> Validated {
        required("key", self.key.as_deref()).and(required("to_value", self.to_value.as_deref()))
    }
}

/// Rewrites the value of every property with the configured key.
#[derive(Debug)]
pub struct ChangePropertyValue {
    key: String,
    to_value: String,
}

impl ChangePropertyValue {
    pub const NAME: &'static str = "maven.change-property-value";

    pub fn from_config(config: ChangePropertyValueConfig) -> Result<ChangePropertyValue, CoreError> {
        config.validate().into_result(Self::NAME)?;
        Ok(ChangePropertyValue {
            key: config.key.unwrap_or_default(),
            to_value: config.to_value.unwrap_or_default(),
        })
    }
}

impl PomRefactor for ChangePropertyValue {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn visit_property(
        &mut self,
        property: Property,
        _formatter: &Formatter<'_, Pom>,
        _cursor: &Cursor<'_, Pom>,
    ) -> Property {
        if property.key() == self.key && property.value() != self.to_value {
            return property.with_value(self.to_value.as_str());
        }
        property
    }
}

// ============================================================================
// Tests
// ============================================================================
