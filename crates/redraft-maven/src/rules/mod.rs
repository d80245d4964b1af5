//! The shipping upgrade rule catalog.
//!
//! Each rule is constructed from an explicit, serde-deserializable config
//! value via `from_config`, which validates every required field in
//! aggregate before the rule can join a pass.

mod add_dependency;
mod change_dependency_version;
mod change_parent_version;
mod change_property_value;

pub use add_dependency::{AddDependency, AddDependencyConfig};
pub use change_dependency_version::{ChangeDependencyVersion, ChangeDependencyVersionConfig};
pub use change_parent_version::{ChangeParentVersion, ChangeParentVersionConfig};
pub use change_property_value::{ChangePropertyValue, ChangePropertyValueConfig};
