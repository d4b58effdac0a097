//! Build tree data model

pub mod artifact;
pub mod build;
pub mod dependency;

pub use artifact::Artifact;
pub use build::{Build, BuildId, BuildTree};
pub use dependency::{Dependency, DependencyError};

use serde::{Deserialize, Deserializer};

/// Treats an explicit YAML `null` the same as an absent key.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}
