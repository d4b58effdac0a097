use super::deserialize_null_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates identifying one buildable unit.
///
/// Fields are empty only while a build file is being parsed; a resolved
/// artifact always has all three populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub group: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub artifact: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub version: String,
}

impl Artifact {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.group.is_empty() && !self.artifact.is_empty() && !self.version.is_empty()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}
