use crate::error::LoadError;
use crate::model::dependency::DependencyListSeed;
use crate::model::{deserialize_null_default, Artifact, Dependency};
use serde::de::{self, DeserializeSeed, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// Contents of one build file before inheritance is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDefinition {
    pub artifact: Option<Artifact>,
    pub dependencies: Vec<Dependency>,
}

/// Reads the top-level mapping of a build file. Keys other than `artifact`
/// and `dependencies` are skipped.
struct BuildFileSeed {
    dependencies: DependencyListSeed,
}

impl<'de> DeserializeSeed<'de> for BuildFileSeed {
    type Value = BuildDefinition;

    fn deserialize<D>(self, deserializer: D) -> Result<BuildDefinition, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for BuildFileSeed {
    type Value = BuildDefinition;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a build file mapping with `artifact` and `dependencies` keys")
    }

    fn visit_unit<E: de::Error>(self) -> Result<BuildDefinition, E> {
        Ok(BuildDefinition::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<BuildDefinition, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut definition = BuildDefinition::default();
        let mut seen_artifact = false;
        let mut dependencies = Some(self.dependencies);

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "artifact" => {
                    if seen_artifact {
                        return Err(de::Error::duplicate_field("artifact"));
                    }
                    seen_artifact = true;
                    definition.artifact = map.next_value()?;
                }
                "dependencies" => {
                    let Some(seed) = dependencies.take() else {
                        return Err(de::Error::duplicate_field("dependencies"));
                    };
                    definition.dependencies = map.next_value_seed(seed)?;
                }
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        Ok(definition)
    }
}

/// `dependencies` entries of the first document as plain values. Anything
/// unreadable is left to the typed pass to report.
fn dependency_nodes(content: &str) -> Vec<Value> {
    #[derive(Deserialize)]
    struct Nodes {
        #[serde(default, deserialize_with = "deserialize_null_default")]
        dependencies: Vec<Value>,
    }

    serde_yaml::Deserializer::from_str(content)
        .next()
        .and_then(|document| Nodes::deserialize(document).ok())
        .map(|nodes| nodes.dependencies)
        .unwrap_or_default()
}

/// Decodes the first YAML document of a build file.
///
/// An empty file, or one holding only an empty document, declares nothing.
/// Keys other than `artifact` and `dependencies` are ignored.
pub fn parse_build_file(path: &Path, content: &str) -> Result<BuildDefinition, LoadError> {
    let Some(document) = serde_yaml::Deserializer::from_str(content).next() else {
        return Ok(BuildDefinition::default());
    };

    let seed = BuildFileSeed {
        dependencies: DependencyListSeed::new(&dependency_nodes(content)),
    };
    seed.deserialize(document).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn directory_name(build_file: &Path) -> Option<String> {
    build_file
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Fills in the artifact coordinates a build file leaves out.
///
/// The artifact name defaults to the build file's directory name. Group and
/// version come from the parent; a build without a parent must declare both,
/// and must declare an `artifact` block at all.
pub fn resolve_artifact(
    build_file: &Path,
    declared: Option<Artifact>,
    parent: Option<&Artifact>,
) -> Result<Artifact, LoadError> {
    let missing = |field: &'static str| LoadError::MissingField {
        path: build_file.to_path_buf(),
        field,
    };

    let mut artifact = match (declared, parent) {
        (Some(declared), _) => declared,
        (None, Some(parent)) => Artifact {
            group: parent.group.clone(),
            artifact: String::new(),
            version: parent.version.clone(),
        },
        (None, None) => return Err(missing("artifact")),
    };

    if artifact.artifact.is_empty() {
        artifact.artifact = directory_name(build_file).ok_or_else(|| missing("artifact.artifact"))?;
    }
    if artifact.group.is_empty() {
        artifact.group = parent
            .map(|p| p.group.clone())
            .ok_or_else(|| missing("artifact.group"))?;
    }
    if artifact.version.is_empty() {
        artifact.version = parent
            .map(|p| p.version.clone())
            .ok_or_else(|| missing("artifact.version"))?;
    }

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const BUILD: &str = "/work/service/BUILD";

    fn parent() -> Artifact {
        Artifact::new("com.acme", "work", "2.1")
    }

    #[test]
    fn test_parse_full_build_file() {
        let definition = parse_build_file(
            Path::new(BUILD),
            r#"
artifact:
  group: com.acme
  artifact: service
  version: "1.0"
dependencies:
  - com.acme:core:1.0
  - group: org.lib
    artifact: [a, b]
    version: "3"
"#,
        )
        .unwrap();

        assert_eq!(
            definition.artifact,
            Some(Artifact::new("com.acme", "service", "1.0"))
        );
        assert_eq!(definition.dependencies.len(), 2);
        assert_eq!(definition.dependencies[0].artifact, vec!["core"]);
        assert_eq!(definition.dependencies[1].artifact, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_empty_content() {
        for content in ["", "\n", "# comment only\n", "---\n"] {
            let definition = parse_build_file(Path::new(BUILD), content).unwrap();
            assert_eq!(definition, BuildDefinition::default(), "content: {:?}", content);
        }
    }

    #[test]
    fn test_parse_ignores_unknown_top_level_keys() {
        let definition =
            parse_build_file(Path::new(BUILD), "description: shared code\ndependencies:\n").unwrap();
        assert_eq!(definition, BuildDefinition::default());
    }

    #[test]
    fn test_parse_reads_first_document_only() {
        let definition = parse_build_file(
            Path::new(BUILD),
            "artifact:\n  group: first\n---\nartifact:\n  group: second\n",
        )
        .unwrap();
        assert_eq!(definition.artifact.unwrap().group, "first");
    }

    #[test]
    fn test_parse_dependency_error_names_file_and_line() {
        let err = parse_build_file(
            Path::new(BUILD),
            "artifact:\n  group: g\ndependencies:\n  - group: g\n    artifact: a\n    scope: test\n",
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Grammar);
        assert_eq!(err.path(), Path::new(BUILD));
        assert_eq!(err.line(), Some(6));
        assert!(err.to_string().contains("unrecognized field `scope`"));
        assert!(err.to_string().contains(BUILD));
    }

    #[test]
    fn test_parse_dependency_keeps_numeric_text() {
        let definition = parse_build_file(
            Path::new(BUILD),
            "artifact:\n  version: 1.10\ndependencies:\n  - group: g\n    artifact: 1.10\n    type: 2.0\n  - artifact: [1.10]\n    type: [2.0]\n",
        )
        .unwrap();

        assert_eq!(definition.artifact.unwrap().version, "1.10");
        assert_eq!(definition.dependencies[0].artifact, vec!["1.10"]);
        assert_eq!(definition.dependencies[0].types, vec!["2.0"]);
        assert_eq!(
            definition.dependencies[0].artifact,
            definition.dependencies[1].artifact
        );
        assert_eq!(definition.dependencies[0].types, definition.dependencies[1].types);
    }

    #[test]
    fn test_parse_duplicate_top_level_key() {
        let err = parse_build_file(
            Path::new(BUILD),
            "dependencies:\n  - g:a:1\ndependencies:\n  - g:b:1\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar);
        assert!(err.to_string().contains("duplicate field `dependencies`"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse_build_file(Path::new(BUILD), "artifact: [unclosed\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Grammar);
        assert!(err.line().is_some());
    }

    #[test]
    fn test_resolve_missing_artifact_without_parent() {
        let err = resolve_artifact(Path::new(BUILD), None, None).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { field: "artifact", .. }
        ));
        assert_eq!(err.path(), Path::new(BUILD));
    }

    #[test]
    fn test_resolve_synthesizes_from_parent() {
        let parent = parent();
        let artifact = resolve_artifact(Path::new(BUILD), None, Some(&parent)).unwrap();
        assert_eq!(artifact, Artifact::new("com.acme", "service", "2.1"));
    }

    #[test]
    fn test_resolve_defaults_name_to_directory() {
        let declared = Artifact::new("g", "", "1.0");
        let artifact = resolve_artifact(Path::new(BUILD), Some(declared), None).unwrap();
        assert_eq!(artifact, Artifact::new("g", "service", "1.0"));
    }

    #[test]
    fn test_resolve_inherits_group_and_version() {
        let parent = parent();
        let declared = Artifact::new("", "custom", "");
        let artifact = resolve_artifact(Path::new(BUILD), Some(declared), Some(&parent)).unwrap();
        assert_eq!(artifact, Artifact::new("com.acme", "custom", "2.1"));
    }

    #[test]
    fn test_resolve_declared_values_win_over_parent() {
        let parent = parent();
        let declared = Artifact::new("org.own", "svc", "9.9");
        let artifact =
            resolve_artifact(Path::new(BUILD), Some(declared.clone()), Some(&parent)).unwrap();
        assert_eq!(artifact, declared);
    }

    #[test]
    fn test_resolve_root_requires_group() {
        let declared = Artifact::new("", "svc", "1.0");
        let err = resolve_artifact(Path::new(BUILD), Some(declared), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(
            err,
            LoadError::MissingField { field: "artifact.group", .. }
        ));
    }

    #[test]
    fn test_resolve_root_requires_version() {
        let declared = Artifact::new("g", "svc", "");
        let err = resolve_artifact(Path::new(BUILD), Some(declared), None).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { field: "artifact.version", .. }
        ));
    }

    #[test]
    fn test_resolve_build_file_at_filesystem_root() {
        let declared = Artifact::new("g", "", "1.0");
        let err = resolve_artifact(Path::new("/BUILD"), Some(declared), None).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { field: "artifact.artifact", .. }
        ));
    }
}
