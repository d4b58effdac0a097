//! Dependency declarations and their two surface syntaxes.
//!
//! A dependency is declared either as a mapping:
//!
//! ```yaml
//! - group: com.acme
//!   artifact: [svc-a, svc-b]
//!   version: "1.2"
//!   type: jar
//!   classifier: sources
//! ```
//!
//! or in compact form as a single `group:artifact:version:type:classifier`
//! string, where the artifact, type and classifier segments may list several
//! comma-separated values:
//!
//! ```yaml
//! - com.acme:svc-a,svc-b:1.2:jar:sources
//! ```
//!
//! Both forms normalize to the same [`Dependency`].
//!
//! Values keep their source text: `version: 1.10`, `artifact: 1.10` and
//! `artifact: [1.10]` all yield `1.10`. serde_yaml resolves an unquoted
//! scalar to a number as soon as it is read without a type hint, so list
//! fields holding a lone scalar are found first on a plain [`Value`] pass
//! and then read as strings.

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of `:` separated segments in the compact form.
const MAX_PARTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub group: String,
    pub artifact: Vec<String>,
    pub version: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(rename = "classifier")]
    pub classifiers: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error(
        "invalid dependency `{value}`, too many parts ({count}), expected at most {max} \
         (group:artifact:version:type:classifier)",
        max = MAX_PARTS
    )]
    TooManyParts { value: String, count: usize },

    #[error("invalid dependency, `artifact` must name at least one artifact")]
    MissingArtifact,
}

impl Dependency {
    fn from_parts(
        group: String,
        artifact: Vec<String>,
        version: String,
        types: Vec<String>,
        classifiers: Vec<String>,
    ) -> Result<Self, DependencyError> {
        if artifact.is_empty() {
            return Err(DependencyError::MissingArtifact);
        }
        Ok(Self {
            group,
            artifact,
            version,
            types,
            classifiers,
        })
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group,
            self.artifact.join(","),
            self.version
        )?;
        if !self.types.is_empty() || !self.classifiers.is_empty() {
            write!(f, ":{}", self.types.join(","))?;
        }
        if !self.classifiers.is_empty() {
            write!(f, ":{}", self.classifiers.join(","))?;
        }
        Ok(())
    }
}

/// Trims every value and drops the ones left empty.
fn normalize_list<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

impl FromStr for Dependency {
    type Err = DependencyError;

    /// Parses the compact `group:artifact:version:type:classifier` form.
    /// Missing trailing segments leave their fields empty.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() > MAX_PARTS {
            return Err(DependencyError::TooManyParts {
                value: value.to_string(),
                count: parts.len(),
            });
        }

        let part = |index: usize| parts.get(index).copied().unwrap_or("");
        Dependency::from_parts(
            part(0).trim().to_string(),
            normalize_list(part(1).split(',')),
            part(2).trim().to_string(),
            normalize_list(part(3).split(',')),
            normalize_list(part(4).split(',')),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Group,
    Artifact,
    Version,
    Type,
    Classifier,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "group" => Some(Field::Group),
            "artifact" => Some(Field::Artifact),
            "version" => Some(Field::Version),
            "type" => Some(Field::Type),
            "classifier" => Some(Field::Classifier),
            _ => None,
        }
    }

    fn is_list(self) -> bool {
        matches!(self, Field::Artifact | Field::Type | Field::Classifier)
    }

    fn name(self) -> &'static str {
        match self {
            Field::Group => "group",
            Field::Artifact => "artifact",
            Field::Version => "version",
            Field::Type => "type",
            Field::Classifier => "classifier",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> Visitor<'de> for FieldVisitor {
            type Value = Field;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a dependency field name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Field, E> {
                Field::from_name(value).ok_or_else(|| {
                    E::custom(format_args!("unrecognized field `{}` in dependency", value))
                })
            }
        }

        deserializer.deserialize_str(FieldVisitor)
    }
}

/// A field holding exactly one scalar. The raw scalar text is kept, so
/// `version: 1.10` stays `1.10`.
struct SingleValue(Field);

impl<'de> DeserializeSeed<'de> for SingleValue {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for SingleValue {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}` to be a single string value", self.0)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.trim().to_string())
    }
}

/// A field holding one scalar or a sequence of scalars. Only reached for
/// lone scalars when their shape was not known in advance.
struct ValueList(Field);

impl<'de> DeserializeSeed<'de> for ValueList {
    type Value = Vec<String>;

    fn deserialize<D>(self, deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueList {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}` to be one or more string values", self.0)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Vec<String>, E> {
        Ok(normalize_list([value]))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Vec<String>, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Vec<String>, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Vec<String>, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Vec<String>, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<String>, E> {
        Ok(Vec::new())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<String>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::new();
        while let Some(value) = seq.next_element_seed(ListItem(self.0))? {
            values.push(value);
        }
        Ok(normalize_list(values.iter().map(String::as_str)))
    }
}

/// One entry of a [`ValueList`] sequence.
struct ListItem(Field);

impl<'de> DeserializeSeed<'de> for ListItem {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de> Visitor<'de> for ListItem {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "each `{}` entry to be a string value", self.0)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }
}

/// List fields of one structured dependency written as a lone number or
/// boolean. Those must be read as strings to keep their source text.
fn lone_scalar_fields(node: &Value) -> Vec<Field> {
    let Some(mapping) = node.as_mapping() else {
        return Vec::new();
    };
    mapping
        .iter()
        .filter(|(_, value)| matches!(value, Value::Number(_) | Value::Bool(_)))
        .filter_map(|(key, _)| key.as_str().and_then(Field::from_name))
        .filter(|field| field.is_list())
        .collect()
}

/// Decodes a `dependencies` sequence.
///
/// Built from the same entries decoded as plain [`Value`]s, which tell which
/// list fields hold a lone scalar. A null value is an empty list.
pub(crate) struct DependencyListSeed {
    lone_scalars: Vec<Vec<Field>>,
}

impl DependencyListSeed {
    pub(crate) fn new(nodes: &[Value]) -> Self {
        Self {
            lone_scalars: nodes.iter().map(lone_scalar_fields).collect(),
        }
    }
}

impl<'de> DeserializeSeed<'de> for DependencyListSeed {
    type Value = Vec<Dependency>;

    fn deserialize<D>(self, deserializer: D) -> Result<Vec<Dependency>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for DependencyListSeed {
    type Value = Vec<Dependency>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of dependency declarations")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<Dependency>, E> {
        Ok(Vec::new())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Vec<Dependency>, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut dependencies = Vec::new();
        loop {
            let lone_scalars = self
                .lone_scalars
                .get(dependencies.len())
                .map_or(&[][..], Vec::as_slice);
            match seq.next_element_seed(DependencySeed(lone_scalars))? {
                Some(dependency) => dependencies.push(dependency),
                None => return Ok(dependencies),
            }
        }
    }
}

/// One dependency, in either form.
struct DependencySeed<'a>(&'a [Field]);

impl<'de, 'a> DeserializeSeed<'de> for DependencySeed<'a> {
    type Value = Dependency;

    fn deserialize<D>(self, deserializer: D) -> Result<Dependency, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DependencyVisitor {
            lone_scalars: self.0,
        })
    }
}

struct DependencyVisitor<'a> {
    lone_scalars: &'a [Field],
}

impl<'de, 'a> Visitor<'de> for DependencyVisitor<'a> {
    type Value = Dependency;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(
            "a dependency declaration as a mapping or a \
             `group:artifact:version:type:classifier` string",
        )
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Dependency, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Dependency, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen: Vec<Field> = Vec::with_capacity(MAX_PARTS);
        let mut group = String::new();
        let mut artifact = Vec::new();
        let mut version = String::new();
        let mut types = Vec::new();
        let mut classifiers = Vec::new();

        while let Some(field) = map.next_key::<Field>()? {
            if seen.contains(&field) {
                return Err(de::Error::duplicate_field(field.name()));
            }
            seen.push(field);

            if !field.is_list() {
                let value = map.next_value_seed(SingleValue(field))?;
                match field {
                    Field::Group => group = value,
                    _ => version = value,
                }
                continue;
            }

            let values = if self.lone_scalars.contains(&field) {
                normalize_list([map.next_value_seed(SingleValue(field))?.as_str()])
            } else {
                map.next_value_seed(ValueList(field))?
            };
            match field {
                Field::Artifact => artifact = values,
                Field::Type => types = values,
                _ => classifiers = values,
            }
        }

        Dependency::from_parts(group, artifact, version, types, classifiers)
            .map_err(de::Error::custom)
    }
}
