//! Build nodes and the forest they form.
//!
//! Nodes live in a [`BuildTree`] arena and refer to each other by
//! [`BuildId`]. A node owns its child list; the parent link is a plain index
//! used for lookups only and is never serialized.

use super::{Artifact, Dependency};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildId(usize);

/// One node of the build tree, created from a single build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    id: BuildId,
    build_file: PathBuf,
    artifact: Artifact,
    dependencies: Vec<Dependency>,
    parent: Option<BuildId>,
    children: Vec<BuildId>,
}

impl Build {
    pub fn id(&self) -> BuildId {
        self.id
    }

    /// Absolute path of the build file this node was created from.
    pub fn build_file(&self) -> &Path {
        &self.build_file
    }

    /// Directory containing the build file.
    pub fn directory(&self) -> &Path {
        self.build_file.parent().unwrap_or(&self.build_file)
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn parent(&self) -> Option<BuildId> {
        self.parent
    }

    pub fn children(&self) -> &[BuildId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Forest of builds in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildTree {
    builds: Vec<Build>,
    roots: Vec<BuildId>,
}

impl BuildTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolved build and links it under `parent`, or as a new root.
    /// Children are kept in insertion order.
    pub(crate) fn insert(
        &mut self,
        build_file: PathBuf,
        artifact: Artifact,
        dependencies: Vec<Dependency>,
        parent: Option<BuildId>,
    ) -> BuildId {
        let id = BuildId(self.builds.len());
        self.builds.push(Build {
            id,
            build_file,
            artifact,
            dependencies,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent) => self.builds[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    pub fn get(&self, id: BuildId) -> Option<&Build> {
        self.builds.get(id.0)
    }

    pub fn root_ids(&self) -> &[BuildId] {
        &self.roots
    }

    /// Top-level builds, those without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Build> + '_ {
        self.roots.iter().map(move |id| &self.builds[id.0])
    }

    pub fn parent(&self, build: &Build) -> Option<&Build> {
        build.parent.map(|id| &self.builds[id.0])
    }

    pub fn children<'a>(&'a self, build: &'a Build) -> impl Iterator<Item = &'a Build> + 'a {
        build.children.iter().map(move |id| &self.builds[id.0])
    }

    /// All builds in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Build> + '_ {
        self.builds.iter()
    }

    pub fn find(&self, build_file: &Path) -> Option<&Build> {
        self.builds.iter().find(|b| b.build_file == build_file)
    }

    /// Number of edges between `build` and its root.
    pub fn depth(&self, build: &Build) -> usize {
        let mut depth = 0;
        let mut current = build;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }
}

/// Serialized view of a node and its subtree.
struct BuildNode<'a> {
    tree: &'a BuildTree,
    build: &'a Build,
}

struct ChildNodes<'a> {
    tree: &'a BuildTree,
    ids: &'a [BuildId],
}

impl Serialize for BuildNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Build", 4)?;
        state.serialize_field("buildFile", &self.build.build_file)?;
        state.serialize_field("artifact", &self.build.artifact)?;
        state.serialize_field("dependencies", &self.build.dependencies)?;
        state.serialize_field(
            "children",
            &ChildNodes {
                tree: self.tree,
                ids: &self.build.children,
            },
        )?;
        state.end()
    }
}

impl Serialize for ChildNodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ids.iter().map(|id| BuildNode {
            tree: self.tree,
            build: &self.tree.builds[id.0],
        }))
    }
}

/// Serializes as the list of top-level builds, each with nested children.
impl Serialize for BuildTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ChildNodes {
            tree: self,
            ids: &self.roots,
        }
        .serialize(serializer)
    }
}
