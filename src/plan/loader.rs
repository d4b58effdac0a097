use super::build_file::{parse_build_file, resolve_artifact};
use super::walker::{BuildFileWalker, WalkOrder};
use crate::error::LoadError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::{BuildId, BuildTree};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Links builds into a tree as their files are discovered.
///
/// Relies on pre-order discovery: by the time a build file is added, every
/// build in an ancestor directory has already been registered.
pub(crate) struct TreeAssembler {
    root: PathBuf,
    tree: BuildTree,
    by_dir: HashMap<PathBuf, BuildId>,
}

impl TreeAssembler {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            tree: BuildTree::new(),
            by_dir: HashMap::new(),
        }
    }

    /// Nearest strict ancestor of `dir`, up to and including the traversal
    /// root, that has a registered build.
    fn find_parent(&self, dir: &Path) -> Option<BuildId> {
        if self.by_dir.is_empty() {
            return None;
        }

        let mut current = dir;
        while current != self.root {
            current = current.parent()?;
            if let Some(id) = self.by_dir.get(current) {
                return Some(*id);
            }
        }
        None
    }

    pub(crate) fn add_build_file(&mut self, build_file: &Path, content: &str) -> Result<BuildId, LoadError> {
        let dir = build_file.parent().unwrap_or(&self.root).to_path_buf();
        if let Some(existing) = self.by_dir.get(&dir).and_then(|id| self.tree.get(*id)) {
            return Err(LoadError::DuplicateBuild {
                path: build_file.to_path_buf(),
                existing: existing.build_file().to_path_buf(),
            });
        }

        let parent = self.find_parent(&dir);

        debug!(build_file = %build_file.display(), "Parsing build file");
        let definition = parse_build_file(build_file, content)?;
        let parent_artifact = parent
            .and_then(|id| self.tree.get(id))
            .map(|build| build.artifact());
        let artifact = resolve_artifact(build_file, definition.artifact, parent_artifact)?;

        debug!(
            build_file = %build_file.display(),
            artifact = %artifact,
            dependencies = definition.dependencies.len(),
            parent = ?parent_artifact.map(|a| a.to_string()),
            "Resolved build"
        );

        let id = self.tree.insert(
            build_file.to_path_buf(),
            artifact,
            definition.dependencies,
            parent,
        );
        self.by_dir.insert(dir, id);
        Ok(id)
    }

    pub(crate) fn finish(self) -> BuildTree {
        self.tree
    }
}

/// Discovers the build files under a directory and assembles them into a
/// [`BuildTree`].
pub struct BuildLoader<F: FileSystem = RealFileSystem> {
    fs: F,
    order: WalkOrder,
}

impl BuildLoader<RealFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem::new())
    }
}

impl Default for BuildLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> BuildLoader<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            order: WalkOrder::default(),
        }
    }

    pub fn with_order(mut self, order: WalkOrder) -> Self {
        self.order = order;
        self
    }

    /// Resolves `dir` to an absolute directory path.
    pub fn build_directory(&self, dir: &Path) -> Result<PathBuf, LoadError> {
        let directory = self
            .fs
            .canonicalize(dir)
            .map_err(|source| LoadError::BuildDirectory {
                path: dir.to_path_buf(),
                source,
            })?;

        let metadata = self
            .fs
            .metadata(&directory)
            .map_err(|source| LoadError::BuildDirectory {
                path: directory.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory(directory));
        }
        Ok(directory)
    }

    /// Paths of all build files under `dir`, in discovery order.
    pub fn find(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let directory = self.build_directory(dir)?;
        super::walker::find_build_files(&self.fs, &directory, self.order)
    }

    /// Loads every build under `dir`. The first error aborts the load.
    pub fn load(&self, dir: &Path) -> Result<BuildTree, LoadError> {
        let start = Instant::now();
        let directory = self.build_directory(dir)?;

        info!(dir = %directory.display(), order = ?self.order, "Loading builds");

        let mut assembler = TreeAssembler::new(directory.clone());
        BuildFileWalker::new(&self.fs)
            .with_order(self.order)
            .walk(&directory, &mut |build_file: &Path| {
                debug!(build_file = %build_file.display(), "Reading build file");
                let content =
                    self.fs
                        .read_to_string(build_file)
                        .map_err(|source| LoadError::ReadBuildFile {
                            path: build_file.to_path_buf(),
                            source,
                        })?;
                assembler.add_build_file(build_file, &content)?;
                Ok(())
            })?;

        let tree = assembler.finish();
        info!(
            builds = tree.len(),
            roots = tree.root_ids().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded builds"
        );
        Ok(tree)
    }
}

/// Loads the build tree under `dir` from the real file system, visiting
/// directories in file system order.
pub fn load_builds(dir: &Path) -> Result<BuildTree, LoadError> {
    BuildLoader::new().load(dir)
}
