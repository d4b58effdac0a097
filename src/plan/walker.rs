use crate::error::LoadError;
use crate::fs::FileSystem;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Reserved name of the build-definition file, one per directory.
pub const BUILD_FILE: &str = "BUILD";

/// Build output directory, never traversed.
pub const BUILD_DIR: &str = "target";

/// Order in which subdirectories are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkOrder {
    /// Whatever order the file system enumerates entries in. Not stable
    /// across file systems.
    #[default]
    Filesystem,
    /// Subdirectories sorted by name, for reproducible output.
    Sorted,
}

/// Hidden directories and the build output directory are never entered.
pub fn is_skipped_dir(name: impl AsRef<OsStr>) -> bool {
    let name = name.as_ref().to_string_lossy();
    name.starts_with('.') || name == BUILD_DIR
}

/// Pre-order search for build files.
///
/// A directory's own build file is reported before any of its
/// subdirectories are entered. The tree assembler relies on this to find
/// every ancestor already registered.
pub struct BuildFileWalker<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    order: WalkOrder,
}

impl<'a, F: FileSystem + ?Sized> BuildFileWalker<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            order: WalkOrder::default(),
        }
    }

    pub fn with_order(mut self, order: WalkOrder) -> Self {
        self.order = order;
        self
    }

    /// Walks `dir`, calling `callback` with the path of each build file.
    /// The first error, from the file system or the callback, ends the walk.
    pub fn walk<C>(&self, dir: &Path, callback: &mut C) -> Result<(), LoadError>
    where
        C: FnMut(&Path) -> Result<(), LoadError>,
    {
        let read_dir_error = |source: io::Error| LoadError::ReadDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut subdirs: Vec<PathBuf> = Vec::new();
        {
            let entries = self.fs.read_dir(dir).map_err(read_dir_error)?;
            for entry in entries {
                let entry = entry.map_err(read_dir_error)?;
                if !entry.is_dir() {
                    if entry.file_name() == BUILD_FILE {
                        callback(entry.path())?;
                    }
                } else if is_skipped_dir(entry.file_name()) {
                    trace!(dir = %entry.path().display(), "Skipping directory");
                } else {
                    subdirs.push(entry.into_path());
                }
            }
        }

        if self.order == WalkOrder::Sorted {
            subdirs.sort();
        }

        for subdir in &subdirs {
            self.walk(subdir, callback)?;
        }
        Ok(())
    }
}

/// Collects the paths of every build file under `dir`, in walk order.
pub fn find_build_files<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &Path,
    order: WalkOrder,
) -> Result<Vec<PathBuf>, LoadError> {
    let mut found = Vec::new();
    BuildFileWalker::new(fs)
        .with_order(order)
        .walk(dir, &mut |path: &Path| {
            found.push(path.to_path_buf());
            Ok(())
        })?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fs::MockFileSystem;

    fn mock_repo() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("BUILD", "");
        fs.add_file("README.md", "");
        fs.add_file("api/BUILD", "");
        fs.add_file("api/src/BUILD", "");
        fs.add_file("api/target/BUILD", "");
        fs.add_file("lib/core/BUILD", "");
        fs.add_file(".hidden/BUILD", "");
        fs.add_file("web/.cache/BUILD", "");
        fs.add_file("web/build.yaml", "");
        fs
    }

    fn paths(values: &[&str]) -> Vec<PathBuf> {
        values.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_finds_build_files_in_pre_order() {
        let fs = mock_repo();
        let found = find_build_files(&fs, Path::new("/mock"), WalkOrder::Sorted).unwrap();

        assert_eq!(
            found,
            paths(&[
                "/mock/BUILD",
                "/mock/api/BUILD",
                "/mock/api/src/BUILD",
                "/mock/lib/core/BUILD",
            ])
        );
    }

    #[test]
    fn test_skips_hidden_and_output_directories() {
        let fs = mock_repo();
        let found = find_build_files(&fs, Path::new("/mock"), WalkOrder::Filesystem).unwrap();

        assert!(!found.iter().any(|p| p.starts_with("/mock/.hidden")));
        assert!(!found.iter().any(|p| p.starts_with("/mock/api/target")));
        assert!(!found.iter().any(|p| p.starts_with("/mock/web/.cache")));
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_build_file_reported_before_earlier_listed_subdirectory() {
        let fs = MockFileSystem::new();
        fs.add_file("AAA/BUILD", "");
        fs.add_file("BUILD", "");

        let found = find_build_files(&fs, Path::new("/mock"), WalkOrder::Filesystem).unwrap();
        assert_eq!(found, paths(&["/mock/BUILD", "/mock/AAA/BUILD"]));
    }

    #[test]
    fn test_directory_named_like_build_file_is_traversed() {
        let fs = MockFileSystem::new();
        fs.add_file("BUILD/nested/BUILD", "");

        let found = find_build_files(&fs, Path::new("/mock"), WalkOrder::Sorted).unwrap();
        assert_eq!(found, paths(&["/mock/BUILD/nested/BUILD"]));
    }

    #[test]
    fn test_empty_tree() {
        let fs = MockFileSystem::new();
        fs.add_dir("empty");

        let found = find_build_files(&fs, Path::new("/mock"), WalkOrder::Sorted).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_unreadable_directory_aborts_walk() {
        let fs = mock_repo();
        fs.add_unreadable_dir("api/locked");

        let err = find_build_files(&fs, Path::new("/mock"), WalkOrder::Sorted).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(err.path(), Path::new("/mock/api/locked"));
    }

    #[test]
    fn test_callback_error_stops_walk() {
        let fs = mock_repo();
        let mut visited = Vec::new();

        let err = BuildFileWalker::new(&fs)
            .with_order(WalkOrder::Sorted)
            .walk(Path::new("/mock"), &mut |path: &Path| {
                visited.push(path.to_path_buf());
                if path.ends_with("api/BUILD") {
                    return Err(LoadError::NotADirectory(path.to_path_buf()));
                }
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, LoadError::NotADirectory(_)));
        assert_eq!(visited, paths(&["/mock/BUILD", "/mock/api/BUILD"]));
    }

    #[test]
    fn test_is_skipped_dir() {
        assert!(is_skipped_dir(".git"));
        assert!(is_skipped_dir("target"));
        assert!(!is_skipped_dir("src"));
        assert!(!is_skipped_dir("targets"));
    }
}
