use super::{DirEntries, DirEntry, FileMetadata, FileSystem, FileType};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct MockEntry {
    content: Option<String>,
    file_type: FileType,
}

/// In-memory file system. Directory listings are returned in path order, which
/// makes traversal order deterministic in tests.
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, MockEntry>>,
    unreadable: RwLock<HashSet<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            unreadable: RwLock::new(HashSet::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
    }

    /// Adds a directory whose listing fails with `PermissionDenied`.
    pub fn add_unreadable_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.add_dir(&path);
        self.unreadable.write().unwrap().insert(path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }
        normalized
    }

    fn ensure_parents(files: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("Path not found: {}", path.display()),
        )
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let path = self.normalize_path(path);
        if self.files.read().unwrap().contains_key(&path) {
            Ok(path)
        } else {
            Err(Self::not_found(&path))
        }
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        let entry = files.get(&path).ok_or_else(|| Self::not_found(&path))?;

        Ok(FileMetadata {
            file_type: entry.file_type,
            len: entry.content.as_ref().map_or(0, |c| c.len() as u64),
        })
    }

    fn read_dir<'a>(&'a self, path: &Path) -> io::Result<DirEntries<'a>> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();

        match files.get(&path) {
            Some(entry) if entry.file_type == FileType::Directory => {}
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Not a directory: {}", path.display()),
                ))
            }
            None => return Err(Self::not_found(&path)),
        }

        if self.unreadable.read().unwrap().contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }

        let entries: Vec<DirEntry> = files
            .iter()
            .filter(|(entry_path, _)| entry_path.parent() == Some(path.as_path()))
            .map(|(entry_path, entry)| DirEntry::new(entry_path.clone(), entry.file_type))
            .collect();

        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        let entry = files.get(&path).ok_or_else(|| Self::not_found(&path))?;

        entry.content.clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Is a directory: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let fs = MockFileSystem::new();
        fs.add_file("services/api/BUILD", "artifact: {}");

        assert!(fs.metadata(Path::new("/mock/services")).unwrap().is_dir());
        assert!(fs.metadata(Path::new("services/api")).unwrap().is_dir());
        assert!(fs.metadata(Path::new("services/api/BUILD")).unwrap().is_file());
    }

    #[test]
    fn test_read_dir_lists_direct_children_in_order() {
        let fs = MockFileSystem::new();
        fs.add_file("b/BUILD", "");
        fs.add_file("BUILD", "");
        fs.add_dir("a/nested");

        let names: Vec<String> = fs
            .read_dir(Path::new("."))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["BUILD", "a", "b"]);
    }

    #[test]
    fn test_read_dir_unreadable() {
        let fs = MockFileSystem::new();
        fs.add_unreadable_dir("locked");

        let err = fs.read_dir(Path::new("locked")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_canonicalize_resolves_relative_components() {
        let fs = MockFileSystem::new();
        fs.add_dir("a/b");

        assert_eq!(
            fs.canonicalize(Path::new("a/b/../b/.")).unwrap(),
            PathBuf::from("/mock/a/b")
        );
        assert!(fs.canonicalize(Path::new("missing")).is_err());
    }

    #[test]
    fn test_read_to_string() {
        let fs = MockFileSystem::new();
        fs.add_file("BUILD", "dependencies: []");

        assert_eq!(fs.read_to_string(Path::new("BUILD")).unwrap(), "dependencies: []");
        assert!(fs.read_to_string(Path::new("missing")).is_err());
    }
}
