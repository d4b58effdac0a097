use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a file system entry. Symlinks are reported as such, never
/// resolved to their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

impl FileType {
    pub fn is_dir(self) -> bool {
        self == FileType::Directory
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file_type: FileType,
    pub len: u64,
}

impl FileMetadata {
    pub fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    path: PathBuf,
    file_type: FileType,
}

impl DirEntry {
    pub fn new(path: PathBuf, file_type: FileType) -> Self {
        Self { path, file_type }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Last path component; empty for a path without one.
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }
}

/// Directory entries, yielded lazily so a large directory is never held in
/// memory at once.
pub type DirEntries<'a> = Box<dyn Iterator<Item = io::Result<DirEntry>> + 'a>;

/// File system access used by the build file walker and loader.
pub trait FileSystem {
    /// Absolute path with symlinks and `.`/`..` resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Lists `path` without following symlinked entries.
    fn read_dir<'a>(&'a self, path: &Path) -> io::Result<DirEntries<'a>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
