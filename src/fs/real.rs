use super::{DirEntries, DirEntry, FileMetadata, FileSystem, FileType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn to_file_type(file_type: fs::FileType) -> FileType {
    if file_type.is_dir() {
        FileType::Directory
    } else if file_type.is_symlink() {
        FileType::Symlink
    } else {
        FileType::File
    }
}

impl FileSystem for RealFileSystem {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let meta = fs::metadata(path)?;
        Ok(FileMetadata {
            file_type: to_file_type(meta.file_type()),
            len: meta.len(),
        })
    }

    fn read_dir<'a>(&'a self, path: &Path) -> io::Result<DirEntries<'a>> {
        let entries = fs::read_dir(path)?;
        Ok(Box::new(entries.map(|entry| {
            let entry = entry?;
            // DirEntry::file_type does not traverse symlinks
            let file_type = to_file_type(entry.file_type()?);
            Ok(DirEntry::new(entry.path(), file_type))
        })))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
