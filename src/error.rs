use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Broad classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Path resolution or directory/file access failed.
    Filesystem,
    /// A build file is missing a required field or conflicts with another.
    Configuration,
    /// A build file could not be decoded, including dependency grammar errors.
    Grammar,
}

/// Errors raised while discovering, parsing and linking build files.
///
/// Every variant is fatal for the whole load: nothing is retried and no
/// partial tree is returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to check build directory `{}`: {source}", path.display())]
    BuildDirectory { path: PathBuf, source: io::Error },

    #[error("Not a directory: `{}`", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read directory `{}`: {source}", path.display())]
    ReadDirectory { path: PathBuf, source: io::Error },

    #[error("Failed to read build file `{}`: {source}", path.display())]
    ReadBuildFile { path: PathBuf, source: io::Error },

    #[error("Failed to parse build config `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Build config `{}` is missing `{field}` field", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error(
        "Build config `{}` is in the same directory as `{}`",
        path.display(),
        existing.display()
    )]
    DuplicateBuild { path: PathBuf, existing: PathBuf },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::BuildDirectory { .. }
            | LoadError::NotADirectory(_)
            | LoadError::ReadDirectory { .. }
            | LoadError::ReadBuildFile { .. } => ErrorKind::Filesystem,
            LoadError::MissingField { .. } | LoadError::DuplicateBuild { .. } => {
                ErrorKind::Configuration
            }
            LoadError::Parse { .. } => ErrorKind::Grammar,
        }
    }

    /// The file or directory the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::BuildDirectory { path, .. }
            | LoadError::ReadDirectory { path, .. }
            | LoadError::ReadBuildFile { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::MissingField { path, .. }
            | LoadError::DuplicateBuild { path, .. } => path,
            LoadError::NotADirectory(path) => path,
        }
    }

    /// 1-based source line, when the YAML decoder reported one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Parse { source, .. } => source.location().map(|l| l.line()),
            _ => None,
        }
    }
}
