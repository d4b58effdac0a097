//! File system access behind a trait: `RealFileSystem` for the walker, `MockFileSystem` for tests

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{DirEntries, DirEntry, FileMetadata, FileSystem, FileType};
pub use real::RealFileSystem;
