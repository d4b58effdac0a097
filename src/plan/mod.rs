//! Build discovery: walking the tree, parsing build files and linking them.

pub mod build_file;
pub mod loader;
pub mod walker;

pub use build_file::{parse_build_file, resolve_artifact, BuildDefinition};
pub use loader::{load_builds, BuildLoader};
pub use walker::{find_build_files, BuildFileWalker, WalkOrder, BUILD_DIR, BUILD_FILE};
