//! mstrict - build tree discovery for `BUILD` files
//!
//! This library finds the `BUILD` files below a directory, links each one to
//! the build in its nearest ancestor directory and resolves artifact
//! coordinates, so that every build knows what it produces and what it
//! depends on before anything is compiled.
//!
//! # Core Concepts
//!
//! - **Build file**: a YAML file named `BUILD`, at most one per directory,
//!   declaring an `artifact` and a list of `dependencies`
//! - **Build tree**: builds linked parent to child following the directory
//!   structure; builds without an ancestor build are roots
//! - **Inheritance**: a build that leaves out `group` or `version` takes them
//!   from its parent; the artifact name defaults to the directory name
//!
//! # Example Usage
//!
//! ```no_run
//! use mstrict::plan::{BuildLoader, WalkOrder};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), mstrict::LoadError> {
//! let tree = BuildLoader::new()
//!     .with_order(WalkOrder::Sorted)
//!     .load(Path::new("."))?;
//!
//! for root in tree.roots() {
//!     println!("{} ({} children)", root.artifact(), root.children().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`plan`]: directory walking, build file parsing and tree assembly
//! - [`model`]: artifacts, dependencies and the build tree
//! - [`fs`]: file system abstraction used by the walker

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod model;
pub mod plan;
pub mod util;

pub use config::{ConfigError, MstrictConfig};
pub use error::{ErrorKind, LoadError};
pub use model::{Artifact, Build, BuildId, BuildTree, Dependency, DependencyError};
pub use plan::{load_builds, BuildLoader, WalkOrder};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
