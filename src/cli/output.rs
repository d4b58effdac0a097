//! Output formatting for the build tree
//!
//! JSON and YAML render the tree through its `Serialize` impl: a list of
//! top-level builds, each with `buildFile`, `artifact`, `dependencies` and
//! nested `children`. The human format is an indented outline.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::model::{Build, BuildTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_tree(&self, tree: &BuildTree) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(tree).context("Failed to serialize build tree to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(tree).context("Failed to serialize build tree to YAML")
            }
            OutputFormat::Human => Ok(self.format_tree_human(tree)),
        }
    }

    fn format_tree_human(&self, tree: &BuildTree) -> String {
        if tree.is_empty() {
            return "No build files found\n".to_string();
        }

        let mut output = String::new();
        for root in tree.roots() {
            write_build(&mut output, tree, root, 0);
        }
        output
    }

    /// One path per line; relative to `base` when given.
    pub fn format_files(&self, files: &[PathBuf], base: Option<&Path>) -> String {
        files
            .iter()
            .map(|file| {
                let shown = base
                    .and_then(|base| file.strip_prefix(base).ok())
                    .unwrap_or(file);
                format!("{}\n", shown.display())
            })
            .collect()
    }
}

fn write_build(output: &mut String, tree: &BuildTree, build: &Build, depth: usize) {
    let indent = "  ".repeat(depth);
    // Writing to a String cannot fail
    let _ = writeln!(
        output,
        "{}{} ({})",
        indent,
        build.artifact(),
        build.build_file().display()
    );
    for dependency in build.dependencies() {
        let _ = writeln!(output, "{}  - depends on {}", indent, dependency);
    }
    for child in tree.children(build) {
        write_build(output, tree, child, depth + 1);
    }
}
