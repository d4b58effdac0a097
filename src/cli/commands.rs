use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::output::OutputFormat;
use crate::config::MstrictConfig;
use crate::plan::WalkOrder;

/// Build tree discovery for mstrict build files
#[derive(Parser, Debug)]
#[command(
    name = "mstrict",
    about = "Discover BUILD files and resolve them into a build tree",
    version,
    long_about = "mstrict finds every BUILD file below a directory, links each one to the \
                  BUILD file in its nearest ancestor directory, and resolves artifact \
                  coordinates, inheriting group and version from the parent."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "The directory containing the source code to build, defaults to the current directory"
    )]
    pub build_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Whether to include debug output")]
    pub debug: bool,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output (debug level)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(
        long,
        global = true,
        help = "Visit directories in name order instead of file system order"
    )]
    pub sorted: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Print the resolved build tree",
        long_about = "Loads every BUILD file below the build directory and prints the \
                      resulting build tree.\n\n\
                      Examples:\n  \
                      mstrict tree\n  \
                      mstrict --build-dir ./repo tree --format yaml\n  \
                      mstrict tree --format human --sorted"
    )]
    Tree(TreeArgs),

    #[command(about = "List discovered BUILD files without parsing them")]
    Files(FilesArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct FilesArgs {
    #[arg(long, help = "Print paths relative to the build directory")]
    pub relative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Human => OutputFormat::Human,
        }
    }
}

impl CliArgs {
    /// Layers the command-line flags over `config`.
    pub fn apply_to(&self, config: &mut MstrictConfig) {
        if let Some(dir) = &self.build_dir {
            config.build_dir = dir.clone();
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.to_lowercase();
        } else if self.verbose {
            config.log_level = "debug".to_string();
        } else if self.quiet {
            config.log_level = "error".to_string();
        }
        if self.log_json {
            config.log_json = true;
        }
        if self.sorted {
            config.order = WalkOrder::Sorted;
        }
    }
}
