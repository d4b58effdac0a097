pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, FilesArgs, OutputFormatArg, TreeArgs};
pub use output::{OutputFormat, OutputFormatter};
