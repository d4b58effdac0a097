use mstrict::cli::commands::{CliArgs, Commands, FilesArgs, TreeArgs};
use mstrict::cli::output::OutputFormatter;
use mstrict::cli::OutputFormat;
use mstrict::config::MstrictConfig;
use mstrict::util::init_logging;
use mstrict::{NAME, VERSION};

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::process;
use tracing::{debug, error, info};

fn main() {
    let args = CliArgs::parse();

    let mut config = MstrictConfig::default();
    args.apply_to(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(2);
    }
    init_logging(config.logging_config());

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    let result = match &args.command {
        Commands::Tree(tree_args) => handle_tree(&config, tree_args),
        Commands::Files(files_args) => handle_files(&config, files_args),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

fn handle_tree(config: &MstrictConfig, args: &TreeArgs) -> Result<()> {
    let tree = config.loader().load(&config.build_dir)?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let rendered = formatter.format_tree(&tree)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output to `{}`", path.display()))?;
            info!(output = %path.display(), builds = tree.len(), "Wrote build tree");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn handle_files(config: &MstrictConfig, args: &FilesArgs) -> Result<()> {
    let loader = config.loader();
    let directory = loader.build_directory(&config.build_dir)?;
    let files = loader.find(&directory)?;

    let formatter = OutputFormatter::new(OutputFormat::Human);
    let base = args.relative.then_some(directory.as_path());
    print!("{}", formatter.format_files(&files, base));
    Ok(())
}
