use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use docs_sync::cli::{run_sync, SyncArgs};
use docs_sync::config::{self, Config};
use docs_sync::extract::Strategy;
use docs_sync::ui;

#[derive(clap::Parser)]
#[command(
    name = "docs-sync",
    version,
    about = "Mirror versioned documentation from a repository's release tags"
)]
struct Args {
    #[arg(help = "Path to the source repository")]
    repo_path: PathBuf,

    #[arg(long, help = "Maximum number of minor versions to process, 0 for all [default: 10]")]
    max_versions: Option<usize>,

    #[arg(
        long,
        value_parser = parse_workers,
        help = "Number of parallel extraction workers [default: 4]"
    )]
    parallel: Option<usize>,

    #[arg(long, value_enum, help = "Extraction strategy [default: archive]")]
    strategy: Option<Strategy>,

    #[arg(short, long, help = "Output directory for the versioned docs [default: _docs]")]
    output: Option<PathBuf>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout in seconds for each git or tar process [default: 120]"
    )]
    timeout: Option<u64>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Do not write the .sync_cache.json record")]
    no_cache: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(workers) => Ok(workers),
        Err(e) => Err(e.to_string()),
    }
}

impl Args {
    /// CLI flags win over the config file.
    fn into_sync_args(self, config: &Config) -> SyncArgs {
        let mut sync = SyncArgs::from_config(self.repo_path, config);
        if let Some(max_versions) = self.max_versions {
            sync.max_versions = max_versions;
        }
        if let Some(parallel) = self.parallel {
            sync.parallel = parallel;
        }
        if let Some(strategy) = self.strategy {
            sync.strategy = strategy;
        }
        if let Some(output) = self.output {
            sync.output_dir = output;
        }
        if let Some(timeout) = self.timeout {
            sync.timeout = Duration::from_secs(timeout);
        }
        if self.no_cache {
            sync.write_cache = false;
        }
        sync
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    ui::init_logging(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let sync_args = args.into_sync_args(&config);
    if let Err(e) = run_sync(&sync_args, &config) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
