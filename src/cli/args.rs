use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::common::config::OutputFormat;
use crate::sweep::TaskId;

/// devsweep: reclaim disk space on a development workstation
#[derive(Parser, Debug)]
#[command(
    name = "devsweep",
    version,
    about = "Reclaim disk space from developer caches, dependency dirs, logs and old packages",
    long_about = "devsweep clears package-manager, build-tool and mobile-dev caches, sweeps\n\
                  node_modules after asking, trims apt, journald and snap leftovers, and\n\
                  reports the free space left on your volume. Every step is best effort.",
    after_help = "EXAMPLES:\n  \
        devsweep                               Full cleanup (asks before deleting node_modules)\n  \
        devsweep run --dry-run                 Show what would be removed\n  \
        devsweep run --skip apt,snap           Everything except apt and snap\n  \
        devsweep run --only dependency-dirs    Just the node_modules sweep\n  \
        devsweep --volume /dev/nvme0n1p2       Report free space on a specific device\n  \
        devsweep list                          Show the cleanup steps in order\n  \
        devsweep config show                   Print the effective configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use
    #[arg(long, global = true, env = "DEVSWEEP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Home directory to clean (defaults to the current user's)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Device or mount point for the free-space report
    #[arg(long, global = true, value_name = "ID")]
    pub volume: Option<String>,

    /// Output format (defaults to the config's `output_format`)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the cleanup steps (the default when no command is given)
    Run(RunArgs),

    /// List the cleanup steps in the order they run
    List,

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Show what would be removed; run no cleaners and ask nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Steps to leave out
    #[arg(long, value_delimiter = ',', value_name = "STEP")]
    pub skip: Vec<TaskId>,

    /// Run only these steps
    #[arg(long, value_delimiter = ',', value_name = "STEP")]
    pub only: Vec<TaskId>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file if none exists
    Init,

    /// Reset to default configuration
    Reset,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
