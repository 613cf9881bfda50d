use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use devsweep::cli::args::{Cli, Commands, ConfigAction, RunArgs};
use devsweep::cli::output;
use devsweep::common::config::{Config, OutputFormat};
use devsweep::common::logging;
use devsweep::sweep::{tasks, CleanupRunner, StdinConfirm, SystemCleaner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _log_guard = logging::init(cli.verbose, &Config::logs_dir());

    match cli.command {
        None => cmd_run(&cli, &RunArgs::default()),
        Some(Commands::Run(ref args)) => cmd_run(&cli, args),
        Some(Commands::List) => cmd_list(&cli),
        Some(Commands::Config { ref action }) => cmd_config(&cli, action),
        Some(Commands::Completions { ref shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                devsweep::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                devsweep::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                devsweep::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "devsweep", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

// ─── Run ──────────────────────────────────────────────────────────────────────

fn cmd_run(cli: &Cli, args: &RunArgs) -> Result<()> {
    let config = load_config(cli)?;
    let ctx = config.resolve(cli.home.as_deref(), cli.volume.as_deref())?;
    let format = cli.format.unwrap_or(config.output_format);

    let mut skip = config.skip.clone();
    skip.extend(args.skip.iter().copied());
    let plan = tasks::select(tasks::default_tasks(&ctx), &args.only, &skip);

    let human = format == OutputFormat::Human && !cli.quiet;
    let cleaner = SystemCleaner::new(ctx.use_sudo);
    let mut confirm = StdinConfirm::new(!human);

    let report = CleanupRunner::new(&ctx, &cleaner, &mut confirm)
        .dry_run(args.dry_run)
        .show_progress(human)
        .run(&plan);

    match format {
        OutputFormat::Human if cli.quiet => output::print_run_quiet(&report),
        OutputFormat::Human => output::print_run_summary(&report),
        OutputFormat::Json => output::print_run_json(&report)?,
        OutputFormat::Quiet => output::print_run_quiet(&report),
    }

    Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn cmd_list(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ctx = config.resolve(cli.home.as_deref(), cli.volume.as_deref())?;
    let plan = tasks::default_tasks(&ctx);

    match cli.format.unwrap_or(config.output_format) {
        OutputFormat::Human => output::print_task_list(&plan, &ctx),
        OutputFormat::Json => {
            let json: Vec<_> = plan
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "label": t.label,
                        "requires_confirmation": t.requires_confirmation,
                        "skipped_by_config": config.skip.contains(&t.id),
                        "action": t.describe(&ctx),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => {
            for task in &plan {
                println!("{}", task.id);
            }
        }
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load_from(&path)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init => {
            Config::init_dirs()?;
            if path.exists() {
                println!("  {} Config already exists at {}", "·".dimmed(), path.display());
            } else {
                Config::default().save_to(&path)?;
                println!("  {} Wrote default config to {}", "✓".green(), path.display());
            }
            Ok(())
        }
        ConfigAction::Reset => {
            Config::default().save_to(&path)?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
    }
}
