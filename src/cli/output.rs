use colored::*;
use std::path::Path;

use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::sweep::{CleanupTask, PathMatch, RunReport, SweepContext, TaskOutcome, TaskStatus, VolumeReport};

// ─── Run progress ─────────────────────────────────────────────────────────────

/// Print the opening line of a run
pub fn print_banner(dry_run: bool) {
    println!();
    if dry_run {
        println!(
            "{}  Starting safe cleanup {}",
            "🚀",
            "(dry run, nothing will be deleted)".yellow()
        );
    } else {
        println!("{}  Starting safe cleanup...", "🚀");
    }
    println!("{}", "─".repeat(60).dimmed());
}

/// Print the label of the step about to run
pub fn print_step(task: &CleanupTask) {
    println!();
    println!("{} Cleaning {}...", task.icon, task.label.bold());
}

/// Print what a finished step did
pub fn print_task_outcome(outcome: &TaskOutcome, home: &Path) {
    for command in &outcome.commands {
        let verb = if outcome.status == TaskStatus::DryRun { "would run" } else { "ran" };
        println!("    {} {} {}", "→".dimmed(), verb.dimmed(), command.cyan());
    }

    match outcome.status {
        TaskStatus::Completed => match outcome.bytes_freed {
            Some(bytes) => println!("    {} Freed {}", "✓".green(), format_size_colored(bytes)),
            None => println!("    {} Done", "✓".green()),
        },
        TaskStatus::Declined => println!(
            "    {} Skipped deleting {} ({} kept)",
            "⏩",
            outcome.label,
            outcome
                .matches
                .iter()
                .map(|m| format_path(&m.path, home))
                .collect::<Vec<_>>()
                .join(", ")
                .dimmed()
        ),
        TaskStatus::NothingFound => println!("    {} Nothing to clean", "·".dimmed()),
        TaskStatus::DryRun => match outcome.bytes_freed {
            Some(bytes) => println!("    {} Would free {}", "ℹ️", format_size_colored(bytes)),
            None => println!("    {} Would run the native cleaner", "ℹ️"),
        },
    }

    for issue in &outcome.issues {
        println!("    {} {}", "⚠".yellow(), issue.dimmed());
    }
}

fn dependency_rows(matches: &[PathMatch], home: &Path) -> Vec<String> {
    matches
        .iter()
        .map(|m| format!("{:>10}  {}", format_size(m.size_bytes), format_path(&m.path, home)))
        .collect()
}

/// List dependency directories with their sizes, `du -sh` style
pub fn print_dependency_matches(matches: &[PathMatch], home: &Path) {
    for row in dependency_rows(matches, home) {
        println!("    {}", row);
    }
    println!(
        "  {} Above are {} folders ({} total).",
        "👉",
        matches.len(),
        format_size_colored(crate::sweep::deps::total_size(matches))
    );
}

/// Same listing on stderr, used when stdout carries JSON or quiet output
pub fn eprint_dependency_matches(matches: &[PathMatch], home: &Path) {
    for row in dependency_rows(matches, home) {
        eprintln!("{}", row);
    }
}

// ─── Run summary ──────────────────────────────────────────────────────────────

fn volume_row(v: &VolumeReport) -> String {
    format!(
        "{:<18} {:>10} {:>10} {:>10} {:>4}% {}",
        v.filesystem,
        format_size(v.total_bytes),
        format_size(v.used_bytes),
        format_size(v.available_bytes),
        v.capacity_percent,
        v.mounted_on
    )
}

/// Print the end-of-run summary and the free-space report
pub fn print_run_summary(report: &RunReport) {
    println!();
    println!("{}", "─".repeat(60).dimmed());
    if report.dry_run {
        println!(
            "  {} Dry run complete. Would free at least {}. No files modified.",
            "ℹ️",
            format_size_colored(report.total_freed())
        );
    } else {
        println!(
            "  {} Cleanup complete in {}! Measured {} freed.",
            "🎉",
            format::format_duration(report.duration_secs).cyan(),
            format_size_colored(report.total_freed())
        );
    }

    let declined = report
        .outcomes
        .iter()
        .filter(|o| o.status == TaskStatus::Declined)
        .count();
    let issues: usize = report.outcomes.iter().map(|o| o.issues.len()).sum();
    if declined > 0 || issues > 0 {
        println!(
            "  {} {} declined, {} issues (see above)",
            "⚠".yellow(),
            declined,
            issues
        );
    }

    println!();
    match &report.volume_after {
        Some(after) => {
            println!(
                "  {}",
                format!(
                    "{:<18} {:>10} {:>10} {:>10} {:>5} {}",
                    "Filesystem", "Size", "Used", "Avail", "Use%", "Mounted on"
                )
                .dimmed()
            );
            println!("  {}", volume_row(after));
            if let Some(before) = &report.volume_before {
                format::print_kv(
                    "Free space change",
                    &format::format_delta(before.available_bytes, after.available_bytes),
                );
            }
        }
        None => println!(
            "  {} Volume '{}' not found; set `volume` in the config or pass --volume",
            "⚠".yellow(),
            report.volume
        ),
    }
    println!();
}

pub fn print_run_json(report: &RunReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// `<freed>  <available>  <volume>`
pub fn print_run_quiet(report: &RunReport) {
    let available = report
        .volume_after
        .as_ref()
        .map(|v| format_size(v.available_bytes))
        .unwrap_or_else(|| "-".to_string());
    println!("{}  {}  {}", format_size(report.total_freed()), available, report.volume);
}

// ─── Task list ────────────────────────────────────────────────────────────────

/// Print the ordered task list
pub fn print_task_list(tasks: &[CleanupTask], ctx: &SweepContext) {
    format::print_header("Cleanup steps");
    for (i, task) in tasks.iter().enumerate() {
        let gate = if task.requires_confirmation {
            " (asks first)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}. {} {:<16} {}{}",
            i + 1,
            task.icon,
            task.id.to_string().cyan(),
            task.label,
            gate
        );
        println!("       {}", task.describe(ctx).dimmed());
    }
    println!();
    format::print_kv("Home", &ctx.home.display().to_string());
    format::print_kv("Volume", &ctx.volume);
    println!();
}
