//! `skillsync sync` and `skillsync status`: run or inspect a registry pass.

use std::{path::PathBuf, process::ExitCode};

use {
    anyhow::Result,
    skillsync_config::SkillsyncConfig,
    skillsync_registry::{SyncReport, Synchronizer},
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Options for a single `sync` invocation.
pub struct SyncArgs {
    pub force: bool,
    pub json: bool,
    pub concurrency: Option<usize>,
    pub target: Option<PathBuf>,
}

fn build(config: &SkillsyncConfig, target: Option<PathBuf>) -> Result<Synchronizer> {
    let target = target.unwrap_or_else(|| skillsync_config::target_dir(config));
    Ok(Synchronizer::from_config(config, target)?)
}

pub async fn handle_sync(mut config: SkillsyncConfig, args: SyncArgs) -> Result<ExitCode> {
    if let Some(limit) = args.concurrency {
        config.registry.concurrency_limit = limit;
    }
    let sync = build(&config, args.target)?.with_force(args.force);

    let report = match sync.synchronize().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{RED}sync failed:{RESET} {e}");
            return Ok(ExitCode::FAILURE);
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &sync.target().root().display().to_string());
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub async fn handle_status(config: SkillsyncConfig, target: Option<PathBuf>) -> Result<ExitCode> {
    let sync = build(&config, target)?;
    let status = match sync.status().await {
        Ok(status) => status,
        Err(e) => {
            eprintln!("{RED}status check failed:{RESET} {e}");
            return Ok(ExitCode::FAILURE);
        },
    };

    println!("Target:    {}", sync.target().root().display());
    println!(
        "Installed: {}",
        status.local_version.as_deref().unwrap_or("(none)")
    );
    println!(
        "Registry:  {} ({} files)",
        status.remote_version, status.file_count
    );
    if status.is_up_to_date() {
        println!("{GREEN}up to date{RESET}");
    } else {
        println!("{BOLD}update available{RESET}: run `skillsync sync`");
    }
    Ok(ExitCode::SUCCESS)
}

// ── Printing ────────────────────────────────────────────────────────────────

fn print_report(report: &SyncReport, target: &str) {
    if report.is_up_to_date() {
        println!(
            "{GREEN}Already up to date{RESET} (version {}) in {target}",
            report.version_after
        );
        return;
    }

    println!(
        "{BOLD}Synchronizing {} → {}{RESET}",
        report.version_before.as_deref().unwrap_or("(none)"),
        report.version_after
    );
    for outcome in &report.outcomes {
        if outcome.success {
            println!("  [{GREEN}ok{RESET}]    {}", outcome.path);
        } else {
            let reason = outcome
                .failure_reason
                .map(|r| r.to_string())
                .unwrap_or_default();
            let detail = outcome.detail.as_deref().unwrap_or_default();
            println!(
                "  [{RED}fail{RESET}]  {}  {reason} {DIM}{detail}{RESET}",
                outcome.path
            );
        }
    }

    let ok = report.succeeded().count();
    let failed = report.failed().count();
    println!();
    if failed == 0 {
        println!("{GREEN}{ok} installed{RESET} into {target}");
    } else {
        println!("{GREEN}{ok} installed{RESET}, {RED}{failed} failed{RESET} into {target}");
    }
}
