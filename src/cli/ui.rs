//! Styled terminal output
//!
//! Errors go to stderr; everything else to stdout.

use crate::error::CloneError;
use crate::fetch::DryRunReport;
use crate::web::{WebError, WebRepo};
use crate::utils::tilde_path;
use console::style;
use std::path::Path;

/// Path with the user home shown as `~`.
pub fn display_path(path: &Path) -> String {
    tilde_path(path, dirs::home_dir().as_deref())
}

pub fn success(title: &str, details: &[String]) {
    println!();
    println!("{}  {}", style("✓").green().bold(), style(title).green().bold());
    if !details.is_empty() {
        println!();
        for line in details.iter().flat_map(|d| d.split('\n')) {
            println!("   {line}");
        }
    }
    println!();
}

pub fn info(message: &str) {
    println!("{}  {}", style("ℹ").blue().bold(), message);
}

pub fn warn(title: &str, message: &str) {
    println!();
    println!("{}  {}", style("!").yellow().bold(), style(title).yellow().bold());
    if !message.is_empty() {
        println!();
        for line in message.lines() {
            println!("   {}", style(line).dim());
        }
    }
    println!();
}

pub fn error(title: &str, message: &str, hints: &[String]) {
    eprintln!();
    eprintln!("{}  {}", style("✗").red().bold(), style(title).red().bold());
    if !message.is_empty() {
        eprintln!();
        for line in message.lines() {
            eprintln!("   {line}");
        }
    }
    if !hints.is_empty() {
        eprintln!();
        for hint in hints {
            eprintln!("   {} {}", style("Hint:").dim(), style(hint).cyan());
        }
    }
    eprintln!();
}

/// Print any error as a single terminal report.
pub fn report_error(err: &anyhow::Error) {
    if let Some(clone_err) = err.downcast_ref::<CloneError>() {
        error(clone_err.title(), &clone_err.to_string(), &clone_err.remediation());
        return;
    }
    if let Some(web_err) = err.downcast_ref::<WebError>() {
        error(web_err.title(), &web_err.to_string(), &web_err.remediation());
        return;
    }
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        message.push_str(&format!("\n{cause}"));
    }
    error("Error", &message, &[]);
}

pub fn path_style(path: &str) -> String {
    style(path).cyan().to_string()
}

pub fn cmd_style(cmd: &str) -> String {
    style(cmd).magenta().bold().to_string()
}

pub fn dry_run(report: &DryRunReport) {
    table("Dry run: nothing will be cloned", &[
        ("remote", report.remote.clone()),
        ("provider", report.provider.to_string()),
        ("host", report.hostname.clone()),
        ("repo-name", report.repo_name.clone()),
        ("ssh-url", report.ssh_url.clone()),
        ("http-url", report.https_url.clone()),
        ("create-dir", report.create_dir.to_string()),
        ("scm-home", display_path(&report.scm_home)),
        ("clone-path", display_path(&report.clone_path)),
    ]);
}

pub fn web_info(repo: &WebRepo, branch: &str) {
    table("Dry run: repository web info", &[
        ("provider", repo.provider.to_string()),
        ("host", repo.hostname.clone()),
        ("remote", repo.remote_url.clone()),
        ("web-url", repo.home_url.clone()),
        ("repo-path", repo.repo_path.clone()),
        ("repo-name", repo.repo_name.clone()),
        ("branch", branch.to_string()),
    ]);
}

/// Heading plus an aligned key/value table.
fn table(heading: &str, rows: &[(&str, String)]) {
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 1;
    println!();
    info(heading);
    println!();
    for (key, value) in rows {
        let label = format!("{key}:");
        println!("   {} {value}", style(format!("{label:<width$}")).dim());
    }
    println!();
}
