//! Terminal output for the command-line tool.
//!
//! The resolved version is the only thing written to stdout; every other
//! message goes to stderr so the output can be captured by build scripts.

use crate::domain::RefSnapshot;
use crate::rules::RuleSet;
use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Print the version itself, unstyled, on stdout
pub fn display_version(version: &str) {
    println!("{}", version);
}

/// Describe the snapshot the version was computed from
pub fn format_snapshot(snapshot: &RefSnapshot) -> String {
    let ref_name = if snapshot.ref_name().is_empty() {
        "-"
    } else {
        snapshot.ref_name()
    };
    format!(
        "{} {} @ {} (describe: {} +{}{})",
        snapshot.ref_type(),
        ref_name,
        snapshot.commit_hash_short(),
        snapshot.describe_tag().unwrap_or("none"),
        snapshot.distance(),
        if snapshot.is_dirty() { ", dirty" } else { "" }
    )
}

pub fn display_snapshot(snapshot: &RefSnapshot) {
    eprintln!("{} {}", style("Snapshot:").bold(), format_snapshot(snapshot));
}

/// List the rules in evaluation order
pub fn display_rules(rules: &RuleSet) {
    eprintln!("{}", style("Version rules:").bold());
    for (i, rule) in rules.rules().iter().enumerate() {
        eprintln!("  {}. {}", i + 1, rule);
    }
}
