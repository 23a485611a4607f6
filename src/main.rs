use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use tracing::Level;

use git_versioning::config::{self, Config};
use git_versioning::domain::{Channel, RefSnapshot, RefSnapshotBuilder, RefType};
use git_versioning::git::{capture_snapshot, Git2Repository};
use git_versioning::rules::RuleSet;
use git_versioning::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-versioning",
    version,
    about = "Derive a build version from the checked-out git ref"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Repository to inspect")]
    path: String,

    #[arg(long, help = "Read the ref snapshot from a TOML file instead of git")]
    snapshot: Option<String>,

    #[arg(long, help = "Ref type for a snapshot given on the command line (tag, branch, commit)")]
    ref_type: Option<RefType>,

    #[arg(long, requires = "ref_type", help = "Tag or branch name")]
    ref_name: Option<String>,

    #[arg(long, requires = "ref_type", help = "Full commit hash")]
    commit: Option<String>,

    #[arg(long, requires = "ref_type", help = "Nearest ancestor tag")]
    describe_tag: Option<String>,

    #[arg(
        long,
        default_value_t = 0,
        requires = "ref_type",
        help = "Commits since the describe tag"
    )]
    distance: u64,

    #[arg(long, requires = "ref_type", help = "Working tree has uncommitted changes")]
    dirty: bool,

    #[arg(long, help = "Print the captured snapshot to stderr")]
    show_snapshot: bool,

    #[arg(long, help = "Also print the publishing channel (release or snapshot)")]
    channel: bool,

    #[arg(long, help = "Fail unless the version is a valid semantic version")]
    require_semver: bool,

    #[arg(long, help = "Validate the configuration and exit")]
    check: bool,

    #[arg(long, help = "Show configured rules in evaluation order and exit")]
    list_rules: bool,

    #[arg(short, long, help = "Log rule evaluation to stderr")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let rules = config.rule_set()?;

    if args.list_rules {
        ui::display_rules(&rules);
        return Ok(());
    }

    if args.check {
        config.describe_options()?;
        ui::display_success(&format!("Configuration valid: {} rules", rules.len()));
        return Ok(());
    }

    let snapshot = load_snapshot(&args, &config, &rules)?;
    if args.show_snapshot {
        ui::display_snapshot(&snapshot);
    }

    let version = config.resolver()?.resolve(&snapshot)?;

    if args.require_semver {
        if let Err(e) = version.to_semver() {
            bail!("Version '{}' is not a semantic version: {}", version, e);
        }
    }

    ui::display_version(version.as_str());
    if args.channel {
        ui::display_version(&Channel::for_snapshot(&snapshot).to_string());
    }

    Ok(())
}

/// Snapshot from command-line flags, a snapshot file, or the repository
fn load_snapshot(args: &Args, config: &Config, rules: &RuleSet) -> Result<RefSnapshot> {
    if let Some(ref_type) = args.ref_type {
        let Some(commit) = args.commit.as_deref() else {
            bail!("--commit is required when --ref-type is given");
        };
        let mut builder = RefSnapshot::builder(ref_type, commit)
            .distance(args.distance)
            .dirty(args.dirty);
        if let Some(name) = &args.ref_name {
            builder = builder.ref_name(name);
        }
        if let Some(tag) = &args.describe_tag {
            builder = builder.describe_tag(tag);
        }
        return Ok(builder.build()?);
    }

    if let Some(path) = &args.snapshot {
        let content =
            fs::read_to_string(path).with_context(|| format!("Cannot read snapshot '{}'", path))?;
        let builder: RefSnapshotBuilder =
            toml::from_str(&content).with_context(|| format!("Invalid snapshot '{}'", path))?;
        return Ok(builder.build()?);
    }

    let repo = Git2Repository::open(&args.path)
        .with_context(|| format!("Git repository error at '{}'", args.path))?;
    Ok(capture_snapshot(&repo, &config.describe_options()?, rules)?)
}
