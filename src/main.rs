use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shadow_release::builder::ShellBuilder;
use shadow_release::cli::orchestration::ReleaseWorkflow;
use shadow_release::cli::parse_bump_kind;
use shadow_release::config::{load_config, load_credentials};
use shadow_release::forge::GiteaClient;
use shadow_release::git::Git2Repository;
use shadow_release::ui;
use shadow_release::version::Component;

#[derive(clap::Parser)]
#[command(
    name = "shadow-release",
    version,
    about = "Bump the version, build, package and publish a shadow release"
)]
struct Args {
    #[arg(
        value_name = "CHANGE_TYPE",
        value_parser = parse_bump_kind,
        help = "The version component to increase: major|minor|patch, or 0: major, 1: minor, 2: patch"
    )]
    change_type: Component,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = release(args.change_type) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn release(component: Component) -> Result<()> {
    let config = load_config(None).context("Failed to load release.toml")?;
    let credentials = load_credentials(None)?;

    let forge = GiteaClient::new(
        &credentials,
        Duration::from_secs(config.http_timeout_secs),
    )?
    .with_upload_timeout(config.upload_timeout_secs.map(Duration::from_secs));
    let git = Git2Repository::open(".", config.remote.clone())
        .context("Not in a git repository")?;
    let builder = ShellBuilder::new(config.build_command.clone());

    let workflow = ReleaseWorkflow {
        config: &config,
        git: &git,
        forge: &forge,
        builder: &builder,
        output_dir: Path::new("."),
    };
    let outcome = workflow.run(component)?;

    ui::display_release_summary(&outcome.version, outcome.release_id, &outcome.archive);
    Ok(())
}
