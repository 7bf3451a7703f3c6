use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command},
    config::{HarvestConfig, ProjectConfig},
};

mod catalogue;
mod cli;
mod config;
mod error;
mod harvest;
mod project;
mod record;
mod schema;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "metacat=info",
        1 => "metacat=debug",
        _ => "metacat=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Harvest {
            community,
            output,
            max_pages,
            page_size,
            delay_ms,
        } => {
            let config = HarvestConfig {
                page_size,
                request_delay: Duration::from_millis(delay_ms),
                ..HarvestConfig::default()
            };
            let summary = harvest::run(&config, &community, max_pages, &output, progress_bar())?;
            eprintln!(
                "{} {} records: {} from exports  {} {} stubbed  {} {} from feed",
                "✓".green(),
                summary.total(),
                summary.exported,
                "✗".yellow(),
                summary.stubbed,
                "+".cyan(),
                summary.feed
            );
        }
        Command::Project {
            input,
            out_dir,
            base_url,
            sitemap,
        } => {
            let config = ProjectConfig {
                input,
                out_dir,
                base_url,
                sitemap,
            };
            let summary = project::run(&config)?;
            eprintln!(
                "{} {} written  {} {} in sitemap",
                "✓".green(),
                summary.written,
                "↳".cyan(),
                summary.sitemap_entries.unwrap_or_default()
            );
        }
    }
    Ok(())
}
