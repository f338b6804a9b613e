use anyhow::{Context, Result};
use clap::Parser;
use std::env;

mod actionsmap;
mod cli;
mod config;
mod output;
mod render;
mod util;

use config::GeneratorConfig;
use util::display_path;

fn main() -> Result<()> {
    init_tracing();
    let args = cli::RootArgs::parse();
    let config = GeneratorConfig::from_args(&args)?;
    run(&config)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load, filter, render and write: one pass, no partial output on load errors.
fn run(config: &GeneratorConfig) -> Result<()> {
    tracing::info!(path = %config.actionsmap_path.display(), "loading actions map");
    let actions_map = actionsmap::load_actions_map(&config.actionsmap_path)?;
    if actions_map.is_empty() {
        tracing::warn!("actions map declares no public categories");
    }

    let rendered = render::render_man_page(&actions_map, &config.render_date);
    let summary = &rendered.summary;
    tracing::info!(
        categories = summary.categories,
        actions = summary.actions,
        arguments = summary.arguments,
        month = %config.render_date.month,
        year = config.render_date.year,
        "rendered man page"
    );
    tracing::debug!(
        summary = %serde_json::to_string(summary).context("serialize render summary")?,
        "render summary"
    );
    if summary.arguments_without_help > 0 {
        tracing::debug!(
            count = summary.arguments_without_help,
            "arguments without help text"
        );
    }

    let written = output::write_man_page(&config.output, &rendered.man_page, config.gzip)?;
    let cwd = env::current_dir().ok();
    tracing::info!(
        path = %display_path(&written, cwd.as_deref()),
        gzip = config.gzip,
        "wrote man page"
    );
    Ok(())
}
