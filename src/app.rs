use crate::cli::Cli;
use anyhow::Context;
use asp_embed::config::Settings;
use asp_embed::pipeline::process;
use asp_embed::source::HttpSource;
use clap::Parser;
use std::path::Path;

pub fn run() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn,asp_embed=info");
    env_logger::Builder::from_env(env).init();

    let Cli { input, path_prefix } = Cli::parse();

    let search_dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (settings, config_path) =
        Settings::discover(search_dir).context("Failed to load configuration")?;
    if let Some(path) = &config_path {
        log::debug!("Using configuration from {}", path.display());
    }

    let source = HttpSource::new(&settings.remote);
    let outcome = process(&input, &path_prefix, &settings, &source)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    let summary = outcome.summary;
    let unresolved = summary.missing + summary.malformed;
    if unresolved > 0 {
        log::warn!("{unresolved} placeholder(s) left unresolved");
    }
    log::info!(
        "Wrote {} with plotly.js {} and {} embedded chart(s)",
        outcome.output_path.display(),
        outcome.version,
        summary.replaced
    );

    Ok(())
}
