use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

mod annotate;
mod cache;
mod catalog;
mod cli;
mod config;
mod extract;
mod patterns;
#[cfg(test)]
mod tests;
mod web;

use annotate::{Annotator, RemoteAnnotator};
use catalog::SkillCatalog;
use config::Config;
use extract::{ExtractionPipeline, ExtractionService};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();
    let config = Config::load_with(&args.config)?;

    match args.command {
        cli::Command::Daemon {} => {
            let service = Arc::new(build_service(&config)?);
            web::start_daemon(&config, service);
            Ok(())
        }

        cli::Command::Extract { description } => {
            let description = match description {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read description from stdin")?;
                    buffer
                }
            };

            let service = build_service(&config)?;
            let skills = service.extract(&description)?;
            println!("{}", serde_json::to_string_pretty(&skills)?);
            Ok(())
        }
    }
}

/// Builds the shared extraction service: annotator connection, catalog,
/// compiled patterns, cache. Any failure here aborts the process before it
/// serves a single request.
fn build_service(config: &Config) -> anyhow::Result<ExtractionService> {
    let annotator = RemoteAnnotator::connect(
        &config.annotator.url,
        Duration::from_secs(config.annotator.timeout_secs),
    )
    .with_context(|| format!("annotator at {} is unavailable", config.annotator.url))?;
    let annotator: Arc<dyn Annotator> = Arc::new(annotator);

    let catalog = SkillCatalog::load(Path::new(&config.catalog_path), annotator.as_ref())
        .with_context(|| format!("failed to load skill catalog from {}", config.catalog_path))?;
    log::info!("loaded {} skills from {}", catalog.len(), config.catalog_path);

    let pipeline = ExtractionPipeline::new(annotator, Arc::new(catalog));
    Ok(ExtractionService::new(pipeline, config.cache_capacity))
}
