mod render;
mod search;
mod session;

use clap::{Parser, Subcommand};
use pricematch_core::SourcesFile;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricematch")]
#[command(about = "Compare a product record against retailer listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every configured source once and print the candidates
    Search {
        /// Product name to search for
        term: String,
    },
    /// Curate one record interactively against the configured sources
    Session(session::SessionArgs),
    /// List the configured sources
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = pricematch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let sources = pricematch_core::load_sources_or_builtin(&config.sources_path)?;
    tracing::debug!(
        env = %config.env,
        base_url = %config.base_url,
        sources = sources.sources.len(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Search { term } => search::run(&config, &sources, &term).await?,
        Commands::Session(args) => session::run(&config, &sources, args).await?,
        Commands::Sources => print!("{}", format_sources(&sources)),
    }

    Ok(())
}

fn format_sources(sources: &SourcesFile) -> String {
    let mut out = String::new();
    for source in &sources.sources {
        out.push_str(&format!(
            "{:<10} {:<12} {:<9} search={} detail={} ({})\n",
            source.name,
            source.label,
            source.kind,
            source.search_path,
            source.detail_path,
            source.detail_field()
        ));
    }
    out
}

#[cfg(test)]
mod tests;
