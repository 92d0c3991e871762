//! sourcetome — formats a source tree into a fixed-length DOCX listing.

mod collect;
mod config;
mod errors;
mod expand;
mod layout;
mod pipeline;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ExpansionMethod};
use crate::expand::{CodeGenerator, LlmGenerator};
use crate::pipeline::Collator;

/// Formats a directory of source code into a page-count-targeted DOCX document.
#[derive(Parser, Debug)]
#[command(name = "sourcetome")]
#[command(version)]
#[command(about = "Collates source code into a page-count-targeted DOCX document")]
struct Args {
    /// Directory containing the source code to collate.
    source_dir: PathBuf,

    /// Software name placed in the document header and artifact name.
    software_name: String,

    /// Version string placed in the document header and artifact name.
    version: String,

    /// Output directory for the generated document.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Path to a TOML configuration file.
    /// Falls back to $SOURCETOME_CONFIG, then ./sourcetome.toml, then defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok(); // load .env if present; ignore if missing

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={default_level}", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sourcetome v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(args.config.as_deref())?;
    let generator = build_generator(&config)?;

    let collator = Collator::new(
        &config,
        args.source_dir,
        args.software_name,
        args.version,
        args.output,
    )?;

    let artifact = collator
        .run(generator.as_ref().map(|g| g as &dyn CodeGenerator))
        .await?;

    println!("Document generated: {}", artifact.display());
    Ok(())
}

/// Builds the generative collaborator, if the configuration asks for one.
/// A missing API key downgrades to the deterministic expansion path.
fn build_generator(config: &Config) -> Result<Option<LlmGenerator>> {
    let expansion = &config.expansion;
    if !expansion.enabled || expansion.method != ExpansionMethod::Llm {
        return Ok(None);
    }

    match std::env::var("SOURCETOME_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            info!("LLM generator initialized (model: {})", expansion.model);
            Ok(Some(LlmGenerator::new(api_key, expansion)?))
        }
        _ => {
            warn!("SOURCETOME_API_KEY not set; falling back to non-LLM expansion.");
            Ok(None)
        }
    }
}
