mod compiler;
mod config;
mod customize;
mod errors;
mod llm_client;
mod loader;
mod models;
mod pipeline;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionClient, OpenAiClient};

#[derive(Parser, Debug)]
#[command(
    name = "tailor",
    version,
    about = "Generates a typeset resume PDF from a YAML document, optionally customized against a job posting"
)]
struct Cli {
    /// Path to the resume document
    #[arg(short, long, default_value = "data/resume.yaml")]
    data: PathBuf,

    /// Path to a job posting text file; enables AI customization when an
    /// API key is configured
    #[arg(short, long)]
    job_file: Option<PathBuf>,

    /// Template to use: a path, or a name looked up in the template
    /// directory
    #[arg(short, long)]
    template: Option<String>,

    /// Override the configured output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Keep the rendered LaTeX source next to the PDF
    #[arg(long)]
    keep_tex: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first, then apply CLI overrides
    let mut config = Config::from_env()?;
    if let Some(template) = &cli.template {
        let template_dir = config
            .template_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("templates"));
        config.template_path = render::resolve_template(&template_dir, template)?;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if cli.keep_tex {
        config.keep_tex = true;
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    let job_text = match &cli.job_file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("cannot read job posting {}", path.display()))?,
        ),
        None => None,
    };

    // A completion client exists only when an API key is configured
    let client = match config.openai_api_key.clone() {
        Some(api_key) => {
            let client = OpenAiClient::new(api_key, &config)?;
            info!(model = %config.openai_model, "completion client initialized");
            Some(client)
        }
        None => {
            if job_text.is_some() {
                info!("OPENAI_API_KEY is not set, generating without customization");
            }
            None
        }
    };
    let client_ref = client.as_ref().map(|c| c as &dyn CompletionClient);

    let output = match pipeline::generate(&config, &cli.data, job_text.as_deref(), client_ref).await
    {
        Ok(output) => output,
        Err(err) => {
            error!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    info!(
        state = ?output.customization.state,
        warnings = output.customization.warnings.len(),
        "resume generated"
    );
    println!("{}", output.artifact_path.display());

    Ok(())
}
