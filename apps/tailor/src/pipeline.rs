//! Generation pipeline: load, customize, render, compile.
//!
//! One call runs one document through every stage. Customization runs only
//! when both a posting and a completion client are on hand, and its
//! warnings are advisory; the fatal classes are validation, template and
//! compile errors, each surfaced as its own [`GenerateError`] variant.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compiler;
use crate::config::Config;
use crate::customize::{self, CustomizationReport};
use crate::errors::GenerateError;
use crate::llm_client::CompletionClient;
use crate::loader;
use crate::render::{self, TemplateError};

pub struct GenerateOutput {
    pub artifact_path: PathBuf,
    pub customization: CustomizationReport,
}

pub async fn generate(
    config: &Config,
    document_path: &Path,
    job_text: Option<&str>,
    client: Option<&dyn CompletionClient>,
) -> Result<GenerateOutput, GenerateError> {
    let resume = loader::load(document_path).await?;

    let job_text = job_text.map(str::trim).filter(|text| !text.is_empty());
    let (resume, customization) = match (job_text, client) {
        (Some(job), Some(client)) => customize::customize(&resume, job, client).await,
        (Some(_), None) => {
            debug!("no completion client configured, skipping customization");
            (resume, CustomizationReport::skipped())
        }
        (None, _) => {
            debug!("no job posting provided, skipping customization");
            (resume, CustomizationReport::skipped())
        }
    };

    let template = tokio::fs::read_to_string(&config.template_path)
        .await
        .map_err(|source| TemplateError::Unreadable {
            path: config.template_path.clone(),
            source,
        })?;
    let markup = render::render(&resume, &template)?;
    debug!(template = %config.template_path.display(), bytes = markup.len(), "rendered document");

    let artifact_path = compiler::compile(&markup, config).await?;
    info!(
        artifact = %artifact_path.display(),
        customization = ?customization.state,
        "generation finished"
    );

    Ok(GenerateOutput {
        artifact_path,
        customization,
    })
}
