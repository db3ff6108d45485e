//! AI customization engine.
//!
//! Rewrites three section kinds against a job posting: the summary, each
//! experience's highlight bullets, and the ordering of skills. Every rewrite
//! is validated structurally before it replaces document content; a rewrite
//! that fails validation, or a completion call that fails outright, falls
//! back to the original text for that section and surfaces a warning. The
//! engine never fails a generation request and never touches its input.

pub mod context;
pub mod prompts;
pub mod requirements;
pub mod rules;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::llm_client::{CompletionClient, TransportError};
use crate::models::resume::{Experience, Resume, SkillGroup};

/// Terminal state of one customization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationState {
    /// No pass ran: no posting, no client, or nothing to rewrite.
    Skipped,
    /// At least one section rewrite was accepted.
    Applied,
    /// Every attempted section kept its original text.
    FallenBack,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomizationWarning {
    pub section: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomizationReport {
    pub state: CustomizationState,
    pub warnings: Vec<CustomizationWarning>,
    pub sections_attempted: usize,
    pub sections_applied: usize,
}

impl CustomizationReport {
    pub fn skipped() -> Self {
        Self {
            state: CustomizationState::Skipped,
            warnings: Vec::new(),
            sections_attempted: 0,
            sections_applied: 0,
        }
    }
}

/// Per-section outcome. Keeping the original is an ordinary branch here,
/// not an error path.
enum SectionRewrite<T> {
    Rewritten(T),
    Original { reason: String },
}

/// Runs one customization pass and returns the customized copy with its
/// report. Sections are attempted in document order; each failure is
/// contained to its own section.
pub async fn customize(
    resume: &Resume,
    job_text: &str,
    client: &dyn CompletionClient,
) -> (Resume, CustomizationReport) {
    let requirements = requirements::extract(job_text);
    debug!(
        responsibilities = requirements.responsibilities.len(),
        required = requirements.required_skills.len(),
        keywords = requirements.keywords.len(),
        seniority = requirements.seniority.as_str(),
        "extracted job requirements"
    );
    let job_context = context::job_context(&requirements);
    let document_context = context::document_context(resume);

    let mut customized = resume.clone();
    let mut warnings = Vec::new();
    let mut attempted = 0usize;
    let mut applied = 0usize;

    if let Some(original) = resume
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        attempted += 1;
        match rewrite_summary(original, &document_context, &job_context, client).await {
            SectionRewrite::Rewritten(text) => {
                customized.summary = Some(text);
                applied += 1;
            }
            SectionRewrite::Original { reason } => warnings.push(CustomizationWarning {
                section: "summary".to_string(),
                reason,
            }),
        }
    }

    for (i, exp) in resume.experiences.iter().enumerate() {
        if exp.original_highlights.is_empty() {
            continue;
        }
        attempted += 1;
        match rewrite_highlights(exp, &job_context, client).await {
            SectionRewrite::Rewritten(bullets) => {
                customized.experiences[i].highlights = bullets;
                applied += 1;
            }
            SectionRewrite::Original { reason } => {
                // Fallback pins the active list back to the baseline, even if
                // the incoming document carried prior edits.
                customized.experiences[i].highlights = exp.original_highlights.clone();
                warnings.push(CustomizationWarning {
                    section: format!("experiences[{i}].highlights"),
                    reason,
                });
            }
        }
    }

    if !resume.skills.is_empty() {
        attempted += 1;
        match rewrite_skills(&resume.skills, &job_context, client).await {
            SectionRewrite::Rewritten(groups) => {
                customized.skills = groups;
                applied += 1;
            }
            SectionRewrite::Original { reason } => warnings.push(CustomizationWarning {
                section: "skills".to_string(),
                reason,
            }),
        }
    }

    let state = if attempted == 0 {
        CustomizationState::Skipped
    } else if applied > 0 {
        CustomizationState::Applied
    } else {
        CustomizationState::FallenBack
    };

    for warning in &warnings {
        warn!(section = %warning.section, reason = %warning.reason, "section fell back to original text");
    }
    info!(
        state = ?state,
        sections_attempted = attempted,
        sections_applied = applied,
        "customization pass finished"
    );

    (
        customized,
        CustomizationReport {
            state,
            warnings,
            sections_attempted: attempted,
            sections_applied: applied,
        },
    )
}

async fn rewrite_summary(
    original: &str,
    document_context: &str,
    job_context: &str,
    client: &dyn CompletionClient,
) -> SectionRewrite<String> {
    let prompt = prompts::SUMMARY_PROMPT_TEMPLATE
        .replace("{document_context}", document_context)
        .replace("{job_context}", job_context)
        .replace("{summary}", original);

    let response = match client.complete(&prompt, prompts::SUMMARY_SYSTEM).await {
        Ok(completion) => completion.text,
        Err(err) => return SectionRewrite::Original { reason: transport_reason(&err) },
    };
    match rules::validate_summary(original, &response) {
        Ok(text) => SectionRewrite::Rewritten(text),
        Err(reason) => SectionRewrite::Original { reason },
    }
}

async fn rewrite_highlights(
    exp: &Experience,
    job_context: &str,
    client: &dyn CompletionClient,
) -> SectionRewrite<Vec<String>> {
    let prompt = prompts::HIGHLIGHTS_PROMPT_TEMPLATE
        .replace("{company}", &exp.company)
        .replace("{job_context}", job_context)
        .replace("{count}", &exp.original_highlights.len().to_string())
        .replace("{highlights}", &prompts::format_bullets(&exp.original_highlights));

    let response = match client.complete(&prompt, prompts::HIGHLIGHTS_SYSTEM).await {
        Ok(completion) => completion.text,
        Err(err) => return SectionRewrite::Original { reason: transport_reason(&err) },
    };
    match rules::validate_highlights(exp.original_highlights.len(), &response) {
        Ok(bullets) => SectionRewrite::Rewritten(bullets),
        Err(reason) => SectionRewrite::Original { reason },
    }
}

async fn rewrite_skills(
    skills: &[SkillGroup],
    job_context: &str,
    client: &dyn CompletionClient,
) -> SectionRewrite<Vec<SkillGroup>> {
    let prompt = prompts::SKILLS_PROMPT_TEMPLATE
        .replace("{job_context}", job_context)
        .replace("{skills}", &prompts::format_skill_groups(skills));

    let response = match client.complete(&prompt, prompts::SKILLS_SYSTEM).await {
        Ok(completion) => completion.text,
        Err(err) => return SectionRewrite::Original { reason: transport_reason(&err) },
    };
    match rules::validate_skills(skills, &response) {
        Ok(groups) => SectionRewrite::Rewritten(groups),
        Err(reason) => SectionRewrite::Original { reason },
    }
}

fn transport_reason(err: &TransportError) -> String {
    format!("completion call failed: {err}")
}
