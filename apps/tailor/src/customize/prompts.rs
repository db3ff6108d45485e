//! Prompt constants for section rewrites.
//!
//! Templates carry `{slot}` markers; callers fill them with `.replace`
//! before sending. Output-format rules here pair with the structural
//! checks in [`super::rules`]: the prompt asks for the shape the
//! validator accepts.

use crate::models::resume::SkillGroup;

/// System prompt for summary rewrites — plain text only.
pub const SUMMARY_SYSTEM: &str =
    "You are an expert resume writer tailoring a candidate's summary to a \
    specific job posting. \
    Use ONLY facts from the candidate background provided. \
    Do NOT invent employers, titles, skills, or accomplishments. \
    Respond with the rewritten summary as plain text only. \
    Do NOT include preamble, quotes, or markdown code fences.";

/// Summary rewrite template. Replace `{document_context}`, `{job_context}`
/// and `{summary}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Rewrite the professional summary below so it speaks directly to the target job.

CANDIDATE BACKGROUND (source of truth — ONLY use facts from this):
{document_context}

TARGET JOB:
{job_context}

CURRENT SUMMARY:
{summary}

HARD RULES:
1. Keep roughly the length of the current summary
2. Use ONLY facts present in the candidate background — no invention
3. Return the rewritten summary text and nothing else"#;

/// System prompt for highlight rewrites — bullet list output only.
pub const HIGHLIGHTS_SYSTEM: &str =
    "You are an expert resume writer rephrasing experience bullet points to \
    emphasize relevance to a specific job posting. \
    Every bullet must stay truthful to the original content. \
    Do NOT invent tools, metrics, or outcomes. \
    Respond with a bullet list ONLY: one bullet per line, each line starting \
    with \"- \". \
    Do NOT include any text outside the list.";

/// Highlight rewrite template. Replace `{company}`, `{job_context}`,
/// `{count}` and `{highlights}` before sending.
pub const HIGHLIGHTS_PROMPT_TEMPLATE: &str = r#"Rephrase the experience bullets below for the role at {company} so they emphasize what the target job cares about.

TARGET JOB:
{job_context}

ORIGINAL BULLETS ({count} of them):
{highlights}

HARD RULES:
1. Return close to {count} bullets — merge or split only when it sharpens relevance
2. Each line starts with "- " and contains exactly one bullet
3. Rephrase and reorder freely, but never add facts that are not in the originals
4. Return the bullet list and nothing else"#;

/// System prompt for skills reordering — reorder only, never edit.
pub const SKILLS_SYSTEM: &str =
    "You are ranking a candidate's existing skills by relevance to a job \
    posting. \
    You may ONLY reorder skills within their categories. \
    Do NOT add, remove, rename, or merge any skill or category. \
    Respond with every category exactly once: a \"Category:\" header line \
    followed by one \"- skill\" line per skill. \
    Do NOT include any text outside the list.";

/// Skills reordering template. Replace `{job_context}` and `{skills}`
/// before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Reorder the skills below so the most relevant to the target job come first in each category.

TARGET JOB:
{job_context}

CURRENT SKILLS:
{skills}

HARD RULES:
1. Keep every category and every skill, spelled exactly as given
2. Only the order within each category may change
3. Format: "Category:" header, then "- skill" lines, for every category
4. Return the list and nothing else"#;

/// Renders bullets in the `- ` line form the prompts and parsers share.
pub fn format_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders skill groups as `Category:` headers with `- ` items.
pub fn format_skill_groups(groups: &[SkillGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&group.category);
        out.push_str(":\n");
        for skill in &group.skills {
            out.push_str("- ");
            out.push_str(skill);
            out.push('\n');
        }
    }
    out
}
