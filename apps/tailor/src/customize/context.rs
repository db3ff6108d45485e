//! Compact text summaries of the document and the posting, used to ground
//! rewrite prompts in facts the model is allowed to use.

use crate::models::job::{JobRequirements, Seniority};
use crate::models::resume::Resume;

const MAX_CONTEXT_KEYWORDS: usize = 8;

pub fn document_context(resume: &Resume) -> String {
    let mut lines = vec![format!("Name: {}", resume.basic.name)];

    for exp in &resume.experiences {
        let title = exp
            .latest_title()
            .map(|t| t.name.as_str())
            .unwrap_or("Unknown title");
        lines.push(format!(
            "Experience: {} at {} ({} highlights)",
            title,
            exp.company,
            exp.highlights.len()
        ));
    }

    for group in &resume.skills {
        lines.push(format!("Skills / {}: {}", group.category, group.skills.join(", ")));
    }

    for edu in &resume.education {
        let degrees: Vec<&str> = edu
            .degrees
            .iter()
            .flat_map(|d| d.names.iter())
            .map(String::as_str)
            .collect();
        lines.push(format!("Education: {} at {}", degrees.join(", "), edu.school));
    }

    lines.join("\n")
}

pub fn job_context(requirements: &JobRequirements) -> String {
    if requirements.is_empty() && requirements.seniority == Seniority::Unknown {
        return "No structured requirements could be extracted from the posting.".to_string();
    }

    let mut lines = Vec::new();
    if requirements.seniority != Seniority::Unknown {
        lines.push(format!("Seniority signal: {}", requirements.seniority.as_str()));
    }
    if !requirements.responsibilities.is_empty() {
        lines.push("Responsibilities:".to_string());
        for item in &requirements.responsibilities {
            lines.push(format!("- {item}"));
        }
    }
    if !requirements.required_skills.is_empty() {
        lines.push("Required skills:".to_string());
        for item in &requirements.required_skills {
            lines.push(format!("- {item}"));
        }
    }
    if !requirements.keywords.is_empty() {
        let top: Vec<&str> = requirements
            .keywords
            .iter()
            .take(MAX_CONTEXT_KEYWORDS)
            .map(|k| k.keyword.as_str())
            .collect();
        lines.push(format!("Notable keywords: {}", top.join(", ")));
    }
    lines.join("\n")
}
