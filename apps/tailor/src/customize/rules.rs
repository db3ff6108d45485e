//! Structural validation of rewritten sections.
//!
//! Every rewrite must pass these checks before it replaces document content;
//! a failed check keeps the original text and surfaces as a warning. Bounds
//! are deliberately coarse. They catch runaway generation and dropped
//! content, not style.

use crate::llm_client::strip_code_fences;
use crate::models::resume::SkillGroup;

/// Rewritten bullet count must stay within this ratio band of the original.
pub const HIGHLIGHT_MIN_RATIO: f64 = 0.5;
pub const HIGHLIGHT_MAX_RATIO: f64 = 2.0;

/// A rewritten summary may grow to this multiple of the original length,
/// with a floor so one-line originals still leave room to write.
pub const SUMMARY_MAX_MULTIPLE: usize = 3;
pub const SUMMARY_FLOOR_CHARS: usize = 240;

pub fn validate_summary(original: &str, response: &str) -> Result<String, String> {
    let cleaned = strip_code_fences(response).trim();
    if cleaned.is_empty() {
        return Err("rewritten summary is empty".to_string());
    }
    let limit = (original.chars().count() * SUMMARY_MAX_MULTIPLE).max(SUMMARY_FLOOR_CHARS);
    let length = cleaned.chars().count();
    if length > limit {
        return Err(format!(
            "rewritten summary is {length} characters, limit is {limit}"
        ));
    }
    Ok(cleaned.to_string())
}

pub fn validate_highlights(original_count: usize, response: &str) -> Result<Vec<String>, String> {
    let bullets = parse_bullets(response);
    if bullets.is_empty() {
        return Err("response is not parseable as a bullet list".to_string());
    }
    if original_count > 0 {
        let ratio = bullets.len() as f64 / original_count as f64;
        if !(HIGHLIGHT_MIN_RATIO..=HIGHLIGHT_MAX_RATIO).contains(&ratio) {
            return Err(format!(
                "rewrite has {} bullets for an original of {}, outside the {HIGHLIGHT_MIN_RATIO}x to {HIGHLIGHT_MAX_RATIO}x band",
                bullets.len(),
                original_count
            ));
        }
    }
    Ok(bullets)
}

/// Accepts a rewrite only when it is a per-category permutation of the
/// original: same categories, same skills, order free. Output preserves the
/// original category order and casing.
pub fn validate_skills(
    original: &[SkillGroup],
    response: &str,
) -> Result<Vec<SkillGroup>, String> {
    let groups = parse_skill_groups(response);
    if groups.is_empty() {
        return Err("response has no recognizable skill groups".to_string());
    }
    if groups.len() != original.len() {
        return Err(format!(
            "expected {} skill groups, found {}",
            original.len(),
            groups.len()
        ));
    }

    let mut result = Vec::with_capacity(original.len());
    for group in original {
        let Some(rewritten) = groups
            .iter()
            .find(|g| g.category.eq_ignore_ascii_case(&group.category))
        else {
            return Err(format!("category `{}` is missing from the rewrite", group.category));
        };
        let mut expected: Vec<&str> = group.skills.iter().map(String::as_str).collect();
        let mut found: Vec<&str> = rewritten.skills.iter().map(String::as_str).collect();
        expected.sort_unstable();
        found.sort_unstable();
        if expected != found {
            return Err(format!(
                "category `{}` is not a permutation of the original skills",
                group.category
            ));
        }
        result.push(SkillGroup {
            category: group.category.clone(),
            skills: rewritten.skills.clone(),
        });
    }
    Ok(result)
}

/// Collects `- `, `* ` and `• ` prefixed lines; everything else (preambles,
/// blank lines) is ignored.
pub fn parse_bullets(response: &str) -> Vec<String> {
    strip_code_fences(response)
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            for prefix in ["- ", "* ", "• "] {
                if let Some(rest) = trimmed.strip_prefix(prefix) {
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        return Some(rest.to_string());
                    }
                }
            }
            None
        })
        .collect()
}

/// Parses `Category:` headers followed by bullet items, plus the inline
/// `Category: a, b, c` form. Items before any header are dropped.
pub fn parse_skill_groups(response: &str) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for line in strip_code_fences(response).lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(item) = bullet_item(trimmed) {
            if let Some(group) = groups.last_mut() {
                group.skills.push(item.to_string());
            }
            continue;
        }
        if let Some((head, tail)) = trimmed.split_once(':') {
            let category = head.trim();
            if category.is_empty() {
                continue;
            }
            let skills: Vec<String> = tail
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            groups.push(SkillGroup {
                category: category.to_string(),
                skills,
            });
        }
    }
    groups
}

fn bullet_item(line: &str) -> Option<&str> {
    for prefix in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }
    None
}
