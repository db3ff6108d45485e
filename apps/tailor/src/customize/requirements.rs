//! Job requirements extraction.
//!
//! Purely heuristic: a section-header driven line scan plus a
//! stopword-filtered keyword inventory. Extraction never fails a request;
//! when a posting has no recognizable structure it degrades to the keyword
//! inventory as the requirement set.

use std::collections::HashMap;

use tracing::debug;

use crate::models::job::{JobRequirements, KeywordEntry, Seniority};

const MAX_KEYWORDS: usize = 12;
const COARSE_REQUIREMENTS: usize = 8;
const MAX_HEADER_LEN: usize = 64;

const REQUIREMENT_HEADERS: [&str; 6] = [
    "requirements",
    "qualifications",
    "must have",
    "what you'll need",
    "what you will need",
    "who you are",
];

const RESPONSIBILITY_HEADERS: [&str; 6] = [
    "responsibilities",
    "what you'll do",
    "what you will do",
    "duties",
    "about the role",
    "day to day",
];

const STOPWORDS: [&str; 52] = [
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "our", "that", "the", "their", "they", "this", "to", "we",
    "will", "with", "you", "your", "who", "what", "when", "where", "how", "all", "any", "able",
    "years", "experience", "work", "working", "strong", "plus", "etc", "role", "job", "company",
    "candidate", "ideal", "team",
];

#[derive(Clone, Copy, PartialEq)]
enum Bucket {
    None,
    Requirements,
    Responsibilities,
}

/// Extracts a requirement summary from raw posting text.
pub fn extract(job_text: &str) -> JobRequirements {
    let mut responsibilities = Vec::new();
    let mut required_skills = Vec::new();
    let mut bucket = Bucket::None;

    for line in job_text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(next) = header_bucket(trimmed) {
            bucket = next;
            continue;
        }
        if let Some(item) = bullet_text(trimmed) {
            match bucket {
                Bucket::Requirements => required_skills.push(item.to_string()),
                Bucket::Responsibilities => responsibilities.push(item.to_string()),
                Bucket::None => {}
            }
        }
    }

    let keywords = keyword_inventory(job_text);
    let seniority = detect_seniority(job_text);

    if responsibilities.is_empty() && required_skills.is_empty() {
        debug!("no structured requirement sections found, degrading to keyword inventory");
        required_skills = keywords
            .iter()
            .take(COARSE_REQUIREMENTS)
            .map(|k| k.keyword.clone())
            .collect();
    }

    JobRequirements {
        responsibilities,
        required_skills,
        seniority,
        keywords,
    }
}

fn header_bucket(line: &str) -> Option<Bucket> {
    if bullet_text(line).is_some() || line.len() > MAX_HEADER_LEN {
        return None;
    }
    let lower = line.to_lowercase();
    if REQUIREMENT_HEADERS.iter().any(|h| lower.contains(h)) {
        return Some(Bucket::Requirements);
    }
    if RESPONSIBILITY_HEADERS.iter().any(|h| lower.contains(h)) {
        return Some(Bucket::Responsibilities);
    }
    None
}

fn bullet_text(line: &str) -> Option<&str> {
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

fn detect_seniority(text: &str) -> Seniority {
    let lower = text.to_lowercase();
    if lower.contains("principal") || lower.contains("staff") {
        Seniority::Staff
    } else if lower.contains("senior") || lower.contains("sr.") {
        Seniority::Senior
    } else if lower.contains("junior")
        || lower.contains("entry-level")
        || lower.contains("entry level")
        || lower.contains("intern")
    {
        Seniority::Junior
    } else if lower.contains("mid-level") || lower.contains("mid level") {
        Seniority::Mid
    } else {
        Seniority::Unknown
    }
}

/// Frequency-ranked token inventory. Counting is case-insensitive; the first
/// seen casing is the one reported. Ties break by first occurrence.
fn keyword_inventory(text: &str) -> Vec<KeywordEntry> {
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for raw in text.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
        if token.chars().count() < 2 || token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let lower = token.to_lowercase();
        if STOPWORDS.contains(&lower.as_str()) {
            continue;
        }
        match index.get(&lower) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(lower, order.len());
                order.push((token.to_string(), 1));
            }
        }
    }

    let mut ranked: Vec<(usize, String, u32)> = order
        .into_iter()
        .enumerate()
        .map(|(i, (token, count))| (i, token, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(_, keyword, frequency)| KeywordEntry { keyword, frequency })
        .collect()
}
