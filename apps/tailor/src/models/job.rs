use serde::{Deserialize, Serialize};

/// Normalized extraction from a job posting. Derived fresh per generation
/// request and owned by the customization engine; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
    pub seniority: Seniority,
    /// Frequency-ranked inventory, the coarse degraded form used when the
    /// posting has no recognizable requirement sections.
    pub keywords: Vec<KeywordEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Staff,
    #[default]
    Unknown,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid-level",
            Seniority::Senior => "senior",
            Seniority::Staff => "staff/principal",
            Seniority::Unknown => "unspecified",
        }
    }
}

impl JobRequirements {
    pub fn is_empty(&self) -> bool {
        self.responsibilities.is_empty()
            && self.required_skills.is_empty()
            && self.keywords.is_empty()
    }
}
