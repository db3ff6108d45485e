use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub basic: BasicInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub research: Vec<Research>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    #[serde(default)]
    pub address: Vec<String>,
    pub contact: ContactInfo,
    #[serde(default)]
    pub websites: Vec<WebsiteLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteLink {
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub titles: Vec<TitlePeriod>,
    /// Active highlight list, the one that renders.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Immutable baseline the customization engine reads from and fallback
    /// restores. Sourced from the document's `unedited` key when present,
    /// otherwise seeded from `highlights` at load time.
    #[serde(default, rename = "unedited")]
    pub original_highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitlePeriod {
    pub name: String,
    pub startdate: String,
    pub enddate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degrees: Vec<Degree>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub names: Vec<String>,
    pub startdate: String,
    pub enddate: String,
    #[serde(default)]
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Research {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<String>,
}

impl Experience {
    /// Most recent title period. Entries list titles oldest first.
    pub fn latest_title(&self) -> Option<&TitlePeriod> {
        self.titles.last()
    }
}

impl Resume {
    /// Semantic checks that hold beyond raw shape. Returns every violation
    /// with a positional label so callers can report them all at once.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.basic.name.trim().is_empty() {
            issues.push("basic.name: name is required".to_string());
        }
        if self.basic.contact.email.trim().is_empty() {
            issues.push("basic.contact.email: email is required".to_string());
        }

        for (i, exp) in self.experiences.iter().enumerate() {
            if exp.company.trim().is_empty() {
                issues.push(format!("experiences[{i}]: company name is required"));
            }
            if exp.titles.is_empty() {
                issues.push(format!("experiences[{i}]: at least one title is required"));
            }
            for (j, title) in exp.titles.iter().enumerate() {
                if title.name.trim().is_empty() {
                    issues.push(format!("experiences[{i}].titles[{j}]: title name is required"));
                }
            }
        }

        for (i, edu) in self.education.iter().enumerate() {
            if edu.school.trim().is_empty() {
                issues.push(format!("education[{i}]: school name is required"));
            }
            if edu.degrees.is_empty() {
                issues.push(format!("education[{i}]: at least one degree is required"));
            }
        }

        for (i, group) in self.skills.iter().enumerate() {
            if group.category.trim().is_empty() {
                issues.push(format!("skills[{i}]: category label is required"));
            }
            if group.skills.is_empty() {
                issues.push(format!("skills[{i}]: at least one skill is required"));
            }
        }

        issues
    }
}
