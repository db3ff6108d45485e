//! Document loading and schema validation.
//!
//! Loading is two-phase. The raw YAML is first parsed into a generic value
//! and walked against the declared schema, so a violation reports the
//! offending field path and the expected vs. actual shape instead of a raw
//! parser error. Only then is the value materialized into [`Resume`] and run
//! through the model's semantic checks. The loader also seeds each
//! experience's baseline highlight list when the document does not carry one
//! explicitly.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;
use tracing::info;

use crate::models::resume::Resume;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cannot read document {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document: {detail}")]
    Parse { detail: String },
    #[error("{path}: required field is missing (expected {expected})")]
    Missing { path: String, expected: &'static str },
    #[error("{path}: expected {expected}, found {found}")]
    Shape {
        path: String,
        expected: &'static str,
        found: String,
    },
    #[error("document failed validation:\n{}", issues.join("\n"))]
    Semantic { issues: Vec<String> },
}

/// Reads and validates the document at `path`.
pub async fn load(path: &Path) -> Result<Resume, ValidationError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ValidationError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let resume = load_str(&raw)?;
    info!(
        path = %path.display(),
        experiences = resume.experiences.len(),
        skill_groups = resume.skills.len(),
        "document loaded"
    );
    Ok(resume)
}

/// Parses, schema-checks, and materializes a document from raw YAML.
pub fn load_str(raw: &str) -> Result<Resume, ValidationError> {
    let value: Value = serde_yaml::from_str(raw).map_err(|e| ValidationError::Parse {
        detail: e.to_string(),
    })?;
    check_schema(&value)?;
    let mut resume: Resume =
        serde_yaml::from_value(value).map_err(|e| ValidationError::Parse {
            detail: e.to_string(),
        })?;

    let issues = resume.validate();
    if !issues.is_empty() {
        return Err(ValidationError::Semantic { issues });
    }

    seed_baselines(&mut resume);
    Ok(resume)
}

fn seed_baselines(resume: &mut Resume) {
    for exp in &mut resume.experiences {
        if exp.original_highlights.is_empty() {
            exp.original_highlights = exp.highlights.clone();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Declared schema
// ────────────────────────────────────────────────────────────────────────────

fn found(v: &Value) -> String {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
    .to_string()
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn require<'a>(
    parent: &'a Value,
    prefix: &str,
    key: &str,
    expected: &'static str,
) -> Result<&'a Value, ValidationError> {
    parent.get(key).ok_or_else(|| ValidationError::Missing {
        path: join_path(prefix, key),
        expected,
    })
}

fn expect_str<'a>(v: &'a Value, path: &str) -> Result<&'a str, ValidationError> {
    v.as_str().ok_or_else(|| ValidationError::Shape {
        path: path.to_string(),
        expected: "a string",
        found: found(v),
    })
}

fn expect_date(v: &Value, path: &str) -> Result<(), ValidationError> {
    if v.is_string() {
        Ok(())
    } else {
        Err(ValidationError::Shape {
            path: path.to_string(),
            expected: "a string (quote bare years, e.g. \"2020\")",
            found: found(v),
        })
    }
}

fn expect_seq<'a>(v: &'a Value, path: &str) -> Result<&'a Vec<Value>, ValidationError> {
    v.as_sequence().ok_or_else(|| ValidationError::Shape {
        path: path.to_string(),
        expected: "a sequence",
        found: found(v),
    })
}

fn expect_map(v: &Value, path: &str) -> Result<(), ValidationError> {
    if v.is_mapping() {
        Ok(())
    } else {
        Err(ValidationError::Shape {
            path: path.to_string(),
            expected: "a mapping",
            found: found(v),
        })
    }
}

fn expect_number(v: &Value, path: &str) -> Result<(), ValidationError> {
    if v.as_f64().is_some() {
        Ok(())
    } else {
        Err(ValidationError::Shape {
            path: path.to_string(),
            expected: "a number",
            found: found(v),
        })
    }
}

fn check_str_list(v: &Value, path: &str) -> Result<(), ValidationError> {
    for (i, item) in expect_seq(v, path)?.iter().enumerate() {
        expect_str(item, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

fn check_schema(root: &Value) -> Result<(), ValidationError> {
    expect_map(root, "(document)")?;

    let basic = require(root, "", "basic", "a mapping")?;
    check_basic(basic)?;

    if let Some(summary) = root.get("summary") {
        expect_str(summary, "summary")?;
    }
    if let Some(experiences) = root.get("experiences") {
        for (i, item) in expect_seq(experiences, "experiences")?.iter().enumerate() {
            check_experience(item, &format!("experiences[{i}]"))?;
        }
    }
    if let Some(education) = root.get("education") {
        for (i, item) in expect_seq(education, "education")?.iter().enumerate() {
            check_education(item, &format!("education[{i}]"))?;
        }
    }
    if let Some(projects) = root.get("projects") {
        for (i, item) in expect_seq(projects, "projects")?.iter().enumerate() {
            check_project(item, &format!("projects[{i}]"))?;
        }
    }
    if let Some(research) = root.get("research") {
        for (i, item) in expect_seq(research, "research")?.iter().enumerate() {
            check_research(item, &format!("research[{i}]"))?;
        }
    }
    if let Some(skills) = root.get("skills") {
        for (i, item) in expect_seq(skills, "skills")?.iter().enumerate() {
            check_skill_group(item, &format!("skills[{i}]"))?;
        }
    }
    Ok(())
}

fn check_basic(v: &Value) -> Result<(), ValidationError> {
    expect_map(v, "basic")?;
    expect_str(require(v, "basic", "name", "a string")?, "basic.name")?;
    if let Some(address) = v.get("address") {
        check_str_list(address, "basic.address")?;
    }

    let contact = require(v, "basic", "contact", "a mapping")?;
    expect_map(contact, "basic.contact")?;
    expect_str(
        require(contact, "basic.contact", "email", "a string")?,
        "basic.contact.email",
    )?;
    if let Some(phone) = contact.get("phone") {
        expect_str(phone, "basic.contact.phone")?;
    }

    if let Some(websites) = v.get("websites") {
        for (i, site) in expect_seq(websites, "basic.websites")?.iter().enumerate() {
            let p = format!("basic.websites[{i}]");
            expect_map(site, &p)?;
            expect_str(require(site, &p, "text", "a string")?, &format!("{p}.text"))?;
            expect_str(require(site, &p, "url", "a string")?, &format!("{p}.url"))?;
            if let Some(icon) = site.get("icon") {
                expect_str(icon, &format!("{p}.icon"))?;
            }
        }
    }
    Ok(())
}

fn check_experience(v: &Value, path: &str) -> Result<(), ValidationError> {
    expect_map(v, path)?;
    expect_str(require(v, path, "company", "a string")?, &format!("{path}.company"))?;

    let titles = require(v, path, "titles", "a sequence")?;
    for (i, title) in expect_seq(titles, &format!("{path}.titles"))?.iter().enumerate() {
        let p = format!("{path}.titles[{i}]");
        expect_map(title, &p)?;
        expect_str(require(title, &p, "name", "a string")?, &format!("{p}.name"))?;
        expect_date(require(title, &p, "startdate", "a string")?, &format!("{p}.startdate"))?;
        expect_date(require(title, &p, "enddate", "a string")?, &format!("{p}.enddate"))?;
    }

    if let Some(highlights) = v.get("highlights") {
        check_str_list(highlights, &format!("{path}.highlights"))?;
    }
    if let Some(unedited) = v.get("unedited") {
        check_str_list(unedited, &format!("{path}.unedited"))?;
    }
    Ok(())
}

fn check_education(v: &Value, path: &str) -> Result<(), ValidationError> {
    expect_map(v, path)?;
    expect_str(require(v, path, "school", "a string")?, &format!("{path}.school"))?;

    let degrees = require(v, path, "degrees", "a sequence")?;
    for (i, degree) in expect_seq(degrees, &format!("{path}.degrees"))?.iter().enumerate() {
        let p = format!("{path}.degrees[{i}]");
        expect_map(degree, &p)?;
        check_str_list(require(degree, &p, "names", "a sequence")?, &format!("{p}.names"))?;
        expect_date(require(degree, &p, "startdate", "a string")?, &format!("{p}.startdate"))?;
        expect_date(require(degree, &p, "enddate", "a string")?, &format!("{p}.enddate"))?;
        if let Some(gpa) = degree.get("gpa") {
            expect_number(gpa, &format!("{p}.gpa"))?;
        }
    }

    if let Some(achievements) = v.get("achievements") {
        check_str_list(achievements, &format!("{path}.achievements"))?;
    }
    Ok(())
}

fn check_project(v: &Value, path: &str) -> Result<(), ValidationError> {
    expect_map(v, path)?;
    expect_str(require(v, path, "name", "a string")?, &format!("{path}.name"))?;
    expect_str(
        require(v, path, "description", "a string")?,
        &format!("{path}.description"),
    )?;
    if let Some(subtitle) = v.get("subtitle") {
        expect_str(subtitle, &format!("{path}.subtitle"))?;
    }
    if let Some(url) = v.get("url") {
        expect_str(url, &format!("{path}.url"))?;
    }
    if let Some(technologies) = v.get("technologies") {
        check_str_list(technologies, &format!("{path}.technologies"))?;
    }
    if let Some(highlights) = v.get("highlights") {
        check_str_list(highlights, &format!("{path}.highlights"))?;
    }
    Ok(())
}

fn check_research(v: &Value, path: &str) -> Result<(), ValidationError> {
    expect_map(v, path)?;
    expect_str(require(v, path, "title", "a string")?, &format!("{path}.title"))?;
    expect_str(
        require(v, path, "description", "a string")?,
        &format!("{path}.description"),
    )?;
    if let Some(date) = v.get("publication_date") {
        expect_str(date, &format!("{path}.publication_date"))?;
    }
    if let Some(collaborators) = v.get("collaborators") {
        check_str_list(collaborators, &format!("{path}.collaborators"))?;
    }
    if let Some(keywords) = v.get("keywords") {
        check_str_list(keywords, &format!("{path}.keywords"))?;
    }
    Ok(())
}

fn check_skill_group(v: &Value, path: &str) -> Result<(), ValidationError> {
    expect_map(v, path)?;
    expect_str(require(v, path, "category", "a string")?, &format!("{path}.category"))?;
    check_str_list(require(v, path, "skills", "a sequence")?, &format!("{path}.skills"))?;
    Ok(())
}
