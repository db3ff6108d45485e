//! Template substitution engine.
//!
//! Templates are plain LaTeX carrying `{{NAME}}` tokens, NAME matching
//! `[A-Z][A-Z0-9_]*`. Every token must resolve against the placeholder map;
//! a missing key is a hard error rather than a silently blank section. Bare
//! `{{` that is ordinary LaTeX brace grouping (content that could not be a
//! token) passes through untouched.

pub mod escape;
pub mod placeholders;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::Resume;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template references {{{{{key}}}}} but the document provides no value for it")]
    MissingPlaceholder { key: String },
    #[error("malformed placeholder token near `{snippet}`")]
    UnresolvableToken { snippet: String },
    #[error("cannot read template {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template `{name}` not found; available: {}", available.join(", "))]
    UnknownTemplate { name: String, available: Vec<String> },
}

/// Resolves a template given either a filesystem path or a bare name looked
/// up in `template_dir` (with `.tex` appended when absent). A failed lookup
/// reports what the directory does offer.
pub fn resolve_template(template_dir: &Path, spec: &str) -> Result<PathBuf, TemplateError> {
    let direct = Path::new(spec);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }
    let file_name = if spec.ends_with(".tex") {
        spec.to_string()
    } else {
        format!("{spec}.tex")
    };
    let candidate = template_dir.join(&file_name);
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(TemplateError::UnknownTemplate {
        name: spec.to_string(),
        available: available_templates(template_dir),
    })
}

/// Sorted stems of the `.tex` files in `dir`; empty when unreadable.
pub fn available_templates(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "tex"))
        .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

/// Flattens `resume` and substitutes every token in `template_source`.
/// The document is read-only here; the rendered string is a new value.
pub fn render(resume: &Resume, template_source: &str) -> Result<String, TemplateError> {
    let map = placeholders::flatten(resume);
    debug!(placeholders = map.len(), "flattened document");
    let rendered = substitute(template_source, &map)?;
    check_structure(&rendered);
    Ok(rendered)
}

enum TokenScan<'a> {
    /// Well-formed `{{NAME}}`: the name and the length consumed after `{{`.
    Token { name: &'a str, consumed: usize },
    /// Ordinary brace grouping, not a placeholder attempt.
    NotAToken,
    /// Looks like a placeholder attempt but is not closed with `}}`.
    Malformed,
}

fn scan_token(after: &str) -> TokenScan<'_> {
    let end = after
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or(after.len());
    if end == 0 {
        return TokenScan::NotAToken;
    }
    let remainder = &after[end..];
    if remainder.starts_with("}}") {
        TokenScan::Token {
            name: &after[..end],
            consumed: end + 2,
        }
    } else if remainder.starts_with('}') || remainder.is_empty() {
        TokenScan::Malformed
    } else {
        TokenScan::NotAToken
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('A'..='Z'))
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn snippet_of(text: &str) -> String {
    text.chars().take(24).collect()
}

fn substitute(template: &str, map: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match scan_token(after) {
            TokenScan::Token { name, consumed } => {
                if !is_valid_name(name) {
                    return Err(TemplateError::UnresolvableToken {
                        snippet: snippet_of(&rest[start..]),
                    });
                }
                match map.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(TemplateError::MissingPlaceholder {
                            key: name.to_string(),
                        })
                    }
                }
                rest = &after[consumed..];
            }
            TokenScan::NotAToken => {
                out.push('{');
                rest = &rest[start + 1..];
            }
            TokenScan::Malformed => {
                return Err(TemplateError::UnresolvableToken {
                    snippet: snippet_of(&rest[start..]),
                });
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Non-fatal sanity check on the rendered source. The compiler remains the
/// authority; an imbalance here only earns a warning in the log.
fn check_structure(rendered: &str) {
    let begins = rendered.matches("\\begin{").count();
    let ends = rendered.matches("\\end{").count();
    if begins != ends {
        warn!(begins, ends, "rendered source has unbalanced begin/end environments");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{BasicInfo, ContactInfo, Experience, TitlePeriod};

    fn sample_resume() -> Resume {
        Resume {
            basic: BasicInfo {
                name: "Ada & Co".to_string(),
                address: vec![],
                contact: ContactInfo {
                    email: "ada@example.com".to_string(),
                    phone: None,
                },
                websites: vec![],
            },
            summary: None,
            experiences: vec![Experience {
                company: "Analytical Engines".to_string(),
                titles: vec![TitlePeriod {
                    name: "Programmer".to_string(),
                    startdate: "1842".to_string(),
                    enddate: "1843".to_string(),
                }],
                highlights: vec!["Wrote the first program".to_string()],
                original_highlights: vec!["Wrote the first program".to_string()],
            }],
            education: vec![],
            projects: vec![],
            research: vec![],
            skills: vec![],
        }
    }

    #[test]
    fn test_render_substitutes_and_escapes() {
        let out = render(&sample_resume(), "Hello {{NAME}} <{{EMAIL}}>").unwrap();
        assert_eq!(out, "Hello Ada \\& Co <ada@example.com>");
    }

    #[test]
    fn test_render_leaves_no_unresolved_tokens() {
        let template = "{{NAME}} {{EMAIL}} {{EXPERIENCE_SECTION}}";
        let out = render(&sample_resume(), template).unwrap();
        assert!(!out.contains("{{"));
        assert!(out.contains("\\item Wrote the first program"));
    }

    #[test]
    fn test_missing_placeholder_names_the_key() {
        let err = render(&sample_resume(), "call me at {{PHONE}}").unwrap_err();
        match err {
            TemplateError::MissingPlaceholder { ref key } => assert_eq!(key, "PHONE"),
            other => panic!("expected MissingPlaceholder, got {other:?}"),
        }
        assert!(err.to_string().contains("PHONE"));
    }

    #[test]
    fn test_lowercase_token_is_unresolvable() {
        let err = render(&sample_resume(), "{{phone}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnresolvableToken { .. }));
    }

    #[test]
    fn test_unclosed_token_is_unresolvable() {
        let err = render(&sample_resume(), "start {{NAME} end").unwrap_err();
        assert!(matches!(err, TemplateError::UnresolvableToken { .. }));
        let err = render(&sample_resume(), "start {{NAME").unwrap_err();
        assert!(matches!(err, TemplateError::UnresolvableToken { .. }));
    }

    #[test]
    fn test_latex_brace_grouping_passes_through() {
        let template = "\\textbf{{\\Large {{NAME}}}}";
        let out = render(&sample_resume(), template).unwrap();
        assert_eq!(out, "\\textbf{{\\Large Ada \\& Co}}");
    }

    #[test]
    fn test_unbalanced_environments_still_render() {
        let out = render(&sample_resume(), "\\begin{document} {{NAME}}").unwrap();
        assert!(out.contains("Ada"));
    }

    #[test]
    fn test_substitute_with_explicit_map() {
        let mut map = BTreeMap::new();
        map.insert("A".to_string(), "1".to_string());
        map.insert("B_2".to_string(), "2".to_string());
        let out = substitute("{{A}}+{{B_2}}={{A}}{{B_2}}", &map).unwrap();
        assert_eq!(out, "1+2=12");
    }

    #[test]
    fn test_resolve_template_by_name_and_by_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let compact = dir.path().join("compact.tex");
        std::fs::write(&compact, "{{NAME}}").unwrap();
        std::fs::write(dir.path().join("resume.tex"), "{{NAME}}").unwrap();

        assert_eq!(resolve_template(dir.path(), "compact").unwrap(), compact);
        assert_eq!(resolve_template(dir.path(), "compact.tex").unwrap(), compact);
        assert_eq!(
            resolve_template(dir.path(), &compact.display().to_string()).unwrap(),
            compact
        );
    }

    #[test]
    fn test_resolve_template_miss_lists_available() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("resume.tex"), "{{NAME}}").unwrap();
        std::fs::write(dir.path().join("compact.tex"), "{{NAME}}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let err = resolve_template(dir.path(), "fancy").unwrap_err();
        match err {
            TemplateError::UnknownTemplate { name, available } => {
                assert_eq!(name, "fancy");
                assert_eq!(available, vec!["compact", "resume"]);
            }
            other => panic!("expected UnknownTemplate, got {other:?}"),
        }
    }
}
