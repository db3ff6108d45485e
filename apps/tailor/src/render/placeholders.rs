//! Flattening of a resume into the placeholder map.
//!
//! The naming convention is fixed and enumerated here so templates and data
//! stay in sync:
//!
//! - `NAME`, `EMAIL`, `ADDRESS`; `PHONE` and `SUMMARY` only when present
//! - per labeled link: `{LABEL}_TEXT` and `{LABEL}_URL` (label uppercased,
//!   non-alphanumerics collapsed to `_`)
//! - first education entry: `EDUCATION_SCHOOL`, `EDUCATION_DEGREE`,
//!   `EDUCATION_DATES`, `EDUCATION_COURSEWORK`, `EDUCATION_GPA` when present
//! - per skill group: `SKILLS_{CATEGORY}`; plus `SKILLS_SECTION`
//! - per experience i (1-based): `EXPERIENCE_{i}_COMPANY`, `_TITLE`,
//!   `_DATES`, `_HIGHLIGHTS`; plus `EXPERIENCE_SECTION`
//! - per project i: `PROJECT_{i}_NAME`, `_DESCRIPTION`, `_TECHNOLOGIES`;
//!   plus `PROJECTS_SECTION`
//! - `RESEARCH_SECTION` when research entries exist
//!
//! Every value is escaped before insertion; section blocks are assembled
//! from escaped pieces around literal markup macros. The map is rebuilt on
//! every generation because customization changes the document per request.

use std::collections::BTreeMap;

use crate::models::resume::{Education, Experience, Project, Research, Resume, SkillGroup};
use crate::render::escape::latex_escape;

pub fn flatten(resume: &Resume) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert("NAME".to_string(), latex_escape(&resume.basic.name));
    map.insert("EMAIL".to_string(), latex_escape(&resume.basic.contact.email));
    if let Some(phone) = non_empty(resume.basic.contact.phone.as_deref()) {
        map.insert("PHONE".to_string(), latex_escape(phone));
    }
    if !resume.basic.address.is_empty() {
        let joined = resume.basic.address.join(", ");
        map.insert("ADDRESS".to_string(), latex_escape(&joined));
    }
    if let Some(summary) = non_empty(resume.summary.as_deref()) {
        map.insert("SUMMARY".to_string(), latex_escape(summary));
    }

    for link in &resume.basic.websites {
        let label = placeholder_label(&link.text);
        if label.is_empty() {
            continue;
        }
        map.insert(format!("{label}_TEXT"), latex_escape(&link.text));
        map.insert(format!("{label}_URL"), latex_escape(&link.url));
    }

    if let Some(edu) = resume.education.first() {
        insert_education(&mut map, edu);
    }
    insert_skills(&mut map, &resume.skills);
    insert_experiences(&mut map, &resume.experiences);
    insert_projects(&mut map, &resume.projects);
    insert_research(&mut map, &resume.research);

    map
}

/// `present`, `current`, and `now` (any case) render as `Present`.
pub fn format_date_range(start: &str, end: &str) -> String {
    let start = start.trim();
    let end = end.trim();
    let end = match end.to_ascii_lowercase().as_str() {
        "present" | "current" | "now" => "Present",
        _ => end,
    };
    match (start.is_empty(), end.is_empty()) {
        (true, _) => end.to_string(),
        (_, true) => start.to_string(),
        _ => format!("{start} - {end}"),
    }
}

/// Uppercases a link label into a placeholder-safe prefix: runs of
/// non-alphanumeric characters collapse to a single underscore.
fn placeholder_label(text: &str) -> String {
    let mut label = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            label.push(c.to_ascii_uppercase());
        } else if !label.ends_with('_') && !label.is_empty() {
            label.push('_');
        }
    }
    label.trim_end_matches('_').to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn insert_education(map: &mut BTreeMap<String, String>, edu: &Education) {
    map.insert("EDUCATION_SCHOOL".to_string(), latex_escape(&edu.school));
    if let Some(degree) = edu.degrees.first() {
        let names = degree.names.join(", ");
        map.insert("EDUCATION_DEGREE".to_string(), latex_escape(&names));
        map.insert(
            "EDUCATION_DATES".to_string(),
            latex_escape(&format_date_range(&degree.startdate, &degree.enddate)),
        );
        if let Some(gpa) = degree.gpa {
            map.insert("EDUCATION_GPA".to_string(), latex_escape(&format!("{gpa}")));
        }
    }
    if !edu.achievements.is_empty() {
        let joined = edu.achievements.join(", ");
        map.insert("EDUCATION_COURSEWORK".to_string(), latex_escape(&joined));
    }
}

fn insert_skills(map: &mut BTreeMap<String, String>, skills: &[SkillGroup]) {
    if skills.is_empty() {
        return;
    }
    let mut section_lines = Vec::with_capacity(skills.len());
    for group in skills {
        let label = placeholder_label(&group.category);
        let joined = latex_escape(&group.skills.join(", "));
        if !label.is_empty() {
            map.insert(format!("SKILLS_{label}"), joined.clone());
        }
        section_lines.push(format!(
            "\\textbf{{{}:}} {} \\\\",
            latex_escape(&group.category),
            joined
        ));
    }
    map.insert("SKILLS_SECTION".to_string(), section_lines.join("\n"));
}

fn highlight_block(highlights: &[String]) -> String {
    let mut lines = Vec::with_capacity(highlights.len() + 2);
    lines.push("\\begin{itemize}".to_string());
    for highlight in highlights {
        lines.push(format!("  \\item {}", latex_escape(highlight)));
    }
    lines.push("\\end{itemize}".to_string());
    lines.join("\n")
}

fn experience_block(exp: &Experience) -> String {
    let mut lines = vec![format!("\\textbf{{{}}} \\\\", latex_escape(&exp.company))];
    for title in &exp.titles {
        lines.push(format!(
            "\\textit{{{}}} \\hfill {} \\\\",
            latex_escape(&title.name),
            latex_escape(&format_date_range(&title.startdate, &title.enddate)),
        ));
    }
    if !exp.highlights.is_empty() {
        lines.push(highlight_block(&exp.highlights));
    }
    lines.join("\n")
}

fn insert_experiences(map: &mut BTreeMap<String, String>, experiences: &[Experience]) {
    if experiences.is_empty() {
        return;
    }
    let mut blocks = Vec::with_capacity(experiences.len());
    for (i, exp) in experiences.iter().enumerate() {
        let n = i + 1;
        map.insert(format!("EXPERIENCE_{n}_COMPANY"), latex_escape(&exp.company));
        if let Some(title) = exp.latest_title() {
            map.insert(format!("EXPERIENCE_{n}_TITLE"), latex_escape(&title.name));
        }
        if let (Some(first), Some(last)) = (exp.titles.first(), exp.titles.last()) {
            map.insert(
                format!("EXPERIENCE_{n}_DATES"),
                latex_escape(&format_date_range(&first.startdate, &last.enddate)),
            );
        }
        map.insert(format!("EXPERIENCE_{n}_HIGHLIGHTS"), highlight_block(&exp.highlights));
        blocks.push(experience_block(exp));
    }
    map.insert("EXPERIENCE_SECTION".to_string(), blocks.join("\n\n"));
}

fn project_block(project: &Project) -> String {
    let mut header = format!("\\textbf{{{}}}", latex_escape(&project.name));
    if let Some(subtitle) = non_empty(project.subtitle.as_deref()) {
        header.push_str(&format!(" ({})", latex_escape(subtitle)));
    }
    header.push_str(" \\\\");

    let mut lines = vec![header, latex_escape(&project.description)];
    if !project.technologies.is_empty() {
        lines.push(format!(
            "\\textit{{{}}}",
            latex_escape(&project.technologies.join(", "))
        ));
    }
    if !project.highlights.is_empty() {
        lines.push(highlight_block(&project.highlights));
    }
    lines.join("\n")
}

fn insert_projects(map: &mut BTreeMap<String, String>, projects: &[Project]) {
    if projects.is_empty() {
        return;
    }
    let mut blocks = Vec::with_capacity(projects.len());
    for (i, project) in projects.iter().enumerate() {
        let n = i + 1;
        map.insert(format!("PROJECT_{n}_NAME"), latex_escape(&project.name));
        map.insert(
            format!("PROJECT_{n}_DESCRIPTION"),
            latex_escape(&project.description),
        );
        if !project.technologies.is_empty() {
            map.insert(
                format!("PROJECT_{n}_TECHNOLOGIES"),
                latex_escape(&project.technologies.join(", ")),
            );
        }
        blocks.push(project_block(project));
    }
    map.insert("PROJECTS_SECTION".to_string(), blocks.join("\n\n"));
}

fn insert_research(map: &mut BTreeMap<String, String>, research: &[Research]) {
    if research.is_empty() {
        return;
    }
    let mut blocks = Vec::with_capacity(research.len());
    for entry in research {
        let mut header = format!("\\textbf{{{}}}", latex_escape(&entry.title));
        if let Some(date) = non_empty(entry.publication_date.as_deref()) {
            header.push_str(&format!(" \\hfill {}", latex_escape(date)));
        }
        header.push_str(" \\\\");
        let mut lines = vec![header, latex_escape(&entry.description)];
        if !entry.keywords.is_empty() {
            lines.push(format!(
                "\\textit{{{}}}",
                latex_escape(&entry.keywords.join(", "))
            ));
        }
        blocks.push(lines.join("\n"));
    }
    map.insert("RESEARCH_SECTION".to_string(), blocks.join("\n\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{BasicInfo, ContactInfo, Degree, TitlePeriod, WebsiteLink};

    fn sample_resume() -> Resume {
        Resume {
            basic: BasicInfo {
                name: "Grace Hopper".to_string(),
                address: vec!["New York".to_string(), "NY".to_string()],
                contact: ContactInfo {
                    email: "grace@example.com".to_string(),
                    phone: Some("555-0100".to_string()),
                },
                websites: vec![WebsiteLink {
                    text: "LinkedIn".to_string(),
                    url: "https://linkedin.com/in/ghopper".to_string(),
                    icon: None,
                }],
            },
            summary: Some("Systems engineer & compiler pioneer".to_string()),
            experiences: vec![Experience {
                company: "Eckert-Mauchly".to_string(),
                titles: vec![
                    TitlePeriod {
                        name: "Mathematician".to_string(),
                        startdate: "1949".to_string(),
                        enddate: "1952".to_string(),
                    },
                    TitlePeriod {
                        name: "Director of Automatic Programming".to_string(),
                        startdate: "1952".to_string(),
                        enddate: "present".to_string(),
                    },
                ],
                highlights: vec![
                    "Wrote the A-0 compiler".to_string(),
                    "Cut release cycle by 50%".to_string(),
                ],
                original_highlights: vec![
                    "Wrote the A-0 compiler".to_string(),
                    "Cut release cycle by 50%".to_string(),
                ],
            }],
            education: vec![Education {
                school: "Yale University".to_string(),
                degrees: vec![Degree {
                    names: vec!["PhD Mathematics".to_string()],
                    startdate: "1930".to_string(),
                    enddate: "1934".to_string(),
                    gpa: Some(3.9),
                }],
                achievements: vec!["Differential equations".to_string()],
            }],
            projects: vec![Project {
                name: "FLOW-MATIC".to_string(),
                description: "English-like data processing language".to_string(),
                subtitle: None,
                url: None,
                technologies: vec!["UNIVAC".to_string()],
                highlights: vec![],
            }],
            research: vec![],
            skills: vec![SkillGroup {
                category: "Languages".to_string(),
                skills: vec!["COBOL".to_string(), "FLOW-MATIC".to_string()],
            }],
        }
    }

    #[test]
    fn test_flatten_scalar_keys() {
        let map = flatten(&sample_resume());
        assert_eq!(map.get("NAME").map(String::as_str), Some("Grace Hopper"));
        assert_eq!(map.get("EMAIL").map(String::as_str), Some("grace@example.com"));
        assert_eq!(map.get("PHONE").map(String::as_str), Some("555-0100"));
        assert_eq!(map.get("ADDRESS").map(String::as_str), Some("New York, NY"));
    }

    #[test]
    fn test_flatten_escapes_values() {
        let map = flatten(&sample_resume());
        assert_eq!(
            map.get("SUMMARY").map(String::as_str),
            Some("Systems engineer \\& compiler pioneer")
        );
        let highlights = map.get("EXPERIENCE_1_HIGHLIGHTS").unwrap();
        assert!(highlights.contains("Cut release cycle by 50\\%"));
    }

    #[test]
    fn test_link_keys_derive_from_label() {
        let mut resume = sample_resume();
        resume.basic.websites.push(WebsiteLink {
            text: "Google Scholar".to_string(),
            url: "https://scholar.example.com".to_string(),
            icon: None,
        });
        let map = flatten(&resume);
        assert_eq!(map.get("LINKEDIN_TEXT").map(String::as_str), Some("LinkedIn"));
        assert!(map.contains_key("LINKEDIN_URL"));
        assert_eq!(
            map.get("GOOGLE_SCHOLAR_URL").map(String::as_str),
            Some("https://scholar.example.com")
        );
    }

    #[test]
    fn test_optional_keys_omitted_when_absent() {
        let mut resume = sample_resume();
        resume.basic.contact.phone = None;
        resume.summary = Some("   ".to_string());
        resume.education[0].degrees[0].gpa = None;
        let map = flatten(&resume);
        assert!(!map.contains_key("PHONE"));
        assert!(!map.contains_key("SUMMARY"));
        assert!(!map.contains_key("EDUCATION_GPA"));
    }

    #[test]
    fn test_education_keys() {
        let map = flatten(&sample_resume());
        assert_eq!(map.get("EDUCATION_SCHOOL").map(String::as_str), Some("Yale University"));
        assert_eq!(map.get("EDUCATION_DEGREE").map(String::as_str), Some("PhD Mathematics"));
        assert_eq!(map.get("EDUCATION_DATES").map(String::as_str), Some("1930 - 1934"));
        assert_eq!(map.get("EDUCATION_GPA").map(String::as_str), Some("3.9"));
        assert_eq!(
            map.get("EDUCATION_COURSEWORK").map(String::as_str),
            Some("Differential equations")
        );
    }

    #[test]
    fn test_skills_keys_and_section() {
        let map = flatten(&sample_resume());
        assert_eq!(
            map.get("SKILLS_LANGUAGES").map(String::as_str),
            Some("COBOL, FLOW-MATIC")
        );
        let section = map.get("SKILLS_SECTION").unwrap();
        assert!(section.contains("\\textbf{Languages:} COBOL, FLOW-MATIC"));
    }

    #[test]
    fn test_experience_block_renders_active_highlights() {
        let mut resume = sample_resume();
        resume.experiences[0].highlights = vec!["Rewritten bullet".to_string()];
        let map = flatten(&resume);
        let section = map.get("EXPERIENCE_SECTION").unwrap();
        assert!(section.contains("\\item Rewritten bullet"));
        assert!(!section.contains("A-0 compiler"));
    }

    #[test]
    fn test_experience_dates_span_first_to_last_title() {
        let map = flatten(&sample_resume());
        assert_eq!(
            map.get("EXPERIENCE_1_DATES").map(String::as_str),
            Some("1949 - Present")
        );
        assert_eq!(
            map.get("EXPERIENCE_1_TITLE").map(String::as_str),
            Some("Director of Automatic Programming")
        );
    }

    #[test]
    fn test_format_date_range_present_aliases() {
        assert_eq!(format_date_range("2020", "present"), "2020 - Present");
        assert_eq!(format_date_range("2020", "Current"), "2020 - Present");
        assert_eq!(format_date_range("2020", "NOW"), "2020 - Present");
        assert_eq!(format_date_range("2020", "2022"), "2020 - 2022");
        assert_eq!(format_date_range("", "2022"), "2022");
        assert_eq!(format_date_range("2020", ""), "2020");
    }

    #[test]
    fn test_placeholder_label_collapses_separators() {
        assert_eq!(placeholder_label("LinkedIn"), "LINKEDIN");
        assert_eq!(placeholder_label("Google Scholar"), "GOOGLE_SCHOLAR");
        assert_eq!(placeholder_label("c++ / systems"), "C_SYSTEMS");
        assert_eq!(placeholder_label("---"), "");
    }

    #[test]
    fn test_sections_absent_for_empty_lists() {
        let mut resume = sample_resume();
        resume.projects.clear();
        resume.research.clear();
        let map = flatten(&resume);
        assert!(!map.contains_key("PROJECTS_SECTION"));
        assert!(!map.contains_key("RESEARCH_SECTION"));
    }
}
