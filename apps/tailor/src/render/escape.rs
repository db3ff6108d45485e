//! LaTeX escaping for substituted values.
//!
//! Every data value passes through [`latex_escape`] before it is placed into
//! markup. The escaper is idempotent: a backslash that already begins one of
//! the sequences this module emits is copied verbatim, so running the escaper
//! over its own output changes nothing.

/// The exact set of sequences [`latex_escape`] emits. Longer sequences are
/// listed first; no entry is a prefix of another.
const EMITTED_SEQUENCES: [&str; 10] = [
    "\\textbackslash{}",
    "\\textasciitilde{}",
    "\\textasciicircum{}",
    "\\&",
    "\\%",
    "\\$",
    "\\#",
    "\\_",
    "\\{",
    "\\}",
];

fn emitted_prefix(rest: &str) -> Option<&'static str> {
    EMITTED_SEQUENCES
        .iter()
        .find(|seq| rest.starts_with(**seq))
        .copied()
}

/// Escapes the LaTeX reserved set `& % $ # _ { } ~ ^ \` in `input`.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut rest = input;
    while !rest.is_empty() {
        if let Some(seq) = emitted_prefix(rest) {
            out.push_str(seq);
            rest = &rest[seq.len()..];
            continue;
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_every_reserved_character() {
        assert_eq!(latex_escape("&"), "\\&");
        assert_eq!(latex_escape("%"), "\\%");
        assert_eq!(latex_escape("$"), "\\$");
        assert_eq!(latex_escape("#"), "\\#");
        assert_eq!(latex_escape("_"), "\\_");
        assert_eq!(latex_escape("{"), "\\{");
        assert_eq!(latex_escape("}"), "\\}");
        assert_eq!(latex_escape("~"), "\\textasciitilde{}");
        assert_eq!(latex_escape("^"), "\\textasciicircum{}");
        assert_eq!(latex_escape("\\"), "\\textbackslash{}");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(latex_escape("Staff Engineer, Core Infra"), "Staff Engineer, Core Infra");
        assert_eq!(latex_escape("réseau único"), "réseau único");
    }

    #[test]
    fn test_mixed_string() {
        assert_eq!(
            latex_escape("Cut P99 latency by 40% & saved $2M"),
            "Cut P99 latency by 40\\% \\& saved \\$2M"
        );
        assert_eq!(latex_escape("user_id #7"), "user\\_id \\#7");
    }

    #[test]
    fn test_escape_is_idempotent() {
        let samples = [
            "&%$#_{}~^\\",
            "R&D spend at 12%",
            "already \\& escaped",
            "\\textbackslash{} kept whole",
            "\\textasciitilde{}\\textasciicircum{}",
            "\\unknown macro",
            "a\\\\b",
        ];
        for s in samples {
            let once = latex_escape(s);
            assert_eq!(latex_escape(&once), once, "double escape changed {s:?}");
        }
    }

    #[test]
    fn test_unknown_backslash_sequences_are_escaped() {
        assert_eq!(latex_escape("\\item"), "\\textbackslash{}item");
        assert_eq!(latex_escape("\\\\"), "\\textbackslash{}\\textbackslash{}");
    }
}
