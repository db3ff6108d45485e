//! Failure classification from captured toolchain diagnostics.
//!
//! TeX reports errors as `! ...` marker lines in its log, each followed by a
//! couple of context lines pointing at the offending input. Those markers are
//! the most useful thing to hand an operator, so they are extracted first;
//! the raw stream tails are the fallback when the log is silent.

use super::CompileError;

const ERROR_CONTEXT_LINES: usize = 2;
const STREAM_TAIL_LINES: usize = 30;

pub(super) fn classify_failure(stdout: &str, stderr: &str, log: &str) -> CompileError {
    let diagnostic = build_diagnostic(stdout, stderr, log);
    if [log, stderr, stdout].iter().any(|text| is_missing_input(text)) {
        CompileError::MissingInput { diagnostic }
    } else {
        CompileError::Syntax { diagnostic }
    }
}

fn is_missing_input(text: &str) -> bool {
    (text.contains("LaTeX Error: File") && text.contains("not found"))
        || text.contains("I can't find file")
}

/// Collects `! ` error markers with their context lines, in order.
fn extract_error_lines(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with('!') {
            let end = (i + 1 + ERROR_CONTEXT_LINES).min(lines.len());
            for line in &lines[i..end] {
                out.push((*line).to_string());
            }
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

fn build_diagnostic(stdout: &str, stderr: &str, log: &str) -> String {
    for source in [log, stdout] {
        let markers = extract_error_lines(source);
        if !markers.is_empty() {
            return markers.join("\n");
        }
    }
    if !stderr.trim().is_empty() {
        return tail(stderr, STREAM_TAIL_LINES);
    }
    tail(stdout, STREAM_TAIL_LINES)
}
