use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Pipeline configuration loaded from environment variables. Every value has
/// a default; the pipeline itself holds no globals and receives this struct
/// explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    /// Also persist the rendered LaTeX source next to the PDF for inspection.
    pub keep_tex: bool,
    pub latex_command: String,
    pub compile_timeout: Duration,
    /// Parent directory for per-request working directories.
    pub work_root: PathBuf,
    /// Absent key means customization is skipped entirely.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ai_max_tokens: u32,
    pub ai_temperature: f32,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            template_path: PathBuf::from(env_or("TEMPLATE_PATH", "templates/resume.tex")),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "output")),
            keep_tex: bool_env("KEEP_TEX"),
            latex_command: env_or("LATEX_COMMAND", "latexmk"),
            compile_timeout: Duration::from_secs(
                env_or("COMPILE_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("COMPILE_TIMEOUT_SECS must be a number of seconds")?,
            ),
            work_root: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            ai_max_tokens: env_or("AI_MAX_TOKENS", "1000")
                .parse::<u32>()
                .context("AI_MAX_TOKENS must be a positive integer")?,
            ai_temperature: env_or("AI_TEMPERATURE", "0.7")
                .parse::<f32>()
                .context("AI_TEMPERATURE must be a number")?,
            request_timeout: Duration::from_secs(
                env_or("AI_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("AI_TIMEOUT_SECS must be a number of seconds")?,
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn bool_env(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
impl Config {
    /// A config that never touches the process environment. Tests override
    /// the fields they care about.
    pub fn test_default() -> Self {
        Config {
            template_path: PathBuf::from("templates/resume.tex"),
            output_dir: std::env::temp_dir().join("tailor-test-output"),
            keep_tex: false,
            latex_command: "latexmk".to_string(),
            compile_timeout: Duration::from_secs(60),
            work_root: std::env::temp_dir(),
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            ai_max_tokens: 1000,
            ai_temperature: 0.7,
            request_timeout: Duration::from_secs(30),
            rust_log: "info".to_string(),
        }
    }
}
