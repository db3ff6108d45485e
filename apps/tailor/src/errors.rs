use thiserror::Error;

use crate::compiler::CompileError;
use crate::loader::ValidationError;
use crate::render::TemplateError;

/// Top-level error for one generation run. Each variant wraps the failing
/// stage's own error so callers can tell the classes apart; the exit code
/// mapping carries that distinction through the CLI boundary.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("document validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("template rendering failed: {0}")]
    Template(#[from] TemplateError),

    #[error("PDF compilation failed: {0}")]
    Compile(#[from] CompileError),
}

impl GenerateError {
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Validation(_) => 2,
            GenerateError::Template(_) => 3,
            GenerateError::Compile(_) => 4,
        }
    }
}
