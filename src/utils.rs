use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Custom error types for the grammar sampler
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("empty production for rule: {0}")]
    EmptyProduction(String),

    #[error("grammar has no '{0}' rule")]
    MissingStart(String),

    #[error("no alternatives recorded for non-terminal: {0}")]
    EmptyRule(String),

    #[error("unknown terminal: {0}")]
    UnknownTerminal(String),

    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("output file {} already exists", .0.display())]
    OutputExists(PathBuf),
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Check that the grammar file exists before any parsing work starts.
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GrammarError::MissingInput(path.to_path_buf()));
    }
    Ok(())
}

/// Check that the output file does not already exist. The sampler refuses to
/// overwrite or append to a pre-existing file.
pub fn validate_output_path(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(GrammarError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}
