use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimlogError {
    #[error("Invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid rule for field '{field}': {message}")]
    InvalidRule { field: String, message: String },
}

pub type SimlogResult<T> = Result<T, SimlogError>;

/// Non-fatal conditions reported alongside a parse result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    /// The input file does not exist; defaults were used instead.
    MissingInputFile { path: PathBuf },
    /// The input file exists but could not be read; defaults were used instead.
    UnreadableInputFile { path: PathBuf, reason: String },
    /// A fallback scenario match had more than one candidate.
    AmbiguousMatch {
        scenario: String,
        chosen: String,
        alternatives: Vec<String>,
    },
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputWarning::MissingInputFile { path } => {
                write!(f, "Log file not found: {}", path.display())
            }
            InputWarning::UnreadableInputFile { path, reason } => {
                write!(f, "Could not read {}: {}", path.display(), reason)
            }
            InputWarning::AmbiguousMatch {
                scenario,
                chosen,
                alternatives,
            } => write!(
                f,
                "{} matched '{}' by substring; also matches: {}",
                scenario,
                chosen,
                alternatives.join(", ")
            ),
        }
    }
}

/// Read a whole input file, turning absence into a warning instead of an error.
pub(crate) fn read_input(path: &std::path::Path) -> Result<String, InputWarning> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(InputWarning::MissingInputFile {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(InputWarning::UnreadableInputFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
