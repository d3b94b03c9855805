//! Binary-facing error: a message plus the process exit code.
//!
//! Exit codes:
//! - 2: input/usage (unreadable data, unsupported dimension, file selection)
//! - 3: data validation (bad record values, unknown categories)
//! - 4: terminal/UI failures

use crate::pipeline::{LoadError, PipelineError};

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let exit_code = match err {
            PipelineError::Load(_) | PipelineError::UnsupportedDimension(_) => 2,
            PipelineError::Validation { .. } | PipelineError::UnknownCategory { .. } => 3,
        };
        AppError::new(exit_code, error_chain(&err))
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        PipelineError::Load(err).into()
    }
}

/// `err: cause: cause...` so wrapped csv/io errors are not lost.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
