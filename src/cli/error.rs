//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("format output: {0}")]
    Format(#[from] std::fmt::Error),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Format(_) => crate::exitcode::SOFTWARE,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(
                    DomainError::Configuration { .. } | DomainError::UnsatisfiableDepth { .. },
                ) => crate::exitcode::CONFIG,
                ApplicationError::Domain(DomainError::NodeNotFound(_)) => crate::exitcode::DATAERR,
                ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeId;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::from(DomainError::configuration("bad")).exit_code(),
            crate::exitcode::CONFIG
        );
        assert_eq!(
            CliError::from(DomainError::NodeNotFound(NodeId(3))).exit_code(),
            crate::exitcode::DATAERR
        );
        assert_eq!(
            CliError::from(DomainError::UnsatisfiableDepth {
                min_depth: 4,
                reason: "sparsity 1 never creates a child".to_string(),
            })
            .exit_code(),
            crate::exitcode::CONFIG
        );
        assert_eq!(
            CliError::from(DomainError::InvalidTree("x".into())).exit_code(),
            crate::exitcode::SOFTWARE
        );
        assert_eq!(
            CliError::InvalidArgs("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
