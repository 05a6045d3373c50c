//! All errors related to parsing, validating, and configuring commit messages.

use std::fmt;

/// The error returned when building, parsing, or validating a commit message
/// fails.
///
/// Every error carries a complete, user-facing message; callers can print it
/// as-is without re-deriving any context.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,

    commit: Option<String>,
}

impl Error {
    /// Create a new error from an `ErrorKind` and its message.
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            commit: None,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    pub(crate) fn invalid_commit_message(commit: &str) -> Self {
        Self {
            kind: ErrorKind::InvalidCommitMessage,
            message: ErrorKind::InvalidCommitMessage.to_string(),
            commit: Some(commit.to_owned()),
        }
    }

    /// The kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The commit text that failed to parse, if the error came from the
    /// parser.
    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }
}

/// All possible error kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A component received text that violates its lexical grammar, e.g. a
    /// type with a space in it, or a description with a tab.
    InvalidArgument,

    /// The header line does not follow the Conventional Commits grammar.
    InvalidCommitMessage,

    /// A lexically valid component breaks a configured rule.
    InvalidValue,

    /// A configuration value is itself invalid.
    InvalidConfiguration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => f.write_str("invalid argument"),
            ErrorKind::InvalidCommitMessage => {
                f.write_str("Could not find a valid Conventional Commits message")
            }
            ErrorKind::InvalidValue => f.write_str("invalid value"),
            ErrorKind::InvalidConfiguration => f.write_str("invalid configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_keep_the_commit() {
        let err = Error::invalid_commit_message("not a commit");

        assert_eq!(err.kind(), ErrorKind::InvalidCommitMessage);
        assert_eq!(err.commit(), Some("not a commit"));
        assert_eq!(
            err.to_string(),
            "Could not find a valid Conventional Commits message"
        );
    }

    #[test]
    fn other_errors_display_their_message() {
        let err = Error::invalid_value("You must provide a scope.");

        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.commit(), None);
        assert_eq!(err.to_string(), "You must provide a scope.");
    }
}
