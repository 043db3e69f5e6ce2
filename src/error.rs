use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to the user.
    ///
    /// Use of Internal is never a guarantee the error is not caused by, for
    /// example, a mistyped password - merely that the code cannot tell.
    Internal,

    /// The user provided invalid input or asked for something that cannot
    /// be done.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required form field was blank.
    Validation,
    /// No cryptographic library is present in the host environment.
    LibraryUnavailable,
    /// The library call failed for a reason not covered by a finer kind.
    Operation,
    /// Copying to the clipboard failed or no clipboard is present.
    Clipboard,
    /// The armor block is malformed (missing header/footer lines).
    ArmoringInvalid,
    /// Base64 decoding of the armored body failed.
    ArmoringDecode,
    /// The sealed packet layout (version, lengths) is invalid.
    BinaryFormat,
    /// Input data ended before the expected component could be read.
    TruncatedInput,
    /// Additional bytes were present after the sealed payload.
    TrailingData,
    /// Authentication failed due to an incorrect password or tampering
    /// or corruption.
    AuthenticationFailed,
    /// Low-level scrypt key derivation failed.
    ScryptFailure,
    /// NaCl secretbox (XSalsa20Poly1305) failed to seal data.
    SecretboxFailure,
    /// Text was expected but the bytes were not valid UTF-8.
    InvalidUtf8,
    /// Passphrase could not be obtained from the configured reader.
    PassphraseUnavailable,
    /// Unexpected state reached within cipherpad logic.
    InternalInvariant,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct CipherpadError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag. Any code consuming errors MUST
    /// handle the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl CipherpadError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Shorthand for a blank-field error raised by the input validator.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorCategory::User, ErrorKind::Validation, msg)
    }

    /// The message carried by the error, as produced where it was raised.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CipherpadError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_is_message() {
        let err = CipherpadError::validation("Enter a password before continuing.");
        assert_eq!(err.to_string(), "Enter a password before continuing.");
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.kind, Some(ErrorKind::Validation));
    }

    #[test]
    fn test_source_is_preserved() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = CipherpadError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            "failed to read from input.txt",
            io_err,
        );
        assert_eq!(err.message(), "failed to read from input.txt");
        assert_eq!(err.source_error().map(|e| e.to_string()).as_deref(), Some("gone"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_new_has_no_kind() {
        let err = CipherpadError::new(ErrorCategory::Internal, "boom");
        assert_eq!(err.kind, None);
        assert!(err.source_error().is_none());
    }
}
