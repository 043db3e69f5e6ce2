//! Where the command-line host gets the password from

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

/// Trait for reading passwords from various sources
pub trait PassphraseReader {
    /// Returns the password wrapped in `Zeroizing` so it is wiped from
    /// memory when dropped.
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>>;
}

/// Reads the whole of any io::Read source as the password
///
/// Nothing is stripped; a trailing newline is part of the password.
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;

        let text = std::str::from_utf8(&data).map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "passphrase is not valid UTF-8",
                e,
            )
        })?;
        Ok(Zeroizing::new(text.to_owned()))
    }
}

/// Reads the password from the terminal with no echo
#[derive(Debug, Default)]
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<String>> {
        if !io::stdin().is_terminal() {
            return Err(CipherpadError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "cannot read passphrase from terminal - stdin is not a terminal",
            ));
        }

        // rpassword hands back a plain String; move it straight into Zeroizing.
        let passphrase = rpassword::prompt_password("Password (cipherpad): ").map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                format!("failure reading passphrase: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(passphrase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_passphrase_reader() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b"mypassword"[..]));
        assert_eq!(reader.read_passphrase().unwrap().as_str(), "mypassword");
    }

    #[test]
    fn test_reader_keeps_trailing_newline() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b"pw\n"[..]));
        assert_eq!(reader.read_passphrase().unwrap().as_str(), "pw\n");
    }

    #[test]
    fn test_reader_passphrase_reader_empty() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b""[..]));
        assert_eq!(reader.read_passphrase().unwrap().as_str(), "");
    }

    #[test]
    fn test_reader_rejects_non_utf8() {
        let data: &[u8] = &[0xff, 0xfe, 0x00, 0x01];
        let mut reader = ReaderPassphraseReader::new(Box::new(data));
        let err = reader.read_passphrase().unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::PassphraseUnavailable));
    }

    /// Must be run explicitly and with human input:
    ///
    /// cargo test test_terminal_reader_interactive -- --ignored --nocapture
    #[test]
    #[ignore]
    fn test_terminal_reader_interactive() {
        let mut reader = TerminalPassphraseReader::new();
        let passphrase = reader.read_passphrase().unwrap();
        assert!(!passphrase.is_empty(), "Expected non-empty passphrase");
    }
}
