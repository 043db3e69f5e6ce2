//! Input validation and the per-action request it produces.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{CipherpadError, Result};

pub const ENTER_PLAINTEXT: &str = "Enter plaintext to encrypt.";
pub const ENTER_CIPHERTEXT: &str = "Enter armored ciphertext to decrypt.";
pub const ENTER_PASSWORD: &str = "Enter a password before continuing.";

/// Which way an action transforms the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Encrypt => "encrypt",
            Mode::Decrypt => "decrypt",
        }
    }

    /// Status shown while the action runs.
    pub fn progress_message(self) -> &'static str {
        match self {
            Mode::Encrypt => "Encrypting...",
            Mode::Decrypt => "Decrypting...",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Mode::Encrypt => "Encrypted successfully.",
            Mode::Decrypt => "Decrypted successfully.",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, immutable request for a single action.
///
/// The password is wiped from memory when the request is dropped.
pub struct OperationRequest {
    input: String,
    password: Zeroizing<String>,
    mode: Mode,
}

impl OperationRequest {
    /// Trimmed input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Raw password, exactly as typed.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl fmt::Debug for OperationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRequest")
            .field("input_len", &self.input.len())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Checks that both fields carry something other than whitespace.
///
/// The input is checked first, so a form with both fields blank reports the
/// mode-specific input message.
pub fn validate(input: &str, password: &str, mode: Mode) -> Result<OperationRequest> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CipherpadError::validation(match mode {
            Mode::Encrypt => ENTER_PLAINTEXT,
            Mode::Decrypt => ENTER_CIPHERTEXT,
        }));
    }

    if password.trim().is_empty() {
        return Err(CipherpadError::validation(ENTER_PASSWORD));
    }

    Ok(OperationRequest {
        input: input.to_owned(),
        password: Zeroizing::new(password.to_owned()),
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_mode_messages() {
        assert_eq!(Mode::Encrypt.progress_message(), "Encrypting...");
        assert_eq!(Mode::Decrypt.progress_message(), "Decrypting...");
        assert_eq!(Mode::Encrypt.success_message(), "Encrypted successfully.");
        assert_eq!(Mode::Decrypt.success_message(), "Decrypted successfully.");
    }

    #[test]
    fn test_blank_input_encrypt() {
        let err = validate("   \n\t", "pw", Mode::Encrypt).unwrap_err();
        assert_eq!(err.message(), ENTER_PLAINTEXT);
        assert_eq!(err.kind, Some(ErrorKind::Validation));
    }

    #[test]
    fn test_blank_input_decrypt() {
        let err = validate("", "pw", Mode::Decrypt).unwrap_err();
        assert_eq!(err.message(), ENTER_CIPHERTEXT);
    }

    #[test]
    fn test_input_checked_before_password() {
        for mode in [Mode::Encrypt, Mode::Decrypt] {
            let err = validate(" ", " ", mode).unwrap_err();
            assert_ne!(err.message(), ENTER_PASSWORD, "mode {mode}");
        }
    }

    #[test]
    fn test_blank_password() {
        for mode in [Mode::Encrypt, Mode::Decrypt] {
            let err = validate("hello", "  ", mode).unwrap_err();
            assert_eq!(err.message(), ENTER_PASSWORD);
        }
    }

    #[test]
    fn test_input_trimmed_password_raw() {
        let request = validate("  hello \n", " pw123 ", Mode::Encrypt).unwrap();
        assert_eq!(request.input(), "hello");
        assert_eq!(request.password(), " pw123 ");
        assert_eq!(request.mode(), Mode::Encrypt);
    }

    #[test]
    fn test_debug_omits_password() {
        let request = validate("hello", "hunter2", Mode::Decrypt).unwrap();
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("hello"));
    }
}
