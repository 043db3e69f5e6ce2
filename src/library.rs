//! The cryptographic library capability consumed by the controller.
//!
//! The controller never touches keys or packets itself. It builds a message
//! from text, asks the library to encrypt it for a list of passwords, and
//! does the reverse for armored input.

use async_trait::async_trait;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

/// Output encoding requested from the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// ASCII-armored ciphertext.
    Armored,
    /// UTF-8 text.
    Utf8,
    /// Raw bytes.
    Binary,
}

/// Data handed back by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Text(String),
    Binary(Vec<u8>),
}

impl Data {
    /// Unwraps text data; binary data means the library ignored the
    /// requested format.
    pub fn into_text(self) -> Result<String> {
        match self {
            Data::Text(text) => Ok(text),
            Data::Binary(bytes) => Err(CipherpadError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::Operation,
                format!(
                    "library returned {} bytes of binary data where text was requested",
                    bytes.len()
                ),
            )),
        }
    }
}

pub struct EncryptOptions<'a, M> {
    pub message: M,
    pub passwords: &'a [&'a str],
    pub format: Format,
}

pub struct DecryptOptions<'a, M> {
    pub message: M,
    pub passwords: &'a [&'a str],
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted {
    pub data: Data,
}

/// Password-based symmetric encryption, as provided by an external library.
///
/// Implementations run on the controller's single thread, so neither the
/// trait nor its futures need to be `Send`.
#[async_trait(?Send)]
pub trait CryptoLibrary {
    /// Library-specific handle for a parsed or constructed message.
    type Message;

    /// Wraps plaintext in a message ready for encryption.
    async fn create_message(&self, text: &str) -> Result<Self::Message>;

    async fn encrypt(&self, options: EncryptOptions<'_, Self::Message>) -> Result<Data>;

    /// Parses armored ciphertext into a message ready for decryption.
    async fn read_message(&self, armored: &str) -> Result<Self::Message>;

    async fn decrypt(&self, options: DecryptOptions<'_, Self::Message>) -> Result<Decrypted>;
}
