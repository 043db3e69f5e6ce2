//! scrypt + XSalsa20Poly1305 packets in a `CIPHERPAD MESSAGE` armor.

use async_trait::async_trait;
use tracing::debug;

use super::{armor, run_blocking, secretcrypt, single_password, unsupported_format};
use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};
use crate::library::{CryptoLibrary, Data, DecryptOptions, Decrypted, EncryptOptions, Format};

/// Message handle for [`SecretboxLibrary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Plaintext waiting to be sealed.
    Literal(String),
    /// A parsed packet waiting to be opened.
    Sealed(Vec<u8>),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SecretboxLibrary;

impl SecretboxLibrary {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl CryptoLibrary for SecretboxLibrary {
    type Message = Message;

    async fn create_message(&self, text: &str) -> Result<Message> {
        Ok(Message::Literal(text.to_owned()))
    }

    async fn encrypt(&self, options: EncryptOptions<'_, Message>) -> Result<Data> {
        let Message::Literal(text) = options.message else {
            return Err(CipherpadError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::Operation,
                "only literal text messages can be encrypted",
            ));
        };
        if options.format == Format::Utf8 {
            return Err(unsupported_format(options.format, "encrypting"));
        }
        let password = single_password(options.passwords)?;

        debug!(len = text.len(), "sealing message");
        let packet =
            run_blocking(move || secretcrypt::seal(password.as_bytes(), text.as_bytes())).await?;

        Ok(match options.format {
            Format::Binary => Data::Binary(packet),
            _ => Data::Text(armor::wrap(&packet)),
        })
    }

    async fn read_message(&self, armored: &str) -> Result<Message> {
        armor::unwrap(armored).map(Message::Sealed)
    }

    async fn decrypt(&self, options: DecryptOptions<'_, Message>) -> Result<Decrypted> {
        let Message::Sealed(packet) = options.message else {
            return Err(CipherpadError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::Operation,
                "only sealed messages can be opened",
            ));
        };
        if options.format == Format::Armored {
            return Err(unsupported_format(options.format, "opening"));
        }
        let password = single_password(options.passwords)?;

        debug!(len = packet.len(), "opening message");
        let plaintext =
            run_blocking(move || secretcrypt::open(password.as_bytes(), &packet)).await?;

        let data = match options.format {
            Format::Binary => Data::Binary(plaintext),
            _ => Data::Text(String::from_utf8(plaintext).map_err(|e| {
                CipherpadError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::InvalidUtf8,
                    "decrypted data is not valid UTF-8 text",
                    e,
                )
            })?),
        };
        Ok(Decrypted { data })
    }
}
