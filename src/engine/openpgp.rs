//! Password-encrypted OpenPGP messages, through rPGP.
//!
//! Encryption writes a literal data packet under a symmetric-key encrypted
//! session key (iterated and salted S2K, AES-256). Decryption accepts any
//! armored `PGP MESSAGE` that a single password opens.

use async_trait::async_trait;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::ser::Serialize;
use pgp::types::StringToKey;
use pgp::{Deserializable, Message};
use tracing::debug;

use super::{run_blocking, single_password, unsupported_format};
use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};
use crate::library::{CryptoLibrary, Data, DecryptOptions, Decrypted, EncryptOptions, Format};

const CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

#[derive(Debug, Default, Clone, Copy)]
pub struct OpenPgpLibrary;

impl OpenPgpLibrary {
    pub fn new() -> Self {
        Self
    }
}

/// rPGP errors are flattened into the message text, prefixed so the
/// normalizer can tell a bad password from unreadable input.
fn pgp_error(kind: ErrorKind, context: &str, err: pgp::errors::Error) -> CipherpadError {
    CipherpadError::with_kind(ErrorCategory::User, kind, format!("{}: {}", context, err))
}

#[async_trait(?Send)]
impl CryptoLibrary for OpenPgpLibrary {
    type Message = Message;

    async fn create_message(&self, text: &str) -> Result<Message> {
        Ok(Message::new_literal("", text))
    }

    async fn encrypt(&self, options: EncryptOptions<'_, Message>) -> Result<Data> {
        if options.format == Format::Utf8 {
            return Err(unsupported_format(options.format, "encrypting"));
        }
        let password = single_password(options.passwords)?;
        let message = options.message;
        let format = options.format;

        debug!("encrypting openpgp message");
        run_blocking(move || {
            let mut rng = rand::thread_rng();
            let s2k = StringToKey::new_default(&mut rng);
            let encrypted = message
                .encrypt_with_password_seipdv1(&mut rng, s2k, CIPHER, || password.to_string())
                .map_err(|e| pgp_error(ErrorKind::Operation, "openpgp encryption failed", e))?;

            let data = match format {
                Format::Binary => Data::Binary(encrypted.to_bytes().map_err(|e| {
                    pgp_error(ErrorKind::Operation, "openpgp serialization failed", e)
                })?),
                _ => Data::Text(encrypted.to_armored_string(Default::default()).map_err(
                    |e| pgp_error(ErrorKind::Operation, "openpgp armoring failed", e),
                )?),
            };
            Ok(data)
        })
        .await
    }

    async fn read_message(&self, armored: &str) -> Result<Message> {
        let (message, _headers) = Message::from_string(armored)
            .map_err(|e| pgp_error(ErrorKind::ArmoringInvalid, "invalid armored message", e))?;
        Ok(message)
    }

    async fn decrypt(&self, options: DecryptOptions<'_, Message>) -> Result<Decrypted> {
        if options.format == Format::Armored {
            return Err(unsupported_format(options.format, "opening"));
        }
        let password = single_password(options.passwords)?;
        let message = options.message;

        debug!("decrypting openpgp message");
        let content = run_blocking(move || {
            let decrypted = message
                .decrypt_with_password(|| password.to_string())
                .map_err(|e| {
                    pgp_error(ErrorKind::AuthenticationFailed, "session key decryption failed", e)
                })?;
            decrypted
                .get_content()
                .map_err(|e| {
                    pgp_error(ErrorKind::AuthenticationFailed, "session key decryption failed", e)
                })?
                .ok_or_else(|| {
                    CipherpadError::with_kind(
                        ErrorCategory::User,
                        ErrorKind::BinaryFormat,
                        "malformed packet: message carries no literal data",
                    )
                })
        })
        .await?;

        let data = match options.format {
            Format::Binary => Data::Binary(content),
            _ => Data::Text(String::from_utf8(content).map_err(|e| {
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
