//! Built-in libraries behind [`CryptoLibrary`](crate::CryptoLibrary).
//!
//! [`OpenPgpLibrary`] speaks password-encrypted OpenPGP messages.
//! [`SecretboxLibrary`] seals scrypt + XSalsa20Poly1305 packets in its own
//! armor. Key derivation is deliberately slow in both, so the work runs on
//! tokio's blocking pool and the event loop keeps serving other events.

pub mod armor;
pub mod openpgp;
pub mod secretbox;
pub mod secretcrypt;

use zeroize::Zeroizing;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};
use crate::library::Format;

pub use openpgp::OpenPgpLibrary;
pub use secretbox::SecretboxLibrary;

/// Exactly one password is supported; copies it out so it can move to the
/// blocking pool.
pub(crate) fn single_password(passwords: &[&str]) -> Result<Zeroizing<String>> {
    match passwords {
        [password] => Ok(Zeroizing::new((*password).to_owned())),
        _ => Err(CipherpadError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::Operation,
            format!("expected exactly one password, got {}", passwords.len()),
        )),
    }
}

pub(crate) fn unsupported_format(format: Format, action: &str) -> CipherpadError {
    CipherpadError::with_kind(
        ErrorCategory::Internal,
        ErrorKind::Operation,
        format!("{:?} output is not supported when {}", format, action),
    )
}

pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        CipherpadError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "library worker task failed",
            e,
        )
    })?
}
