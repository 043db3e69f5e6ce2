//! Sealing using scrypt + XSalsa20Poly1305
//!
//! - scrypt derives a 32-byte key from the password and a random salt
//! - NaCl secretbox (XSalsa20Poly1305) seals the plaintext
//!
//! The packet layout is:
//! - version: 1 byte (currently 1)
//! - salt: 8 bytes
//! - nonce: 24 bytes
//! - length: 8 bytes (big-endian signed int64)
//! - sealed box: variable length (includes 16-byte Poly1305 MAC)
//!
//! Error messages on the open path say "packet" for layout problems and
//! "session key decryption failed" for authentication failures.

use std::mem::size_of;

use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Nonce, XSalsa20Poly1305};
use rand::RngCore;
use rand::rngs::OsRng;
use scrypt::{Params, scrypt};
use zeroize::Zeroizing;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

/// Packet version written by this implementation
pub const VERSION: u8 = 1;

/// Length of salt in bytes
pub const SALT_LEN: usize = 8;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 24;

const KEY_LEN: usize = 32;

/// scrypt log2(N) (N = 32768)
const SCRYPT_LOG_N: u8 = 15;

const SCRYPT_R: u32 = 8;

const SCRYPT_P: u32 = 1;

fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN).map_err(|e| {
        CipherpadError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::ScryptFailure,
            format!("failed to create scrypt params: {}", e),
        )
    })?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt(password, salt, &params, &mut key[..]).map_err(|e| {
        CipherpadError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::ScryptFailure,
            format!("scrypt key derivation failed: {}", e),
        )
    })?;

    Ok(key)
}

/// Seal plaintext with a password using random salt and nonce
pub fn seal(password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    seal_deterministic(password, plaintext, &salt, &nonce)
}

/// Seal plaintext with caller-provided salt and nonce.
///
/// Only for known-answer tests. Reusing a nonce under the same key breaks
/// the cipher; everything else must go through `seal`.
pub fn seal_deterministic(
    password: &[u8],
    plaintext: &[u8],
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    let key = derive_key(password, salt)?;
    let cipher = XSalsa20Poly1305::new(&(*key).into());

    let sealed_box = cipher
        .encrypt(&Nonce::from(*nonce), plaintext)
        .map_err(|e| {
            CipherpadError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::SecretboxFailure,
                format!("encryption failed: {}", e),
            )
        })?;

    let sealed_box_len = sealed_box.len() as i64;
    let mut packet =
        Vec::with_capacity(1 + SALT_LEN + NONCE_LEN + size_of::<i64>() + sealed_box.len());
    packet.push(VERSION);
    packet.extend_from_slice(salt);
    packet.extend_from_slice(nonce);
    packet.extend_from_slice(&sealed_box_len.to_be_bytes());
    packet.extend_from_slice(&sealed_box);

    Ok(packet)
}

/// Splits a packet into its fields without touching the password.
struct Packet<'a> {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    sealed_box: &'a [u8],
}

fn truncated(what: &str) -> CipherpadError {
    CipherpadError::with_kind(
        ErrorCategory::User,
        ErrorKind::TruncatedInput,
        format!("malformed packet: input truncated while reading {}", what),
    )
}

fn bad_layout(msg: &str) -> CipherpadError {
    CipherpadError::with_kind(
        ErrorCategory::User,
        ErrorKind::BinaryFormat,
        format!("malformed packet: {}", msg),
    )
}

fn take<'a>(input: &'a [u8], pos: &mut usize, len: usize, what: &str) -> Result<&'a [u8]> {
    let end = pos.checked_add(len).ok_or_else(|| truncated(what))?;
    let slice = input.get(*pos..end).ok_or_else(|| truncated(what))?;
    *pos = end;
    Ok(slice)
}

fn parse(packet: &[u8]) -> Result<Packet<'_>> {
    let mut pos = 0;

    let version = take(packet, &mut pos, 1, "version")?[0];
    if version != VERSION {
        return Err(bad_layout(&format!("unsupported version {}", version)));
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(take(packet, &mut pos, SALT_LEN, "salt")?);

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(take(packet, &mut pos, NONCE_LEN, "nonce")?);

    let mut length_bytes = [0u8; 8];
    length_bytes.copy_from_slice(take(packet, &mut pos, size_of::<i64>(), "length")?);
    let sealed_box_len = i64::from_be_bytes(length_bytes);

    if sealed_box_len < 0 {
        return Err(bad_layout(
            "negative sealed box length (when interpreted as a big-endian i64)",
        ));
    }

    // *Valid* input can fail this check if the platform's isize is small.
    let sealed_box_len = usize::try_from(sealed_box_len)
        .ok()
        .filter(|len| *len <= isize::MAX as usize)
        .ok_or_else(|| bad_layout("sealed box length exceeds this system's max isize"))?;

    if sealed_box_len > packet.len() - pos {
        return Err(CipherpadError::with_kind(
            ErrorCategory::User,
            ErrorKind::TruncatedInput,
            "malformed packet: claimed length greater than available input",
        ));
    }
    let sealed_box = take(packet, &mut pos, sealed_box_len, "sealed box")?;

    if pos < packet.len() {
        return Err(CipherpadError::with_kind(
            ErrorCategory::User,
            ErrorKind::TrailingData,
            "malformed packet: unexpected data after sealed box",
        ));
    }

    Ok(Packet {
        salt,
        nonce,
        sealed_box,
    })
}

/// Open a packet produced by `seal`
pub fn open(password: &[u8], packet: &[u8]) -> Result<Vec<u8>> {
    let packet = parse(packet)?;

    let key = derive_key(password, &packet.salt)?;
    let cipher = XSalsa20Poly1305::new(&(*key).into());
    cipher
        .decrypt(&Nonce::from(packet.nonce), packet.sealed_box)
        .map_err(|_| {
            CipherpadError::with_kind(
                ErrorCategory::User,
                ErrorKind::AuthenticationFailed,
                "session key decryption failed: bad password, corrupt input, or tampered-with data",
            )
        })
}
