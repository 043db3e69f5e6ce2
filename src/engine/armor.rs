//! Text armor for sealed packets
//!
//! ```text
//! -----BEGIN CIPHERPAD MESSAGE-----
//!
//! <standard base64, 64 columns per line>
//! -----END CIPHERPAD MESSAGE-----
//! ```
//!
//! The body is standard base64 wrapped at 64 columns. Unwrapping tolerates
//! surrounding whitespace, CRLF line endings and blank lines, but nothing
//! may follow the footer.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

pub const BEGIN: &str = "-----BEGIN CIPHERPAD MESSAGE-----";
pub const END: &str = "-----END CIPHERPAD MESSAGE-----";

const LINE_WIDTH: usize = 64;

/// Wrap bytes in an armor block, returning the armored string
pub fn wrap(body: &[u8]) -> String {
    let encoded = STANDARD.encode(body);

    let mut armored = String::with_capacity(BEGIN.len() + END.len() + encoded.len() * 65 / 64 + 4);
    armored.push_str(BEGIN);
    armored.push_str("\n\n");
    // base64 output is ASCII, so any byte offset is a char boundary.
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        armored.push_str(line);
        armored.push('\n');
        rest = tail;
    }
    armored.push_str(END);
    armored.push('\n');
    armored
}

fn invalid(msg: &str) -> CipherpadError {
    CipherpadError::with_kind(
        ErrorCategory::User,
        ErrorKind::ArmoringInvalid,
        format!("invalid armored message: {}", msg),
    )
}

/// Unwrap an armor block, returning the original bytes
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    let mut lines = armored.trim().lines().map(str::trim);

    match lines.next() {
        Some(BEGIN) => {}
        Some(line) if line.starts_with("-----BEGIN ") => {
            return Err(invalid("unrecognized header line"));
        }
        _ => return Err(invalid("missing header line")),
    }

    let mut body = String::new();
    let mut saw_end = false;
    for line in lines.by_ref() {
        if line == END {
            saw_end = true;
            break;
        }
        body.push_str(line);
    }

    if !saw_end {
        return Err(invalid("missing footer line"));
    }
    if lines.any(|line| !line.is_empty()) {
        return Err(invalid("unexpected data after footer line"));
    }
    if body.is_empty() {
        return Err(invalid("empty body"));
    }

    STANDARD.decode(body.as_bytes()).map_err(|e| {
        CipherpadError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::ArmoringDecode,
            format!("could not parse armored body: {}", e),
            e,
        )
    })
}
