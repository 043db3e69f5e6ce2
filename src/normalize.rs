//! Maps raw failure messages to the short set of messages users see.
//!
//! Classification is keyword sniffing over the lowercased message: the rules
//! below are tried in order and the first match wins. It is lossy on
//! purpose; a library that grows structured error codes can replace the
//! table without touching the controller.

use std::borrow::Cow;

use crate::validate::Mode;

pub const DECRYPT_CHECK_PASSWORD: &str =
    "Decryption failed. Check that the ciphertext is valid and the password is correct.";
pub const NOT_ARMORED: &str = "Input does not look like valid armored OpenPGP ciphertext.";
pub const ENCRYPT_LIBRARY_ERROR: &str = "Encryption failed due to an OpenPGP.js error.";
pub const ENCRYPT_GENERIC: &str = "Encryption failed. Please try again.";
pub const DECRYPT_GENERIC: &str = "Decryption failed. Please try again.";

/// Phrases that identify a validation message, which is shown verbatim.
const VALIDATION_PHRASES: &[&str] = &[
    "enter plaintext",
    "enter armored ciphertext",
    "enter a password",
];

struct Rule {
    mode: Mode,
    keywords: &'static [&'static str],
    message: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        mode: Mode::Decrypt,
        keywords: &["session key decryption failed", "password", "decrypt", "checksum"],
        message: DECRYPT_CHECK_PASSWORD,
    },
    Rule {
        mode: Mode::Decrypt,
        keywords: &["armored", "parse", "packet", "format"],
        message: NOT_ARMORED,
    },
    Rule {
        mode: Mode::Encrypt,
        keywords: &["openpgp"],
        message: ENCRYPT_LIBRARY_ERROR,
    },
];

impl Rule {
    fn matches(&self, lowered: &str, mode: Mode) -> bool {
        self.mode == mode && self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Returns the user-facing message for a failure raised while running `mode`.
pub fn normalize(raw: &str, mode: Mode) -> Cow<'_, str> {
    let lowered = raw.to_lowercase();

    if VALIDATION_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Cow::Borrowed(raw);
    }

    let message = RULES
        .iter()
        .find(|rule| rule.matches(&lowered, mode))
        .map(|rule| rule.message)
        .unwrap_or(match mode {
            Mode::Encrypt => ENCRYPT_GENERIC,
            Mode::Decrypt => DECRYPT_GENERIC,
        });

    Cow::Borrowed(message)
}
