//! cipherpad - a headless controller for a password-based encryption pad
//!
//! The host UI forwards events to a [`Controller`] and renders the
//! [`Form`] it hands back. Encryption itself is delegated to a
//! [`CryptoLibrary`]; [`engine::OpenPgpLibrary`] and
//! [`engine::SecretboxLibrary`] are the built-in ones.

#![forbid(unsafe_code)]

pub mod clipboard;
pub mod controller;
pub mod engine;
pub mod error;
pub mod file_ops;
pub mod form;
pub mod library;
pub mod normalize;
pub mod passphrase;
pub mod session;
pub mod status;
pub mod validate;
pub mod visibility;

pub use controller::{Controller, Event, Outcome};
pub use error::{CipherpadError, Result};
pub use form::Form;
pub use library::CryptoLibrary;
pub use status::{Severity, Status};
pub use validate::Mode;
