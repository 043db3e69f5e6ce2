//! View model of the host UI surface.
//!
//! The controller owns one `Form` and mutates it in response to events; the
//! host reads a snapshot of it and renders whatever widgets it has.

use std::fmt;

use zeroize::Zeroizing;

use crate::status::Status;

/// How the password field displays its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Masked.
    Password,
    /// Clear text.
    Text,
}

/// Form fields that can hold focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Input,
    Password,
}

/// The show/hide button next to the password field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleButton {
    pub label: &'static str,
    pub aria_pressed: bool,
    pub aria_label: &'static str,
}

/// A button's interactive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub enabled: bool,
    pub hidden: bool,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            enabled: true,
            hidden: false,
        }
    }
}

/// The buttons that trigger actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub encrypt: Control,
    pub decrypt: Control,
    pub copy: Control,
    pub clear: Control,
}

impl Controls {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        for control in [
            &mut self.encrypt,
            &mut self.decrypt,
            &mut self.copy,
            &mut self.clear,
        ] {
            control.enabled = enabled;
        }
    }

    pub fn all_enabled(&self) -> bool {
        self.encrypt.enabled && self.decrypt.enabled && self.copy.enabled && self.clear.enabled
    }
}

#[derive(Clone)]
pub struct Form {
    pub(crate) input: String,
    pub(crate) password: Zeroizing<String>,
    pub(crate) output: String,
    pub(crate) status: Status,
    pub(crate) password_kind: FieldKind,
    pub(crate) toggle: ToggleButton,
    pub(crate) controls: Controls,
    pub(crate) focus: Option<Field>,
}

impl Form {
    pub(crate) fn new() -> Self {
        Self {
            input: String::new(),
            password: Zeroizing::new(String::new()),
            output: String::new(),
            status: Status::cleared(),
            password_kind: FieldKind::Password,
            toggle: ToggleButton {
                label: "Show",
                aria_pressed: false,
                aria_label: "Show password",
            },
            controls: Controls::default(),
            focus: None,
        }
    }

    /// Plaintext or armored ciphertext, as typed.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Result of the most recent successful action, or empty.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn password_kind(&self) -> FieldKind {
        self.password_kind
    }

    pub fn toggle(&self) -> &ToggleButton {
        &self.toggle
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("input_len", &self.input.len())
            .field("password", &"<redacted>")
            .field("output_len", &self.output.len())
            .field("status", &self.status)
            .field("password_kind", &self.password_kind)
            .field("controls", &self.controls)
            .field("focus", &self.focus)
            .finish()
    }
}
