//! Password masking and show/hide rules for the copy and clear buttons.

use crate::form::{FieldKind, Form, ToggleButton};

/// Switches the password field between masked and clear-text display.
pub fn set_secret_visibility(form: &mut Form, visible: bool) {
    form.password_kind = if visible {
        FieldKind::Text
    } else {
        FieldKind::Password
    };
    form.toggle = ToggleButton {
        label: if visible { "Hide" } else { "Show" },
        aria_pressed: visible,
        aria_label: if visible {
            "Hide password"
        } else {
            "Show password"
        },
    };
}

/// Recomputes which of the copy and clear buttons are shown.
///
/// Copy needs output. Clear needs anything at all: input (ignoring
/// whitespace), a password, or output.
pub fn refresh(form: &mut Form) {
    let has_input = !form.input.trim().is_empty();
    let has_password = !form.password.is_empty();
    let has_output = !form.output.is_empty();

    form.controls.clear.hidden = !(has_input || has_password || has_output);
    form.controls.copy.hidden = !has_output;
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn form_with(input: &str, password: &str, output: &str) -> Form {
        let mut form = Form::new();
        form.input = input.to_owned();
        form.password = Zeroizing::new(password.to_owned());
        form.output = output.to_owned();
        refresh(&mut form);
        form
    }

    #[test]
    fn test_everything_empty_hides_both() {
        let form = form_with("", "", "");
        assert!(form.controls.clear.hidden);
        assert!(form.controls.copy.hidden);
    }

    #[test]
    fn test_any_content_shows_clear() {
        assert!(!form_with("x", "", "").controls.clear.hidden);
        assert!(!form_with("", "x", "").controls.clear.hidden);
        assert!(!form_with("", "", "x").controls.clear.hidden);
    }

    #[test]
    fn test_whitespace_input_does_not_count() {
        assert!(form_with("  \n", "", "").controls.clear.hidden);
    }

    #[test]
    fn test_whitespace_password_counts() {
        assert!(!form_with("", " ", "").controls.clear.hidden);
    }

    #[test]
    fn test_copy_follows_output() {
        assert!(form_with("x", "y", "").controls.copy.hidden);
        assert!(!form_with("", "", "out").controls.copy.hidden);
    }

    #[test]
    fn test_secret_visibility_toggle() {
        let mut form = Form::new();
        set_secret_visibility(&mut form, true);
        assert_eq!(form.password_kind, FieldKind::Text);
        assert_eq!(form.toggle.label, "Hide");
        assert!(form.toggle.aria_pressed);
        assert_eq!(form.toggle.aria_label, "Hide password");

        set_secret_visibility(&mut form, false);
        assert_eq!(form.password_kind, FieldKind::Password);
        assert_eq!(form.toggle.label, "Show");
        assert!(!form.toggle.aria_pressed);
        assert_eq!(form.toggle.aria_label, "Show password");
    }
}
