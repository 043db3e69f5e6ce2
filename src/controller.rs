//! The action orchestrator.
//!
//! One controller backs one form. Every method takes `&self` so a host can
//! deliver a new event while an action is suspended inside the library;
//! the busy flag turns such overlapping triggers into no-ops. State lives
//! in a `RefCell` and no borrow is held across an await.

use std::cell::RefCell;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::clipboard::Clipboard;
use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};
use crate::form::{Field, Form};
use crate::library::{CryptoLibrary, DecryptOptions, EncryptOptions, Format};
use crate::normalize::normalize;
use crate::session::{Phase, Session};
use crate::status::{Severity, Status};
use crate::validate::{Mode, OperationRequest, validate};
use crate::visibility;

pub const READY: &str = "Ready.";
pub const LIBRARY_UNAVAILABLE: &str =
    "Encryption library failed to load. Check your installation and try again.";
pub const NOTHING_TO_COPY: &str = "Nothing to copy yet.";
pub const CLIPBOARD_UNAVAILABLE: &str = "Clipboard API is unavailable in this context.";
pub const COPY_FAILED: &str = "Could not copy output. Try selecting and copying manually.";
pub const COPIED: &str = "Output copied to clipboard.";

/// Something the host UI reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InputChanged(String),
    PasswordChanged(String),
    ToggleSecret,
    Encrypt,
    Decrypt,
    Copy,
    Clear,
}

/// What handling an event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Dropped: the controller was busy or the control disabled.
    Ignored,
    /// Form state changed without a new status message.
    Updated,
    /// A status message with this severity was reported.
    Reported(Severity),
}

struct State {
    session: Session,
    form: Form,
}

pub struct Controller<L, C> {
    library: Option<L>,
    clipboard: C,
    state: RefCell<State>,
}

/// Leaves Busy when dropped, whichever way the action ends.
struct BusyGuard<'a> {
    state: &'a RefCell<State>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.session.finish();
        state.form.controls.set_enabled(true);
        debug!("controller idle");
    }
}

impl<L: CryptoLibrary, C: Clipboard> Controller<L, C> {
    /// Builds a controller in its startup state.
    ///
    /// `library` is `None` when the host could not load one; actions then
    /// report that instead of running.
    pub fn new(library: Option<L>, clipboard: C) -> Self {
        let mut form = Form::new();
        visibility::set_secret_visibility(&mut form, false);
        visibility::refresh(&mut form);
        form.status = Status::info(READY);
        form.focus = Some(Field::Input);

        Self {
            library,
            clipboard,
            state: RefCell::new(State {
                session: Session::default(),
                form,
            }),
        }
    }

    /// A copy of the form for the host to render.
    pub fn snapshot(&self) -> Form {
        self.state.borrow().form.clone()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().session.is_busy()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.form.input = text.into();
        visibility::refresh(&mut state.form);
    }

    pub fn set_password(&self, text: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.form.password = Zeroizing::new(text.into());
        visibility::refresh(&mut state.form);
    }

    pub fn toggle_secret_visibility(&self) {
        let mut state = self.state.borrow_mut();
        let visible = !state.session.secret_visible();
        state.session.set_secret_visible(visible);
        visibility::set_secret_visibility(&mut state.form, visible);
    }

    fn report(&self, status: Status) {
        self.state.borrow_mut().form.status = status;
    }

    fn render_output(&self, text: String) {
        let mut state = self.state.borrow_mut();
        state.form.output = text;
        visibility::refresh(&mut state.form);
    }

    /// Idle -> Busy. `None` if an action is already running.
    fn enter_busy(&self, mode: Mode) -> Option<BusyGuard<'_>> {
        let mut state = self.state.borrow_mut();
        if !state.session.try_begin() {
            return None;
        }
        state.form.controls.set_enabled(false);
        state.form.status = Status::info(mode.progress_message());
        debug!(%mode, "controller busy");
        Some(BusyGuard { state: &self.state })
    }

    /// Runs one encrypt or decrypt action to completion.
    pub async fn run_action(&self, mode: Mode) -> Outcome {
        if self.is_busy() {
            debug!(%mode, "action ignored while busy");
            return Outcome::Ignored;
        }

        let Some(library) = self.library.as_ref() else {
            let err = CipherpadError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::LibraryUnavailable,
                LIBRARY_UNAVAILABLE,
            );
            warn!(%mode, kind = ?err.kind, "no crypto library loaded");
            self.report(Status::error(err.message()));
            return Outcome::Reported(Severity::Error);
        };

        let Some(_busy) = self.enter_busy(mode) else {
            return Outcome::Ignored;
        };

        let (input, password) = {
            let state = self.state.borrow();
            (state.form.input.clone(), state.form.password.clone())
        };

        let status = match perform(library, &input, &password, mode).await {
            Ok(output) => {
                info!(%mode, output_len = output.len(), "action succeeded");
                self.render_output(output);
                Status::success(mode.success_message())
            }
            Err(err) => {
                warn!(%mode, kind = ?err.kind, error = %err, "action failed");
                Status::error(normalize(err.message(), mode))
            }
        };

        let severity = status.severity.unwrap_or(Severity::Info);
        self.report(status);
        Outcome::Reported(severity)
    }

    pub async fn encrypt(&self) -> Outcome {
        self.run_action(Mode::Encrypt).await
    }

    pub async fn decrypt(&self) -> Outcome {
        self.run_action(Mode::Decrypt).await
    }

    /// Copies the output to the clipboard, reporting the result as status.
    /// Ignored while busy, like the disabled copy control.
    pub async fn copy_output(&self) -> Outcome {
        if self.is_busy() {
            debug!("copy ignored while busy");
            return Outcome::Ignored;
        }
        let output = self.state.borrow().form.output.clone();

        let status = if output.is_empty() {
            Status::error(NOTHING_TO_COPY)
        } else if !self.clipboard.is_available() {
            Status::error(CLIPBOARD_UNAVAILABLE)
        } else {
            match self.clipboard.write_text(&output).await {
                Ok(()) => Status::success(COPIED),
                Err(err) => {
                    warn!(error = %err, "clipboard write failed");
                    Status::error(COPY_FAILED)
                }
            }
        };

        let severity = status.severity.unwrap_or(Severity::Info);
        self.report(status);
        Outcome::Reported(severity)
    }

    /// Empties every field and the status, and hides the password again.
    pub fn clear_all(&self) -> Outcome {
        let mut state = self.state.borrow_mut();
        if state.session.is_busy() {
            return Outcome::Ignored;
        }

        let state = &mut *state;
        state.form.input.clear();
        state.form.password = Zeroizing::new(String::new());
        state.session.set_secret_visible(false);
        visibility::set_secret_visibility(&mut state.form, false);
        state.form.output.clear();
        state.form.status = Status::cleared();
        state.form.focus = Some(Field::Input);
        visibility::refresh(&mut state.form);
        Outcome::Updated
    }

    /// Handles one host event. Clicks on a disabled control are dropped.
    pub async fn dispatch(&self, event: Event) -> Outcome {
        let controls = *self.state.borrow().form.controls();
        match event {
            Event::InputChanged(text) => {
                self.set_input(text);
                Outcome::Updated
            }
            Event::PasswordChanged(text) => {
                self.set_password(text);
                Outcome::Updated
            }
            Event::ToggleSecret => {
                self.toggle_secret_visibility();
                Outcome::Updated
            }
            Event::Encrypt if controls.encrypt.enabled => self.encrypt().await,
            Event::Decrypt if controls.decrypt.enabled => self.decrypt().await,
            Event::Copy if controls.copy.enabled => self.copy_output().await,
            Event::Clear if controls.clear.enabled => self.clear_all(),
            Event::Encrypt | Event::Decrypt | Event::Copy | Event::Clear => Outcome::Ignored,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().session.phase()
    }
}

/// Validated request -> library call -> output text.
async fn perform<L: CryptoLibrary>(
    library: &L,
    input: &str,
    password: &str,
    mode: Mode,
) -> Result<String> {
    let request = validate(input, password, mode)?;
    match request.mode() {
        Mode::Encrypt => encrypt_request(library, &request).await,
        Mode::Decrypt => decrypt_request(library, &request).await,
    }
}

async fn encrypt_request<L: CryptoLibrary>(
    library: &L,
    request: &OperationRequest,
) -> Result<String> {
    let passwords = [request.password()];
    let message = library.create_message(request.input()).await?;
    library
        .encrypt(EncryptOptions {
            message,
            passwords: &passwords,
            format: Format::Armored,
        })
        .await?
        .into_text()
}

async fn decrypt_request<L: CryptoLibrary>(
    library: &L,
    request: &OperationRequest,
) -> Result<String> {
    let passwords = [request.password()];
    let message = library.read_message(request.input()).await?;
    let decrypted = library
        .decrypt(DecryptOptions {
            message,
            passwords: &passwords,
            format: Format::Utf8,
        })
        .await?;
    decrypted.data.into_text()
}
