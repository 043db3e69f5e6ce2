//! Session flags owned by the controller.

/// Whether an action is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
}

/// The busy flag and the password visibility flag.
///
/// Starts idle with the password hidden. The busy flag is the only guard
/// against overlapping actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    busy: bool,
    secret_visible: bool,
}

impl Session {
    pub fn phase(&self) -> Phase {
        if self.busy { Phase::Busy } else { Phase::Idle }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn secret_visible(&self) -> bool {
        self.secret_visible
    }

    /// Moves Idle -> Busy. Returns false, changing nothing, when already busy.
    pub(crate) fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub(crate) fn finish(&mut self) {
        self.busy = false;
    }

    pub(crate) fn set_secret_visible(&mut self, visible: bool) {
        self.secret_visible = visible;
    }
}
