//! Optional clipboard capability.

use async_trait::async_trait;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

/// A place to copy output text to. Absence is expected and tolerated.
#[async_trait(?Send)]
pub trait Clipboard {
    /// Probes whether a clipboard exists in this context.
    fn is_available(&self) -> bool;

    async fn write_text(&self, text: &str) -> Result<()>;
}

/// A host without any clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

#[async_trait(?Send)]
impl Clipboard for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(CipherpadError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::Clipboard,
            "no clipboard in this context",
        ))
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "clipboard")]
mod system {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use tracing::debug;

    use super::Clipboard;
    use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

    /// The desktop clipboard, through `arboard`.
    ///
    /// On X11 and Wayland the copied text is served by this process and is
    /// gone once the process exits, unless a clipboard manager took it.
    /// [`SystemClipboard::new`] keeps one handle open for as long as the
    /// value lives, which suits a long-running host. A host that exits right
    /// after copying uses [`SystemClipboard::until_replaced`] instead.
    #[derive(Default)]
    pub struct SystemClipboard {
        handle: RefCell<Option<arboard::Clipboard>>,
        wait_until_replaced: bool,
    }

    impl SystemClipboard {
        pub fn new() -> Self {
            Self::default()
        }

        /// `write_text` does not return until another program owns the
        /// clipboard, so the text outlives this process. Only Linux needs
        /// this; elsewhere the system keeps a copy and it behaves as `new`.
        pub fn until_replaced() -> Self {
            Self {
                handle: RefCell::new(None),
                wait_until_replaced: true,
            }
        }

        pub fn waits_until_replaced(&self) -> bool {
            self.wait_until_replaced && HOLDS_SELECTION
        }
    }

    const HOLDS_SELECTION: bool = cfg!(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    ));

    fn open() -> Result<arboard::Clipboard> {
        arboard::Clipboard::new().map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Clipboard,
                "failed to open clipboard",
                e,
            )
        })
    }

    fn write_error(e: arboard::Error) -> CipherpadError {
        CipherpadError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Clipboard,
            "failed to write to clipboard",
            e,
        )
    }

    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    ))]
    async fn set_and_wait(text: String) -> Result<()> {
        use arboard::SetExtLinux;

        tokio::task::spawn_blocking(move || {
            let mut clipboard = open()?;
            clipboard.set().wait().text(text).map_err(write_error)
        })
        .await
        .map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Clipboard,
                "clipboard task failed",
                e,
            )
        })?
    }

    #[cfg(not(all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    )))]
    async fn set_and_wait(text: String) -> Result<()> {
        open()?.set_text(text).map_err(write_error)
    }

    #[async_trait(?Send)]
    impl Clipboard for SystemClipboard {
        fn is_available(&self) -> bool {
            if self.handle.borrow().is_some() {
                return true;
            }
            match open() {
                Ok(_) => true,
                Err(e) => {
                    debug!(error = %e, "system clipboard unavailable");
                    false
                }
            }
        }

        async fn write_text(&self, text: &str) -> Result<()> {
            if self.waits_until_replaced() {
                debug!("holding clipboard selection until replaced");
                return set_and_wait(text.to_owned()).await;
            }

            let mut handle = self.handle.borrow_mut();
            let clipboard = match handle.take() {
                Some(clipboard) => clipboard,
                None => open()?,
            };
            handle
                .insert(clipboard)
                .set_text(text.to_owned())
                .map_err(write_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_clipboard() {
        let clipboard = Unavailable;
        assert!(!clipboard.is_available());
        let err = clipboard.write_text("x").await.unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Clipboard));
    }

    /// Needs a desktop session; the text must still be readable after the
    /// write returns.
    ///
    /// cargo test test_system_clipboard_interactive -- --ignored
    #[cfg(feature = "clipboard")]
    #[tokio::test]
    #[ignore]
    async fn test_system_clipboard_interactive() {
        let clipboard = SystemClipboard::new();
        assert!(clipboard.is_available());
        clipboard.write_text("cipherpad clipboard check").await.unwrap();

        let mut reader = arboard::Clipboard::new().unwrap();
        assert_eq!(reader.get_text().unwrap(), "cipherpad clipboard check");
        assert!(clipboard.is_available());
    }

    #[cfg(feature = "clipboard")]
    #[test]
    fn test_until_replaced_only_waits_where_the_process_serves_the_text() {
        assert!(!SystemClipboard::new().waits_until_replaced());
        let holding = cfg!(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ));
        assert_eq!(SystemClipboard::until_replaced().waits_until_replaced(), holding);
    }
}
