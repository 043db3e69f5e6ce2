//! Reading input text and writing output for the command-line host.
//!
//! A path of `-` means stdin (for input) or stdout (for output).

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{CipherpadError, ErrorCategory, ErrorKind, Result};

pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Reads UTF-8 text from a file, or from stdin for `-`.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = if is_stdio(path) {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(|e| {
            CipherpadError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to read from stdin",
                e,
            )
        })?;
        buf
    } else {
        fs::read(path).map_err(|e| read_error(path, e))?
    };

    String::from_utf8(bytes).map_err(|e| {
        CipherpadError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidUtf8,
            format!("{} is not valid UTF-8 text", path.display()),
            e,
        )
    })
}

/// Writes text to a file (mode 0o600 on Unix), or to stdout for `-`.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        return stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| {
                CipherpadError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to write to stdout",
                    e,
                )
            });
    }
    write_file_secure(path, text.as_bytes())
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    let file = {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
    };

    #[cfg(not(unix))]
    let file = fs::File::create(path);

    let mut file = file.map_err(|e| {
        CipherpadError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to open {}", path.display()),
            e,
        )
    })?;

    file.write_all(contents).map_err(|e| {
        CipherpadError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to write {}", path.display()),
            e,
        )
    })
}

fn read_error(path: &Path, err: io::Error) -> CipherpadError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    CipherpadError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_text(&path, "héllo\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "héllo\n");
    }

    #[test]
    fn test_overwrite_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_text(&path, "a much longer first version").unwrap();
        write_text(&path, "short").unwrap();
        assert_eq!(read_text(&path).unwrap(), "short");
    }

    #[test]
    fn test_missing_file_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_text(&temp_dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.kind, Some(ErrorKind::Io));
    }

    #[test]
    fn test_non_utf8_input() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bin");
        fs::write(&path, [0xffu8, 0xfe]).unwrap();
        let err = read_text(&path).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::InvalidUtf8));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_text(&path, "secret").unwrap();

        let permissions = fs::metadata(&path).unwrap().permissions();
        assert_eq!(permissions.mode() & 0o777, 0o600);
    }

    #[test]
    fn test_dash_is_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("./-")));
    }
}
