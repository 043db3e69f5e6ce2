//! CLI integration tests
//!
//! Drives the cipherpad binary end-to-end with the password on stdin.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run cipherpad with the password fed through stdin
fn run_with_passphrase(args: &[&str], passphrase: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cipherpad"))
        .arg("--passphrase-stdin")
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        // The process may exit before reading stdin, e.g. on a missing input file.
        let _ = stdin.write_all(passphrase.as_bytes());
    }

    child.wait_with_output().unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn encrypt_file(dir: &TempDir, plaintext: &str, passphrase: &str) -> std::path::PathBuf {
    encrypt_file_with(dir, &[], plaintext, passphrase)
}

fn encrypt_file_with(
    dir: &TempDir,
    extra: &[&str],
    plaintext: &str,
    passphrase: &str,
) -> std::path::PathBuf {
    let input = dir.path().join("plain.txt");
    let output = dir.path().join("cipher.txt");
    fs::write(&input, plaintext).unwrap();

    let mut args = extra.to_vec();
    args.extend(["encrypt", "-i", path_str(&input), "-o", path_str(&output)]);
    let result = run_with_passphrase(&args, passphrase);
    assert!(result.status.success(), "encrypt failed: {}", stderr_of(&result));
    output
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file(&temp_dir, "hello", "pw123");

    let armored = fs::read_to_string(&ciphertext).unwrap();
    assert!(armored.starts_with("-----BEGIN PGP MESSAGE-----"));
    assert!(!armored.contains("hello"));

    let decrypted = temp_dir.path().join("decrypted.txt");
    let result = run_with_passphrase(
        &["decrypt", "-i", path_str(&ciphertext), "-o", path_str(&decrypted)],
        "pw123",
    );
    assert!(result.status.success(), "decrypt failed: {}", stderr_of(&result));
    assert_eq!(fs::read_to_string(&decrypted).unwrap(), "hello");
    assert!(stderr_of(&result).contains("Decrypted successfully."));
}

#[test]
fn test_cipherpad_engine_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file_with(&temp_dir, &["--engine", "cipherpad"], "hello", "pw123");
    let armored = fs::read_to_string(&ciphertext).unwrap();
    assert!(armored.starts_with("-----BEGIN CIPHERPAD MESSAGE-----"));

    let result = run_with_passphrase(
        &["--engine", "cipherpad", "decrypt", "-i", path_str(&ciphertext)],
        "pw123",
    );
    assert!(result.status.success(), "decrypt failed: {}", stderr_of(&result));
    assert_eq!(String::from_utf8_lossy(&result.stdout), "hello");
}

#[test]
fn test_engines_do_not_read_each_other() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file_with(&temp_dir, &["--engine", "cipherpad"], "hello", "pw");

    let result = run_with_passphrase(&["decrypt", "-i", path_str(&ciphertext)], "pw");
    assert!(!result.status.success());
    assert!(
        stderr_of(&result)
            .contains("Input does not look like valid armored OpenPGP ciphertext.")
    );
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file(&temp_dir, "  padded text \n\n", "pw");

    let decrypted = temp_dir.path().join("decrypted.txt");
    let result = run_with_passphrase(
        &["d", "-i", path_str(&ciphertext), "-o", path_str(&decrypted)],
        "pw",
    );
    assert!(result.status.success(), "decrypt failed: {}", stderr_of(&result));
    assert_eq!(fs::read_to_string(&decrypted).unwrap(), "padded text");
}

#[test]
fn test_output_defaults_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file(&temp_dir, "to stdout", "pw");

    let result = run_with_passphrase(&["decrypt", "-i", path_str(&ciphertext)], "pw");
    assert!(result.status.success(), "decrypt failed: {}", stderr_of(&result));
    assert_eq!(String::from_utf8_lossy(&result.stdout), "to stdout");
}

#[test]
fn test_blank_input_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("blank.txt");
    let output = temp_dir.path().join("out.txt");
    fs::write(&input, "   \n\t").unwrap();

    let result = run_with_passphrase(
        &["encrypt", "-i", path_str(&input), "-o", path_str(&output)],
        "pw",
    );
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("Enter plaintext to encrypt."));
    assert!(!output.exists());
}

#[test]
fn test_blank_password_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("plain.txt");
    fs::write(&input, "hello").unwrap();

    let result = run_with_passphrase(&["encrypt", "-i", path_str(&input)], "  ");
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("Enter a password before continuing."));
    assert!(result.stdout.is_empty());
}

#[test]
fn test_wrong_password() {
    let temp_dir = TempDir::new().unwrap();
    let ciphertext = encrypt_file(&temp_dir, "hello", "right");
    let output = temp_dir.path().join("out.txt");

    let result = run_with_passphrase(
        &["decrypt", "-i", path_str(&ciphertext), "-o", path_str(&output)],
        "wrong",
    );
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains(
        "Decryption failed. Check that the ciphertext is valid and the password is correct."
    ));
    assert!(!output.exists());
}

#[test]
fn test_garbage_ciphertext() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("garbage.txt");
    fs::write(&input, "this is not a message").unwrap();

    let result = run_with_passphrase(&["decrypt", "-i", path_str(&input)], "pw");
    assert!(!result.status.success());
    assert!(
        stderr_of(&result)
            .contains("Input does not look like valid armored OpenPGP ciphertext.")
    );
}

#[test]
fn test_nonexistent_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");

    let result = run_with_passphrase(
        &[
            "encrypt",
            "-i",
            path_str(&temp_dir.path().join("missing.txt")),
            "-o",
            path_str(&output),
        ],
        "pw",
    );
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("failed to read from"));
    assert!(!output.exists());
}

#[test]
fn test_passphrase_stdin_needs_input_file() {
    let result = run_with_passphrase(&["encrypt"], "pw");
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("--passphrase-stdin needs --input"));
}
