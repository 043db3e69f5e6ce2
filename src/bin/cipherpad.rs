//! cipherpad CLI - password-based text encryption
//!
//! Plays the part of the pad's UI: fills the input and password fields,
//! presses the button, prints the status line to stderr and writes the
//! output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cipherpad::engine::{OpenPgpLibrary, SecretboxLibrary};
use cipherpad::error::{ErrorCategory, ErrorKind};
use cipherpad::file_ops;
use cipherpad::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};
use cipherpad::{CipherpadError, Controller, CryptoLibrary, Mode, Result, Status};

#[cfg(feature = "clipboard")]
type HostClipboard = cipherpad::clipboard::SystemClipboard;
#[cfg(not(feature = "clipboard"))]
type HostClipboard = cipherpad::clipboard::Unavailable;

/// The process exits right after copying, so the clipboard has to hold on
/// to the text until something else takes it.
#[cfg(feature = "clipboard")]
fn host_clipboard() -> HostClipboard {
    HostClipboard::until_replaced()
}

#[cfg(not(feature = "clipboard"))]
fn host_clipboard() -> HostClipboard {
    HostClipboard::default()
}

#[cfg(feature = "clipboard")]
fn waits_for_paste(clipboard: &HostClipboard) -> bool {
    clipboard.waits_until_replaced()
}

#[cfg(not(feature = "clipboard"))]
fn waits_for_paste(_clipboard: &HostClipboard) -> bool {
    false
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Engine {
    /// Password-encrypted OpenPGP messages
    Openpgp,
    /// scrypt + XSalsa20Poly1305 in a CIPHERPAD MESSAGE armor
    Cipherpad,
}

#[derive(Parser)]
#[command(name = "cipherpad")]
#[command(version)]
#[command(about = "Password-based text encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Message format to encrypt to and decrypt from
    #[arg(long, global = true, value_enum, default_value_t = Engine::Openpgp)]
    engine: Engine,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text into an armored message
    #[command(alias = "e")]
    Encrypt(Target),

    /// Decrypt an armored message back into text
    #[command(alias = "d")]
    Decrypt(Target),
}

#[derive(Args)]
struct Target {
    /// File to read the text from, or - for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    input: PathBuf,

    /// File to write the result to, or - for stdout
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    output: PathBuf,

    /// Also copy the result to the clipboard
    #[arg(long)]
    copy: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader::new())
    }
}

fn print_status(status: &Status) {
    if !status.message.is_empty() {
        eprintln!("{}", status);
    }
}

/// Returns whether the final status was something other than an error.
async fn run(cli: Cli) -> Result<bool> {
    let (mode, target) = match cli.command {
        Commands::Encrypt(target) => (Mode::Encrypt, target),
        Commands::Decrypt(target) => (Mode::Decrypt, target),
    };

    if cli.passphrase_stdin && file_ops::is_stdio(&target.input) {
        return Err(CipherpadError::with_kind(
            ErrorCategory::User,
            ErrorKind::PassphraseUnavailable,
            "--passphrase-stdin needs --input to name a file",
        ));
    }

    let input = file_ops::read_text(&target.input)?;
    let password = get_passphrase_reader(cli.passphrase_stdin).read_passphrase()?;

    match cli.engine {
        Engine::Openpgp => drive(OpenPgpLibrary::new(), mode, &target, input, &password).await,
        Engine::Cipherpad => drive(SecretboxLibrary::new(), mode, &target, input, &password).await,
    }
}

async fn drive<L: CryptoLibrary>(
    library: L,
    mode: Mode,
    target: &Target,
    input: String,
    password: &str,
) -> Result<bool> {
    let controller = Controller::new(Some(library), host_clipboard());
    controller.set_input(input);
    controller.set_password(password);

    let outcome = controller.run_action(mode).await;
    debug!(?outcome, %mode, "action finished");

    let form = controller.snapshot();
    print_status(form.status());
    if form.status().is_error() {
        return Ok(false);
    }
    file_ops::write_text(&target.output, form.output())?;

    if target.copy {
        if waits_for_paste(controller.clipboard()) {
            eprintln!("Keeping the output on the clipboard until it is replaced...");
        }
        controller.copy_output().await;
        let status = controller.snapshot().status().clone();
        print_status(&status);
        if status.is_error() {
            return Ok(false);
        }
    }

    Ok(true)
}
