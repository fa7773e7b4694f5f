//! utf8clip - UTF-8 clipboard bridge
//!
//! Pipe text in and it lands on the Windows clipboard; run it on its own and
//! the clipboard is printed to the console. Both directions treat the text as
//! UTF-8.

mod app;
mod config;
mod services;
mod utils;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use crossterm::tty::IsTty;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Mode};
use config::Config;
use services::{SystemClipboard, SystemConsole};

const ABOUT: &str = "\
If started with file/piped input:
    Copies the input, read as UTF-8 text (*), to the Windows clipboard.
Otherwise:
    Prints the contents of the Windows clipboard to output as UTF-8 text.

(*) A byte-order mark at the start of the input is respected, e.g. for
UTF-16 encoded files.";

const EXAMPLES: &str = "\
Examples:
    <program> | utf8clip  Places the UTF-8 output of <program> on the Windows
                          clipboard. Most native Windows commands such as dir
                          only write UTF-8 after the console code page has been
                          changed with chcp.

    utf8clip < README.md  Places the text of README.md on the Windows
                          clipboard.

    utf8clip              Writes the current contents of the Windows clipboard
                          to the console.

PowerShell Core Examples:
    ls | utf8clip         Places the current directory listing on the Windows
                          clipboard. PowerShell Core writes UTF-8 by default,
                          so no code page change is needed.

    cat .\\README.md | utf8clip
                          Places the text of README.md on the Windows
                          clipboard.

    utf8clip              Writes the current contents of the Windows clipboard
                          to the console.";

const DEFAULT_LOG_DIRECTIVE: &str = "utf8clip=warn,warn";

/// Help layout: name and version, then the description and examples.
const HELP_TEMPLATE: &str = "{name} {version}\n\n{about-with-newline}\n{after-help}";

/// utf8clip - UTF-8 clipboard bridge
///
/// Takes no arguments; passing any prints the help.
#[derive(Parser, Debug)]
#[command(
    name = "utf8clip",
    version,
    about = ABOUT,
    long_about = None,
    after_help = EXAMPLES,
    help_template = HELP_TEMPLATE,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {}

fn print_help() -> Result<()> {
    Args::command().print_help()?;
    Ok(())
}

/// Filter directive from the config, or the default one with a notice.
fn log_directive(config: &Config) -> String {
    config.log_directive().unwrap_or_else(|e| {
        eprintln!("utf8clip: {:#}; logging at warn", e);
        DEFAULT_LOG_DIRECTIVE.to_string()
    })
}

/// Set up logging on stderr, leaving stdout to the clipboard text.
fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_directive(config)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load configuration, start logging and build the application.
fn setup(mode: Mode) -> App<SystemClipboard, SystemConsole> {
    let config = Config::load_or_default();
    init_logging(&config);
    tracing::debug!(?mode, "mode selected");

    App::new(
        SystemClipboard,
        SystemConsole::default(),
        config.clipboard.empty_on_read_error,
    )
}

fn run(mode: Mode) -> Result<()> {
    match mode {
        Mode::Help => print_help(),
        Mode::ReadToClipboard => {
            let mut app = setup(mode);
            app.read_to_clipboard(io::stdin().lock())?;
            Ok(())
        }
        Mode::WriteFromClipboard => {
            let mut app = setup(mode);
            let stdout = io::stdout();
            let is_terminal = stdout.is_tty();
            app.write_from_clipboard(stdout.lock(), is_terminal)?;
            Ok(())
        }
    }
}

fn error_message(e: &anyhow::Error) -> String {
    format!("utf8clip: {:#}", e)
}

/// Map the outcome to the exit code: 0 on success, 1 on any failure.
fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let arg_count = std::env::args_os().skip(1).count();
    let mode = Mode::select(arg_count, !io::stdin().is_tty());

    report(run(mode))
}
