//! Console output for the xeno CLI
//!
//! Status lines are a coloured marker followed by the message. Errors and
//! warnings go to stderr so they never mix with values printed on stdout.
//! `--quiet` mutes everything except errors and command data.

use console::{StyledObject, style};

/// Which standard stream a line is written to
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Styled console collaborator shared by all commands
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        self.status(Stream::Stdout, style("✔").green(), message);
    }

    /// Report a failure; shown even with `--quiet`
    pub fn error(&self, message: &str) {
        emit(Stream::Stderr, style("✖").red(), message);
    }

    /// Report a non-fatal problem on stderr
    pub fn warning(&self, message: &str) {
        self.status(Stream::Stderr, style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        self.status(Stream::Stdout, style("ℹ").blue(), message);
    }

    /// Extra detail, only with `--verbose`
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            emit(Stream::Stdout, style("ℹ").dim(), &style(message).dim().to_string());
        }
    }

    /// Print command data as-is, regardless of quiet mode
    pub fn raw(&self, text: &str) {
        println!("{text}");
    }

    fn status(&self, stream: Stream, marker: StyledObject<&str>, message: &str) {
        if !self.quiet {
            emit(stream, marker, message);
        }
    }
}

fn emit(stream: Stream, marker: StyledObject<&str>, message: &str) {
    match stream {
        Stream::Stdout => println!("{marker} {message}"),
        Stream::Stderr => eprintln!("{marker} {message}"),
    }
}
