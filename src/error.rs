//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic inter‑operation
//! with `anyhow`, while still preserving rich diagnostic detail.
//!
//! Diagnostics are surfaced through an [`ErrorReporter`] that is handed to the
//! parser, resolver and driver explicitly; nothing in this module is global.

use std::io;
use thiserror::Error;

use log::{debug, info};

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// ` at end` or ` at '<lexeme>'`.
        location: String,
    },

    /// Static‑analysis or resolution failure (e.g. early‑binding errors).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        debug!(
            "Creating Resolve error: line={}, msg={}",
            token.line, message
        );

        LoxError::Resolve {
            message,
            line: token.line,
            location: location_of(token),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

/// A failure raised while evaluating a program.  Carries the line of the
/// offending token so the reporter can point at it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        Self {
            message: msg.into(),
            line: token.line,
        }
    }
}

/// Exit status for a clean run.
pub const EXIT_OK: i32 = 0;

/// Exit status for a wrong command line.
pub const EXIT_USAGE: i32 = 64;

/// Exit status after a lexical, syntax or resolution error.
pub const EXIT_STATIC: i32 = 65;

/// Exit status after an uncaught runtime error.
pub const EXIT_RUNTIME: i32 = 70;

/// Diagnostic sink shared by the scanner, parser, resolver and interpreter
/// driver.  Remembers whether anything went wrong so the host can choose an
/// exit status, and can be reset between REPL lines.
#[derive(Debug)]
pub struct ErrorReporter {
    had_error: bool,
    had_runtime_error: bool,
    diagnostics: Vec<String>,
    echo: bool,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    /// Reporter that writes every diagnostic to stderr as it arrives.
    pub fn new() -> Self {
        Self {
            had_error: false,
            had_runtime_error: false,
            diagnostics: Vec::new(),
            echo: true,
        }
    }

    /// Reporter that only records diagnostics.
    pub fn silent() -> Self {
        Self {
            echo: false,
            ..Self::new()
        }
    }

    /// Record a static (lex / parse / resolve) error.
    pub fn error(&mut self, err: &LoxError) {
        info!("Static error reported: {}", err);

        self.had_error = true;
        self.emit(err.to_string());
    }

    /// Record an uncaught runtime error.
    pub fn runtime_error(&mut self, err: &RuntimeError) {
        info!("Runtime error reported: {}", err.message);

        self.had_runtime_error = true;
        self.emit(err.to_string());
    }

    fn emit(&mut self, rendered: String) {
        if self.echo {
            eprintln!("{}", rendered);
        }

        self.diagnostics.push(rendered);
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Every diagnostic reported since the last [`reset`](Self::reset).
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Forget previous failures; called between REPL lines.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
        self.diagnostics.clear();
    }

    pub fn exit_code(&self) -> i32 {
        if self.had_error {
            EXIT_STATIC
        } else if self.had_runtime_error {
            EXIT_RUNTIME
        } else {
            EXIT_OK
        }
    }
}
