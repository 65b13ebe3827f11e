//! Session driver: source text → tokens → tree → resolved tree → effects.
//!
//! A [`Lox`] keeps one interpreter alive across runs so that REPL lines see
//! the globals and functions defined by earlier lines.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{ErrorReporter, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

pub struct Lox {
    interpreter: Interpreter,
    reporter: ErrorReporter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self::with_parts(Interpreter::new(), ErrorReporter::new())
    }

    pub fn with_parts(interpreter: Interpreter, reporter: ErrorReporter) -> Self {
        Self {
            interpreter,
            reporter,
        }
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Run one chunk of source.  Static errors stop the pipeline before
    /// anything executes.  The reporter is reset first, so afterwards
    /// [`reporter`](Self::reporter) describes this run alone.
    pub fn run(&mut self, source: &str) {
        self.reporter.reset();

        let (tokens, lex_errors) = Scanner::new(source).scan_all();
        for e in &lex_errors {
            self.reporter.error(e);
        }

        let statements = Parser::new(tokens, &mut self.reporter).parse();

        if self.reporter.had_error() {
            debug!("Static errors found; skipping resolution");
            return;
        }

        Resolver::new(&mut self.interpreter, &mut self.reporter).resolve(&statements);

        if self.reporter.had_error() {
            debug!("Resolution errors found; skipping execution");
            return;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            self.reporter.runtime_error(&e);
        }
    }

    /// Run a script file and return the process exit status it maps to.
    pub fn run_file(&mut self, path: &Path) -> Result<i32> {
        info!("Running file {:?}", path);

        let source = String::from_utf8(fs::read(path)?)?;
        self.run(&source);

        Ok(self.reporter.exit_code())
    }

    /// Read‑eval‑print loop.  Errors on one line never poison the next.
    pub fn run_prompt<R: BufRead, W: Write>(&mut self, input: R, mut prompt: W) -> Result<()> {
        info!("Starting REPL");

        let mut lines = input.lines();

        loop {
            write!(prompt, "> ")?;
            prompt.flush()?;

            let Some(line) = lines.next() else {
                break;
            };

            self.run(&line?);
        }

        writeln!(prompt)?;
        Ok(())
    }
}
