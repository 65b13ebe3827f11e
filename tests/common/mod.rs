#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::ErrorReporter;
use rox::interpreter::Interpreter;
use rox::Lox;

/// In-memory `print` sink that stays readable after being boxed.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A silent session whose printed output is captured.
pub fn session() -> (Lox, SharedBuf) {
    let out = SharedBuf::default();
    let interpreter = Interpreter::with_output(Box::new(out.clone()));
    (Lox::with_parts(interpreter, ErrorReporter::silent()), out)
}

/// Run `source` once; returns printed output and the session for inspection.
pub fn run(source: &str) -> (String, Lox) {
    let (mut lox, out) = session();
    lox.run(source);
    (out.contents(), lox)
}

/// Output lines of a program expected to run cleanly.
pub fn run_ok(source: &str) -> Vec<String> {
    let (output, lox) = run(source);
    assert!(
        lox.reporter().diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        lox.reporter().diagnostics()
    );
    output.lines().map(str::to_string).collect()
}
