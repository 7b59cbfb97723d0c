//! Warning and debug-trace output.
//!
//! Warnings are always emitted; trace lines only when `--debug` is set.
//! Both go to stderr unless redirected with `--debug-log`. Output is
//! best-effort: a failing sink must not abort the parse.

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct Trace {
    debug: bool,
    out: Option<Box<dyn Write>>,
}

impl Default for Trace {
    fn default() -> Self {
        Trace::stderr(false)
    }
}

impl Trace {
    /// Emit to stderr.
    pub fn stderr(debug: bool) -> Self {
        Trace { debug, out: None }
    }

    /// Emit to an arbitrary writer instead of stderr.
    pub fn writer(debug: bool, out: Box<dyn Write>) -> Self {
        Trace {
            debug,
            out: Some(out),
        }
    }

    /// Emit to a file, created or truncated.
    pub fn file(debug: bool, path: &Path) -> std::io::Result<Self> {
        Ok(Trace::writer(debug, Box::new(File::create(path)?)))
    }

    /// Non-fatal problem worth telling the user about.
    pub fn warn(&mut self, msg: &str) {
        self.emit(&format!("warning: {msg}"));
    }

    /// Parser trace line, suppressed unless debug is enabled.
    pub fn debug(&mut self, msg: &str) {
        if self.debug {
            self.emit(&format!("gendoc: {msg}"));
        }
    }

    fn emit(&mut self, line: &str) {
        match &mut self.out {
            Some(w) => {
                let _ = writeln!(w, "{line}");
            }
            None => eprintln!("{line}"),
        }
    }
}
