//! Shell annotation parser — a single-pass, line-oriented state machine.
//!
//! Each input line is classified against a fixed priority order: divider,
//! suppression directive, file-level tags, description/example capture,
//! the option and argument grammars, stdio entries with indentation-based
//! continuation, and finally function declarations (with or without the
//! opening brace on the same line).

use crate::model::{arg_key, Document, FunctionDoc, OptionEntry, Section};
use crate::parser::docblock::{Channel, Docblock};
use crate::trace::Trace;
use regex::Regex;
use std::sync::LazyLock;

// -- Line grammar -------------------------------------------------------------

static DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*#[[:blank:]]*[-=*#_~]{3,}[[:blank:]]*$").unwrap());

static SUPPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:blank:]]*#[[:blank:]]*shellcheck[[:blank:]]+disable=([[:alnum:],[:blank:]]+)$")
        .unwrap()
});

static INTERNAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@internal").unwrap());

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@(?:name|file)[[:space:]]+(.*)").unwrap()
});

static BRIEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@brief[[:space:]]+(.*)").unwrap());

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@description[[:blank:]]*(.*)$").unwrap()
});

// A comment opening any tag other than @description ends the capture.
static DESCRIPTION_EXIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*# @[^d]").unwrap());

static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@section[[:space:]]+(.*)").unwrap()
});

static EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@example").unwrap());

// Indented comment continuation inside an @example; a tag or any
// non-comment line exits the capture.
static EXAMPLE_CONT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*#[[:blank:]]+[^[:blank:]@]").unwrap());

static OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:blank:]]*#[[:blank:]]+@option[[:blank:]]+([^[:blank:]].*)$").unwrap()
});

// One or more option terms — `-x`, optionally with a bracketed argument,
// or `--word` with `=<arg>` or ` <arg>` — joined by whitespace or pipes,
// then free-text definition.
static OPTION_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<terms>(?:(?:-[[:alnum:]](?:[[:blank:]]*<[^>]+>)?",
        r"|--[[:alnum:]][[:alnum:]-]*(?:(?:=|[[:blank:]]+)<[^>]+>)?)",
        r"(?:[[:blank:]]*\|?[[:blank:]]+))+)",
        r"(?P<def>[^[:blank:]|<-].*)?$",
    ))
    .unwrap()
});

static ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:blank:]]*#[[:blank:]]+@arg[[:blank:]]+([^[:blank:]].*)$").unwrap()
});

static ARG_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([0-9]+|@)[[:space:]]").unwrap());

static NOARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:blank:]]+@noargs[[:blank:]]*$").unwrap());

static SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@set[[:space:]]+(.*)").unwrap());

static EXITCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@exitcode[[:space:]]+(.*)").unwrap()
});

static SEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[[:space:]]*#[[:space:]]+@see[[:space:]]+(.*)").unwrap());

static STDIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([[:blank:]]*#[[:blank:]]+)@(stdin|stdout|stderr)[[:blank:]]+(.*[^[:blank:]])[[:blank:]]*$",
    )
    .unwrap()
});

static FUNC_BRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[[:blank:]]*(?:function[[:blank:]]+)?([A-Za-z0-9_:.-]+)[[:blank:]]*(?:\([[:blank:]]*\))?[[:blank:]]*\{",
    )
    .unwrap()
});

static FUNC_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[[:blank:]]*(?:function[[:blank:]]+)?([A-Za-z0-9_:.-]+)[[:blank:]]*(?:\([[:blank:]]*\))?[[:blank:]]*$",
    )
    .unwrap()
});

static LONE_BRACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[[:blank:]]*\{").unwrap());

static BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[[:blank:]]*$").unwrap());

static NON_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^#]*$").unwrap());

// -- Parser state -------------------------------------------------------------

/// Lexical state carried between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Accumulating a multi-line @description.
    Description,
    /// Accumulating a multi-line @example.
    Example,
    /// Extending the last stdio entry while its indentation holds.
    Continuation { channel: Channel, baseline: Baseline },
}

/// Indentation baseline of a multi-line entry, captured once from its
/// first line and compared structurally against each candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Baseline {
    /// Column of the `#`.
    hash_col: usize,
    /// Column where the tag began.
    text_col: usize,
}

impl Baseline {
    fn of_prefix(prefix: &str) -> Baseline {
        Baseline {
            hash_col: prefix.find('#').unwrap_or(0),
            text_col: prefix.len(),
        }
    }

    /// A continuation keeps `#` in the same column and starts its text
    /// deeper than the original tag.
    fn matches(&self, line: &str) -> bool {
        let hash = line.len() - line.trim_start_matches([' ', '\t']).len();
        if hash != self.hash_col || line.as_bytes().get(hash) != Some(&b'#') {
            return false;
        }
        let after = &line[hash + 1..];
        let text_col = hash + 1 + (after.len() - after.trim_start_matches([' ', '\t']).len());
        text_col > self.text_col && text_col < line.len()
    }
}

struct Parser {
    doc: Document,
    block: Docblock,
    mode: Mode,
    internal: bool,
    section: Option<String>,
    section_description: Option<String>,
    /// Declared function name waiting for its `{` on a later line.
    pending_decl: Option<String>,
}

// -- Public API ---------------------------------------------------------------

/// Parse an annotated shell source into a Document.
pub fn parse(input: &str, trace: &mut Trace) -> Document {
    let mut parser = Parser::new();
    for line in input.lines() {
        parser.feed(line, trace);
    }
    parser.doc
}

// -- Line processing ----------------------------------------------------------

impl Parser {
    fn new() -> Self {
        Parser {
            doc: Document::default(),
            block: Docblock::default(),
            mode: Mode::Normal,
            internal: false,
            section: None,
            section_description: None,
            pending_decl: None,
        }
    }

    fn feed(&mut self, line: &str, trace: &mut Trace) {
        if DIVIDER.is_match(line) {
            return;
        }

        if let Some(caps) = SUPPRESSION.captures(line) {
            for code in caps[1].split(|c: char| c == ',' || c.is_whitespace()) {
                if !code.is_empty() {
                    self.doc.suppressions.insert(code.to_string());
                }
            }
            return;
        }

        if INTERNAL.is_match(line) {
            self.internal = true;
            return;
        }

        if let Some(caps) = TITLE.captures(line) {
            self.doc.file.title = Some(caps[1].trim_end().to_string());
            return;
        }

        if let Some(caps) = BRIEF.captures(line) {
            self.doc.file.brief = Some(caps[1].trim_end().to_string());
            return;
        }

        if let Some(caps) = DESCRIPTION.captures(line) {
            self.flush_description();
            self.block = Docblock::default();
            self.mode = Mode::Description;
            let rest = caps[1].trim_end();
            if !rest.is_empty() {
                self.block.append_description(rest);
            }
            return;
        }

        if self.mode == Mode::Description {
            if exits_description(line) {
                self.mode = Mode::Normal;
                self.flush_description();
                // fall through: this line may open a tag or a function
            } else {
                self.block.append_description(&comment_text(line));
                return;
            }
        }

        if let Some(caps) = SECTION.captures(line) {
            trace.debug(&format!("section: {}", caps[1].trim_end()));
            self.section = Some(caps[1].trim_end().to_string());
            self.section_description = None;
            return;
        }

        if EXAMPLE.is_match(line) {
            self.mode = Mode::Example;
            return;
        }

        if self.mode == Mode::Example {
            if EXAMPLE_CONT.is_match(line) {
                self.block.append_example(&example_text(line));
                return;
            }
            self.mode = Mode::Normal;
            // fall through
        }

        if let Some(caps) = OPTION.captures(line) {
            self.push_option(caps[1].trim(), trace);
            return;
        }

        if let Some(caps) = ARG.captures(line) {
            let text = caps[1].trim();
            if let Some(shape) = ARG_GRAMMAR.captures(text) {
                self.block.set_arg(arg_key(&shape[1]), text.to_string());
            } else {
                trace.warn(&format!(
                    "argument does not match `$N <text>` or `$@ <text>`, treating as option: {text}"
                ));
                self.push_option(text, trace);
            }
            return;
        }

        if NOARGS.is_match(line) {
            self.block.noargs = true;
            return;
        }

        if let Some(caps) = SET.captures(line) {
            self.block.set_vars.push(caps[1].trim_end().to_string());
            return;
        }

        if let Some(caps) = EXITCODE.captures(line) {
            self.block.exit_codes.push(caps[1].trim_end().to_string());
            return;
        }

        if let Some(caps) = SEE.captures(line) {
            self.block.see_also.push(caps[1].trim_end().to_string());
            return;
        }

        if let Mode::Continuation { channel, baseline } = self.mode {
            if baseline.matches(line) {
                self.block.continue_entry(channel, &comment_text(line));
                return;
            }
            self.mode = Mode::Normal;
            // fall through
        }

        if let Some(caps) = STDIO.captures(line) {
            let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let channel = match caps[2].to_lowercase().as_str() {
                "stdin" => Channel::Stdin,
                "stdout" => Channel::Stdout,
                _ => Channel::Stderr,
            };
            self.block.push_entry(channel, caps[3].to_string());
            self.mode = Mode::Continuation {
                channel,
                baseline: Baseline::of_prefix(prefix),
            };
            return;
        }

        if let Some(caps) = FUNC_BRACE.captures(line) {
            self.pending_decl = None;
            self.finish_function(caps[1].to_string(), trace);
            return;
        }

        if let Some(caps) = FUNC_BARE.captures(line) {
            self.pending_decl = Some(caps[1].to_string());
            return;
        }

        if LONE_BRACE.is_match(line) {
            if let Some(name) = self.pending_decl.take() {
                self.finish_function(name, trace);
                return;
            }
        }

        if BLANK.is_match(line) && self.pending_decl.is_some() {
            // still waiting for the opening brace
            return;
        }

        if NON_COMMENT.is_match(line) {
            self.pending_decl = None;
            self.flush_description();
            self.block = Docblock::default();
        }
    }

    // -- Docblock hand-off ----------------------------------------------------

    /// Claim a finished description: the first one inside an active
    /// section fills the section slot; otherwise the first non-sectioned
    /// one fills the file slot. The text stays pending for the next
    /// function boundary either way; pending text never consumed by a
    /// boundary is dropped at the next reset.
    fn flush_description(&mut self) {
        let desc = self.block.description.trim();
        if desc.is_empty() {
            return;
        }
        if self.section.is_some() {
            if self.section_description.is_none() {
                self.section_description = Some(desc.to_string());
            }
            return;
        }
        if self.doc.file.description.is_none() {
            self.doc.file.description = Some(desc.to_string());
        }
    }

    fn push_option(&mut self, text: &str, trace: &mut Trace) {
        if let Some(caps) = OPTION_GRAMMAR.captures(text) {
            let term = caps["terms"]
                .split('|')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" | ");
            let definition = caps
                .name("def")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            self.block.options.push(OptionEntry { term, definition });
        } else {
            trace.warn(&format!("option does not match the expected grammar: {text}"));
            self.block.options_bad.push(text.to_string());
        }
    }

    /// A function declaration was recognized: finalize the open block
    /// into a documented function, or discard it.
    fn finish_function(&mut self, name: String, trace: &mut Trace) {
        if self.mode == Mode::Example {
            // signatures inside an example never document a function
            return;
        }

        let Some(block) = self.block.finalize() else {
            trace.debug(&format!("skipping {name}: nothing captured"));
            return;
        };

        if self.internal {
            // suppresses exactly this boundary; the section, if any,
            // stays pending for the next rendered function
            self.internal = false;
            trace.debug(&format!("suppressing internal function {name}"));
            return;
        }

        let section = self.section.take().map(|title| Section {
            title,
            description: self.section_description.take(),
        });

        let description = block.description.trim().to_string();
        trace.debug(&format!("documented function: {name}"));
        self.doc.functions.push(FunctionDoc {
            name,
            description: (!description.is_empty()).then_some(description),
            section,
            example: block.example,
            options: block.options,
            options_bad: block.options_bad,
            args: block.args,
            noargs: block.noargs,
            set_vars: block.set_vars,
            exit_codes: block.exit_codes,
            stdin: block.stdin,
            stdout: block.stdout,
            stderr: block.stderr,
            see_also: block.see_also,
        });
    }
}

// -- Helpers ------------------------------------------------------------------

fn exits_description(line: &str) -> bool {
    BLANK.is_match(line)
        || !line.trim_start().starts_with('#')
        || DESCRIPTION_EXIT.is_match(line)
}

/// Comment payload with the `#` prefix and surrounding whitespace removed.
fn comment_text(line: &str) -> String {
    let stripped = line.trim_start();
    let stripped = stripped.strip_prefix('#').unwrap_or(stripped);
    stripped.trim_start().trim_end().to_string()
}

/// Example payload: everything after the `#`, indentation preserved.
fn example_text(line: &str) -> String {
    match line.find('#') {
        Some(pos) => line[pos + 1..].to_string(),
        None => line.to_string(),
    }
}
