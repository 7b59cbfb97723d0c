//! Docblock accumulator — tag values captured since the last function
//! boundary. Exactly one block is open at a time; `finalize` either
//! yields it for rendering or signals that it must be discarded.

use crate::model::OptionEntry;
use std::collections::BTreeMap;

/// Output channel of a `@stdin` / `@stdout` / `@stderr` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdin,
    Stdout,
    Stderr,
}

#[derive(Debug, Default)]
pub struct Docblock {
    /// Pending function description (also the source of the file- and
    /// section-level claims, see the parser's hand-off).
    pub description: String,
    pub example: Option<String>,
    pub options: Vec<OptionEntry>,
    pub options_bad: Vec<String>,
    pub args: BTreeMap<String, String>,
    pub noargs: bool,
    pub set_vars: Vec<String>,
    pub exit_codes: Vec<String>,
    pub stdin: Vec<String>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub see_also: Vec<String>,
}

impl Docblock {
    /// Append a line to the free-text description.
    pub fn append_description(&mut self, text: &str) {
        if self.description.is_empty() {
            self.description.push_str(text);
        } else {
            self.description.push('\n');
            self.description.push_str(text);
        }
    }

    /// Append a line to the example block, verbatim.
    pub fn append_example(&mut self, text: &str) {
        match &mut self.example {
            Some(ex) => {
                ex.push('\n');
                ex.push_str(text);
            }
            None => self.example = Some(text.to_string()),
        }
    }

    /// Record a positional argument. A repeated position overwrites.
    pub fn set_arg(&mut self, key: String, raw: String) {
        self.args.insert(key, raw);
    }

    /// Start a new multi-line entry on the given channel.
    pub fn push_entry(&mut self, channel: Channel, text: String) {
        self.channel_mut(channel).push(text);
    }

    /// Continue the most recent entry on the given channel.
    pub fn continue_entry(&mut self, channel: Channel, text: &str) {
        if let Some(last) = self.channel_mut(channel).last_mut() {
            last.push('\n');
            last.push_str(text);
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut Vec<String> {
        match channel {
            Channel::Stdin => &mut self.stdin,
            Channel::Stdout => &mut self.stdout,
            Channel::Stderr => &mut self.stderr,
        }
    }

    /// True when nothing has been captured — such a block never becomes
    /// a rendered entry.
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty()
            && self.example.is_none()
            && self.options.is_empty()
            && self.options_bad.is_empty()
            && self.args.is_empty()
            && !self.noargs
            && self.set_vars.is_empty()
            && self.exit_codes.is_empty()
            && self.stdin.is_empty()
            && self.stdout.is_empty()
            && self.stderr.is_empty()
            && self.see_also.is_empty()
    }

    /// Hand over the captured block and reset for the next function.
    /// Returns `None` (after resetting) when the block is empty.
    pub fn finalize(&mut self) -> Option<Docblock> {
        let block = std::mem::take(self);
        if block.is_empty() {
            None
        } else {
            Some(block)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_is_discarded() {
        let mut block = Docblock::default();
        assert!(block.finalize().is_none());
    }

    #[test]
    fn whitespace_only_description_counts_as_empty() {
        let mut block = Docblock::default();
        block.append_description("   ");
        assert!(block.is_empty());
    }

    #[test]
    fn finalize_resets_the_accumulator() {
        let mut block = Docblock::default();
        block.append_description("does a thing");
        block.noargs = true;
        let taken = block.finalize().expect("populated block");
        assert!(taken.noargs);
        assert!(block.is_empty());
        assert!(block.finalize().is_none());
    }

    #[test]
    fn description_lines_join_with_newlines() {
        let mut block = Docblock::default();
        block.append_description("first");
        block.append_description("second");
        assert_eq!(block.description, "first\nsecond");
    }

    #[test]
    fn entry_continuation_extends_the_last_entry_only() {
        let mut block = Docblock::default();
        block.push_entry(Channel::Stdout, "one".to_string());
        block.push_entry(Channel::Stdout, "two".to_string());
        block.continue_entry(Channel::Stdout, "more");
        assert_eq!(block.stdout, ["one", "two\nmore"]);
    }

    #[test]
    fn repeated_arg_position_overwrites() {
        let mut block = Docblock::default();
        block.set_arg("001".to_string(), "$1 old".to_string());
        block.set_arg("001".to_string(), "$1 new".to_string());
        assert_eq!(block.args.len(), 1);
        assert_eq!(block.args["001"], "$1 new");
    }
}
