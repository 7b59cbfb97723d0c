//! The `github-flavored` style: GitHub-renderable Markdown with
//! heading-fragment cross-references.

use crate::model::{FunctionDoc, Section};
use crate::render::Style;
use crate::toc;
use regex::Regex;
use std::sync::LazyLock;

pub struct GithubFlavored;

// Entry shapes reformatted into bold-term bullets.
static ARG_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\$[0-9]+)[[:space:]]+([^[:space:]]+)[[:space:]]+").unwrap());

static ARG_CATCH_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$@[[:space:]]+([^[:space:]]+)[[:space:]]+").unwrap());

static SET_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^[:space:]]+) ([^[:space:]]+)").unwrap());

static EXITCODE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([>!]?[0-9]{1,3}) (.*)").unwrap());

impl Style for GithubFlavored {
    fn title(&self, title: &str, brief: Option<&str>) -> String {
        match brief {
            Some(brief) => format!("# {title}\n\n{brief}\n\n"),
            None => format!("# {title}\n\n"),
        }
    }

    fn overview(&self, description: &str) -> String {
        format!("## Overview\n\n{description}\n\n")
    }

    fn index(&self, names: &[&str]) -> String {
        let mut out = String::from("## Index\n\n");
        for name in names {
            out.push_str(&toc::toc_entry(name));
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn suppressions(&self, codes: &[&str]) -> String {
        format!("## Shellcheck\n\nDisabled checks: {}\n\n", codes.join(", "))
    }

    fn section(&self, section: &Section) -> String {
        let mut out = format!("## {}\n\n", section.title);
        if let Some(description) = &section.description {
            out.push_str(description);
            out.push_str("\n\n");
        }
        out
    }

    fn heading(&self, name: &str) -> String {
        format!("### {name}\n\n")
    }

    fn description(&self, text: &str) -> String {
        format!("{text}\n\n")
    }

    fn example(&self, text: &str) -> String {
        format!("#### Example\n\n```bash\n{}\n```\n\n", unindent(text))
    }

    fn options(&self, func: &FunctionDoc) -> String {
        let mut out = String::from("#### Options\n\n");
        for option in &func.options {
            let term = option.term.replace('<', "\\<").replace('>', "\\>");
            out.push_str(&format!("* **{term}**\n\n"));
            if !option.definition.is_empty() {
                out.push_str(&format!("  {}\n\n", option.definition));
            }
        }
        if !func.options_bad.is_empty() {
            for raw in &func.options_bad {
                out.push_str(&format!("* {raw}\n"));
            }
            out.push('\n');
        }
        out
    }

    fn arguments(&self, func: &FunctionDoc) -> String {
        let mut out = String::from("#### Arguments\n\n");
        for raw in func.args.values() {
            out.push_str(&format!("* {}\n", argument_entry(raw)));
        }
        out.push('\n');
        out
    }

    fn noargs(&self) -> String {
        "_Function has no arguments._\n\n".to_string()
    }

    fn variables_set(&self, entries: &[String]) -> String {
        let mut out = String::from("#### Variables set\n\n");
        for entry in entries {
            out.push_str(&format!("* {}\n", set_entry(entry)));
        }
        out.push('\n');
        out
    }

    fn exit_codes(&self, entries: &[String]) -> String {
        let mut out = String::from("#### Exit codes\n\n");
        for entry in entries {
            out.push_str(&format!("* {}\n", exitcode_entry(entry)));
        }
        out.push('\n');
        out
    }

    fn stdio(&self, label: &str, entries: &[String]) -> String {
        let mut out = format!("#### {label}\n\n");
        for entry in entries {
            // later lines of an entry indent under its bullet
            out.push_str(&format!("* {}\n", entry.replace('\n', "\n  ")));
        }
        out.push('\n');
        out
    }

    fn see_also(&self, targets: &[String]) -> String {
        let mut out = String::from("#### See also\n\n");
        for target in targets {
            out.push_str(&format!("* {}\n", toc::see_link(target)));
        }
        out.push('\n');
        out
    }
}

/// `$1 string The value` → `**$1** (string): The value`;
/// `$@ string Rest` → `**...** (string): Rest`. Entries that don't
/// declare a placeholder pass through unchanged.
fn argument_entry(raw: &str) -> String {
    if let Some(caps) = ARG_CATCH_ALL.captures(raw) {
        let rest = &raw[caps[0].len()..];
        return format!("**...** ({}): {}", &caps[1], rest);
    }
    if let Some(caps) = ARG_NUMBERED.captures(raw) {
        let rest = &raw[caps[0].len()..];
        return format!("**{}** ({}): {}", &caps[1], &caps[2], rest);
    }
    raw.to_string()
}

/// `NAME type text` → `**NAME** (type): text`
fn set_entry(raw: &str) -> String {
    if let Some(caps) = SET_ENTRY.captures(raw) {
        let rest = raw[caps[0].len()..].trim_start();
        return format!("**{}** ({}): {}", &caps[1], &caps[2], rest);
    }
    raw.to_string()
}

/// `0 text` → `**0**: text`, with `>` / `!` modifiers allowed.
fn exitcode_entry(raw: &str) -> String {
    if let Some(caps) = EXITCODE_ENTRY.captures(raw) {
        return format!("**{}**: {}", &caps[1], &caps[2]);
    }
    raw.to_string()
}

/// Strip the minimum common indentation from an example block and drop
/// leading empty lines.
fn unindent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(0);

    let min_indent = lines[start..]
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    lines[start..]
        .iter()
        .map(|l| if l.len() >= min_indent { &l[min_indent..] } else { *l })
        .collect::<Vec<_>>()
        .join("\n")
}
