//! Heading anchors, table-of-contents entries and @see link resolution.

use regex::Regex;
use std::sync::LazyLock;

static MD_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").unwrap());

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?|ftp)://[^[:space:]]+").unwrap());

/// Derive the heading fragment id for a title.
///
/// Lower-case; alphanumerics, spaces and dashes survive; an underscore at
/// either end of the text degrades to a dash while interior underscores
/// are deleted; remaining spaces become dashes. No trimming pass runs on
/// the result.
pub fn anchor(text: &str) -> String {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut out = String::with_capacity(lower.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            out.push(c);
        } else if c == '_' && (i == 0 || i == chars.len() - 1) {
            out.push('-');
        }
    }
    out.replace(' ', "-")
}

/// TOC bullet for a rendered function.
pub fn toc_entry(name: &str) -> String {
    format!("* [{name}](#{})", anchor(name))
}

/// Resolve a @see target into a markdown link.
///
/// Relative paths and existing markdown links pass through, bare URLs
/// are wrapped, anything else becomes a heading cross-reference.
pub fn see_link(target: &str) -> String {
    if target.starts_with('/') || target.starts_with("./") || target.starts_with("../") {
        return format!("[{target}]({target})");
    }
    if MD_LINK.is_match(target) {
        return target.to_string();
    }
    if BARE_URL.is_match(target) {
        return BARE_URL.replace_all(target, "[${0}](${0})").to_string();
    }
    format!("[{target}](#{})", anchor(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_lowercases_and_dashes_spaces() {
        assert_eq!(anchor("Exit codes"), "exit-codes");
        assert_eq!(anchor("Hello World"), "hello-world");
    }

    #[test]
    fn anchor_strips_punctuation() {
        assert_eq!(anchor("strings::trim"), "stringstrim");
        assert_eq!(anchor("to.int"), "toint");
    }

    #[test]
    fn anchor_keeps_dashes() {
        assert_eq!(anchor("drop-index"), "drop-index");
    }

    #[test]
    fn anchor_underscore_edges_degrade_to_dashes() {
        // literal rule output, asserted exactly — no cleanup pass
        assert_eq!(anchor("_my-Function_Name_"), "-my-functionname-");
    }

    #[test]
    fn toc_entry_links_to_the_anchor() {
        assert_eq!(toc_entry("is::array"), "* [is::array](#isarray)");
    }

    #[test]
    fn see_relative_path_passes_through() {
        assert_eq!(see_link("./other.md"), "[./other.md](./other.md)");
    }

    #[test]
    fn see_markdown_link_passes_through() {
        assert_eq!(see_link("[docs](https://x.dev)"), "[docs](https://x.dev)");
    }

    #[test]
    fn see_bare_url_is_wrapped() {
        assert_eq!(
            see_link("https://example.com/join"),
            "[https://example.com/join](https://example.com/join)"
        );
    }

    #[test]
    fn see_function_name_becomes_cross_reference() {
        assert_eq!(see_link("strings::trim"), "[strings::trim](#stringstrim)");
    }
}
