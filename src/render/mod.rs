//! Rendering — one `Style` implementation per output flavor, plus the
//! assembler that composes the final document.

pub mod github;

use crate::model::{Document, FunctionDoc, Section};
use anyhow::{anyhow, Result};

/// A named set of tag-rendering rules: one method per tag category.
/// The assembler calls only the methods whose fields are populated, so
/// an implementation never sees an empty category.
pub trait Style {
    fn title(&self, title: &str, brief: Option<&str>) -> String;
    fn overview(&self, description: &str) -> String;
    fn index(&self, names: &[&str]) -> String;
    fn suppressions(&self, codes: &[&str]) -> String;
    fn section(&self, section: &Section) -> String;
    fn heading(&self, name: &str) -> String;
    fn description(&self, text: &str) -> String;
    fn example(&self, text: &str) -> String;
    fn options(&self, func: &FunctionDoc) -> String;
    fn arguments(&self, func: &FunctionDoc) -> String;
    fn noargs(&self) -> String;
    fn variables_set(&self, entries: &[String]) -> String;
    fn exit_codes(&self, entries: &[String]) -> String;
    fn stdio(&self, label: &str, entries: &[String]) -> String;
    fn see_also(&self, targets: &[String]) -> String;
}

/// Look up a style by name. An unknown name is a hard error so that
/// empty sections are never emitted silently.
pub fn lookup(name: &str) -> Result<Box<dyn Style>> {
    match name {
        "github-flavored" | "github" => Ok(Box::new(github::GithubFlavored)),
        _ => Err(anyhow!(
            "unknown style: {}. Available styles: github-flavored",
            name
        )),
    }
}

/// Compose the final document: title and brief, overview, index,
/// suppressed-check summary, then the function bodies in declaration
/// order.
pub fn assemble(doc: &Document, style: &dyn Style) -> String {
    let mut out = String::new();

    if let Some(title) = &doc.file.title {
        out.push_str(&style.title(title, doc.file.brief.as_deref()));
    }
    if let Some(description) = &doc.file.description {
        out.push_str(&style.overview(description));
    }
    if !doc.functions.is_empty() {
        let names: Vec<&str> = doc.functions.iter().map(|f| f.name.as_str()).collect();
        out.push_str(&style.index(&names));
    }
    if !doc.suppressions.is_empty() {
        let codes: Vec<&str> = doc.suppressions.iter().map(String::as_str).collect();
        out.push_str(&style.suppressions(&codes));
    }
    for func in &doc.functions {
        out.push_str(&render_function(func, style));
    }

    if out.is_empty() {
        out
    } else {
        format!("{}\n", out.trim_end())
    }
}

fn render_function(func: &FunctionDoc, style: &dyn Style) -> String {
    let mut out = String::new();

    if let Some(section) = &func.section {
        out.push_str(&style.section(section));
    }
    out.push_str(&style.heading(&func.name));
    if let Some(description) = &func.description {
        out.push_str(&style.description(description));
    }
    if let Some(example) = &func.example {
        out.push_str(&style.example(example));
    }
    if !func.options.is_empty() || !func.options_bad.is_empty() {
        out.push_str(&style.options(func));
    }
    if !func.args.is_empty() {
        out.push_str(&style.arguments(func));
    }
    if func.noargs {
        out.push_str(&style.noargs());
    }
    if !func.set_vars.is_empty() {
        out.push_str(&style.variables_set(&func.set_vars));
    }
    if !func.exit_codes.is_empty() {
        out.push_str(&style.exit_codes(&func.exit_codes));
    }
    if !func.stdin.is_empty() {
        out.push_str(&style.stdio("Input on stdin", &func.stdin));
    }
    if !func.stdout.is_empty() {
        out.push_str(&style.stdio("Output on stdout", &func.stdout));
    }
    if !func.stderr.is_empty() {
        out.push_str(&style.stdio("Output on stderr", &func.stderr));
    }
    if !func.see_also.is_empty() {
        out.push_str(&style.see_also(&func.see_also));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileDoc;

    #[test]
    fn unknown_style_is_rejected() {
        assert!(lookup("man-page").is_err());
        assert!(lookup("github-flavored").is_ok());
    }

    #[test]
    fn title_and_brief_without_functions_render_alone() {
        let doc = Document {
            file: FileDoc {
                title: Some("empty".to_string()),
                brief: Some("Nothing here yet.".to_string()),
                description: None,
            },
            ..Default::default()
        };
        let style = lookup("github-flavored").unwrap();
        let output = assemble(&doc, style.as_ref());
        assert_eq!(output, "# empty\n\nNothing here yet.\n");
    }

    #[test]
    fn suppression_summary_follows_the_index() {
        let mut doc = Document::default();
        doc.file.title = Some("lib".to_string());
        doc.suppressions.insert("SC2155".to_string());
        doc.suppressions.insert("SC2034".to_string());
        doc.functions.push(FunctionDoc {
            name: "f".to_string(),
            description: Some("Does f.".to_string()),
            ..Default::default()
        });
        let style = lookup("github-flavored").unwrap();
        let output = assemble(&doc, style.as_ref());
        let index_at = output.find("## Index").unwrap();
        let checks_at = output.find("## Shellcheck").unwrap();
        let body_at = output.find("### f").unwrap();
        assert!(index_at < checks_at && checks_at < body_at);
        assert!(output.contains("SC2034, SC2155"));
    }

    #[test]
    fn empty_document_renders_nothing() {
        let style = lookup("github-flavored").unwrap();
        assert_eq!(assemble(&Document::default(), style.as_ref()), "");
    }
}
