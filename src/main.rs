//! gendoc — generate Markdown reference documentation from shell
//! sources annotated with `@`-tag comments.
//!
//! Two modes:
//!
//! - **stdin mode**: `gendoc < lib.sh` writes the document to stdout
//! - **file mode**: `gendoc -o docs libraries/*.sh` writes one `.md`
//!   per input file

mod model;
mod parser;
mod render;
mod toc;
mod trace;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use trace::Trace;

#[derive(Parser)]
#[command(
    name = "gendoc",
    about = "Generate Markdown reference documentation from annotated shell scripts"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output style
    #[arg(short = 's', long, default_value = "github-flavored")]
    style: String,

    /// Emit parser trace lines
    #[arg(long)]
    debug: bool,

    /// Write warnings and trace lines to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    debug_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve the style up front: an unknown name must fail before any
    // output is produced.
    let style = render::lookup(&cli.style)?;

    let mut trace = match &cli.debug_log {
        Some(path) => Trace::file(cli.debug, path)
            .with_context(|| format!("failed to open debug log: {}", path.display()))?,
        None => Trace::stderr(cli.debug),
    };

    if cli.files.is_empty() {
        return stdin_mode(style.as_ref(), &mut trace);
    }
    file_mode(&cli, style.as_ref(), &mut trace)
}

/// stdin mode: parse standard input, write the document to stdout.
fn stdin_mode(style: &dyn render::Style, trace: &mut Trace) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = parser::shell::parse(&input, trace);
    print!("{}", render::assemble(&doc, style));
    Ok(())
}

/// file mode: process every input file and write one document each.
fn file_mode(cli: &Cli, style: &dyn render::Style, trace: &mut Trace) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for path in expand_globs(&cli.files, trace)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let doc = parser::shell::parse(&content, trace);
        let out_path = output_dir.join(format!("{}.md", document_name(&path)));
        fs::write(&out_path, render::assemble(&doc, style))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// File extensions scanned when an input path is a directory.
const SHELL_EXTENSIONS: &[&str] = &["sh", "bash", "bats"];

/// Expand glob patterns into a deterministic list of input files.
/// Directories are scanned (non-recursively) for shell sources.
fn expand_globs(patterns: &[String], trace: &mut Trace) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let shellish = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SHELL_EXTENSIONS.contains(&ext));
                if p.is_file() && shellish {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            trace.warn(&format!("no files matched: {pattern}"));
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Output file stem for a source path: `libraries/str.sh` → `str`.
fn document_name(path: &Path) -> String {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    for ext in SHELL_EXTENSIONS {
        if let Some(stem) = filename.strip_suffix(&format!(".{ext}")) {
            return stem.to_string();
        }
    }
    filename
}
