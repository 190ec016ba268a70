//! Build manifest reading for `shipbranch-manifest`.
//!
//! `load(working_dir)` reads `tsconfig.json` once and keeps the two fields the
//! publish step cares about: `compilerOptions.outDir` and
//! `compilerOptions.rootDir`. [`BuildManifest::locate`] turns them into
//! absolute paths, falling back to the working directory when no output
//! directory is declared.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File name of the compiler's project configuration.
pub const MANIFEST_FILE: &str = "tsconfig.json";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The parts of the compiler configuration used to locate build output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildManifest {
    /// `compilerOptions.outDir`, if declared and non-empty.
    pub out_dir: Option<PathBuf>,
    /// `compilerOptions.rootDir`, if declared and non-empty.
    pub root_dir: Option<PathBuf>,
}

/// Resolved locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Directory whose contents are published.
    pub output_dir: PathBuf,
    /// Source tree removed by the cleanup step, when declared.
    pub source_root: Option<PathBuf>,
}

/// Errors from manifest reading.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no tsconfig.json found at {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Path of the manifest inside `working_dir`.
pub fn manifest_path(working_dir: &Path) -> PathBuf {
    working_dir.join(MANIFEST_FILE)
}

/// Read `<working_dir>/tsconfig.json`.
///
/// A missing file is reported as [`ManifestError::NotFound`], separately from
/// other I/O failures.
pub fn load(working_dir: &Path) -> Result<BuildManifest, ManifestError> {
    let path = manifest_path(working_dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ManifestError::NotFound { path });
        }
        Err(source) => return Err(ManifestError::Io { path, source }),
    };
    parse(&content).map_err(|e| ManifestError::Parse {
        path,
        message: e.to_string(),
    })
}

/// Parse manifest text. Unknown keys are ignored.
///
/// Accepts the relaxed syntax `tsc` itself reads: `//` and `/* */` comments
/// and trailing commas.
pub fn parse(content: &str) -> Result<BuildManifest, serde_json::Error> {
    let relaxed = strip_trailing_commas(&strip_comments(content));
    let raw: RawManifest = serde_json::from_str(&relaxed)?;
    let options = raw.compiler_options.unwrap_or_default();
    Ok(BuildManifest {
        out_dir: declared(options.out_dir),
        root_dir: declared(options.root_dir),
    })
}

impl BuildManifest {
    /// Resolve declared directories against `working_dir`.
    pub fn locate(&self, working_dir: &Path) -> OutputLocation {
        OutputLocation {
            output_dir: self
                .out_dir
                .as_ref()
                .map(|dir| working_dir.join(dir))
                .unwrap_or_else(|| working_dir.to_path_buf()),
            source_root: self.root_dir.as_ref().map(|dir| working_dir.join(dir)),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(rename = "compilerOptions", default)]
    compiler_options: Option<RawCompilerOptions>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCompilerOptions {
    #[serde(rename = "outDir", default)]
    out_dir: Option<String>,
    #[serde(rename = "rootDir", default)]
    root_dir: Option<String>,
}

fn declared(value: Option<String>) -> Option<PathBuf> {
    value.filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Relaxed JSON
// ---------------------------------------------------------------------------

/// Blank out comments outside string literals. Newlines are kept so parse
/// errors still point at the right line.
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Drop commas that directly precede `}` or `]`. Expects comment-free input.
fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().copied().find(|n| !n.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}
