//! Go import block normalization
//!
//! Recognizes just enough Go structure to find parenthesized `import ( ... )`
//! blocks and reorder their specs. Everything else passes through untouched
//! apart from line-ending and trailing-whitespace cleanup. Lines that end
//! inside a raw string literal are copied byte for byte.

use std::io::{Read, Write};
use std::sync::LazyLock;

use regex::Regex;

use super::{Engine, EngineError, SourceUnit};

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. All patterns in this module are
/// constants covered by tests, so this can only fire during development.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

const IDENT: &str = r"[\p{L}_][\p{L}\p{N}_]*";

// Matched against a line's code, after comments are removed
static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"^package\s+{IDENT}\s*;?$")));

static IMPORT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^import\s*\($"));

static IMPORT_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r#"^(?:(?P<name>{IDENT}|\.)\s+)?(?P<path>"(?:[^"\\]|\\.)*"|`[^`]*`)\s*;?\s*(?P<comment>//.*|/\*.*\*/\s*(?://.*)?)?$"#
    ))
});

/// Lexical context at a line boundary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Lex {
    #[default]
    Code,
    RawString,
    BlockComment,
}

/// Scan one line that begins in `start`.
///
/// Returns the context at the end of the line and the line's code with
/// comments removed and literal contents dropped.
fn scan_line(line: &str, start: Lex) -> (Lex, String) {
    let mut state = start;
    let mut code = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            Lex::RawString => {
                if c == '`' {
                    state = Lex::Code;
                    code.push('`');
                }
            }
            Lex::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lex::Code;
                    code.push(' ');
                }
            }
            Lex::Code => match c {
                '`' => {
                    state = Lex::RawString;
                    code.push('`');
                }
                '"' | '\'' => {
                    code.push(c);
                    while let Some(d) = chars.next() {
                        if d == '\\' {
                            chars.next();
                        } else if d == c {
                            break;
                        }
                    }
                    code.push(c);
                }
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lex::BlockComment;
                }
                _ => code.push(c),
            },
        }
    }
    (state, code)
}

/// One import spec plus the comment lines directly above it
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportSpec {
    /// Comment lines as rendered, indentation included
    leading_comments: Vec<String>,
    name: Option<String>,
    path: String,
    trailing_comment: Option<String>,
}

impl ImportSpec {
    fn sort_key(&self) -> (&str, &str) {
        (self.path.as_str(), self.name.as_deref().unwrap_or(""))
    }
}

/// A parenthesized import declaration
#[derive(Debug, Clone)]
struct ImportBlock {
    open: String,
    /// Specs separated by blank lines in the source
    groups: Vec<Vec<ImportSpec>>,
    /// Comments after the last spec, before `)`
    tail_comments: Vec<String>,
}

#[derive(Debug, Clone)]
enum Segment {
    Line(String),
    /// A line whose end lies inside a raw string literal
    Verbatim(String),
    Imports(ImportBlock),
}

/// A parsed Go source file
#[derive(Debug, Clone)]
pub struct GoSource {
    segments: Vec<Segment>,
}

/// Engine that sorts the import blocks of Go sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSorter;

impl Engine for ImportSorter {
    type Unit = GoSource;

    fn parse<R: Read>(&self, mut input: R) -> Result<GoSource, EngineError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        GoSource::parse(std::str::from_utf8(&bytes)?)
    }
}

/// Accumulates an import block while it is being read
struct BlockBuilder {
    open_line: usize,
    block: ImportBlock,
    current: Vec<ImportSpec>,
    pending_comments: Vec<String>,
}

impl BlockBuilder {
    fn new(open: &str, open_line: usize) -> Self {
        BlockBuilder {
            open_line,
            block: ImportBlock {
                open: open.to_string(),
                groups: Vec::new(),
                tail_comments: Vec::new(),
            },
            current: Vec::new(),
            pending_comments: Vec::new(),
        }
    }

    /// Consume one line of the block body.
    ///
    /// Returns `false` once the closing parenthesis is reached.
    fn feed(&mut self, line: &str, start: Lex, line_no: usize) -> Result<bool, EngineError> {
        if start == Lex::BlockComment {
            match line.find("*/") {
                Some(end) => {
                    let (comment, rest) = line.split_at(end + 2);
                    self.pending_comments.push(comment.to_string());
                    self.push_rest(rest, line_no)?;
                }
                None => self.pending_comments.push(line.trim_end().to_string()),
            }
            return Ok(true);
        }

        let trimmed = line.trim();
        if trimmed == ")" {
            return Ok(false);
        }
        if trimmed.is_empty() {
            self.end_group();
        } else if trimmed.starts_with("//") {
            self.pending_comments.push(format!("\t{trimmed}"));
        } else if trimmed.starts_with("/*") {
            match trimmed[2..].find("*/") {
                Some(end) => {
                    let (comment, rest) = trimmed.split_at(end + 4);
                    self.pending_comments.push(format!("\t{comment}"));
                    self.push_rest(rest, line_no)?;
                }
                None => self.pending_comments.push(format!("\t{trimmed}")),
            }
        } else {
            self.push_spec(trimmed, line_no)?;
        }
        Ok(true)
    }

    /// Handle whatever follows a closed block comment on the same line
    fn push_rest(&mut self, rest: &str, line_no: usize) -> Result<(), EngineError> {
        let rest = rest.trim();
        if rest.is_empty() {
            Ok(())
        } else {
            self.push_spec(rest, line_no)
        }
    }

    fn end_group(&mut self) {
        if !self.current.is_empty() {
            self.block.groups.push(std::mem::take(&mut self.current));
        }
    }

    fn push_spec(&mut self, trimmed: &str, line_no: usize) -> Result<(), EngineError> {
        let caps = IMPORT_SPEC_RE
            .captures(trimmed)
            .ok_or_else(|| EngineError::parse(line_no, "malformed import spec"))?;
        self.current.push(ImportSpec {
            leading_comments: std::mem::take(&mut self.pending_comments),
            name: caps.name("name").map(|m| m.as_str().to_string()),
            path: caps["path"].to_string(),
            trailing_comment: caps.name("comment").map(|m| m.as_str().trim_end().to_string()),
        });
        Ok(())
    }

    fn finish(mut self) -> ImportBlock {
        self.end_group();
        self.block.tail_comments = self.pending_comments;
        self.block
    }
}

impl GoSource {
    fn parse(text: &str) -> Result<Self, EngineError> {
        let mut segments = Vec::new();
        let mut seen_package = false;
        let mut block: Option<BlockBuilder> = None;
        let mut lex = Lex::Code;
        let mut lex_opened_at = 0;
        let mut line_count = 0;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            line_count = line_no;
            let start = lex;
            let (end, code) = scan_line(line, start);
            lex = end;
            if start == Lex::Code && end != Lex::Code {
                lex_opened_at = line_no;
            }

            if let Some(mut builder) = block.take() {
                if builder.feed(line, start, line_no)? {
                    block = Some(builder);
                } else {
                    segments.push(Segment::Imports(builder.finish()));
                }
                continue;
            }

            if !seen_package {
                let code = code.trim();
                if PACKAGE_RE.is_match(code) {
                    seen_package = true;
                } else if !code.is_empty() {
                    return Err(EngineError::parse(line_no, "expected package clause"));
                }
            } else if start == Lex::Code
                && end == Lex::Code
                && IMPORT_BLOCK_RE.is_match(code.trim())
            {
                block = Some(BlockBuilder::new(line.trim(), line_no));
                continue;
            }

            if end == Lex::RawString {
                segments.push(Segment::Verbatim(line.to_string()));
            } else {
                segments.push(Segment::Line(line.to_string()));
            }
        }

        if let Some(builder) = block {
            return Err(EngineError::parse(
                builder.open_line,
                "unterminated import block",
            ));
        }
        if !seen_package {
            return Err(EngineError::parse(
                line_count.max(1),
                "missing package clause",
            ));
        }
        match lex {
            Lex::Code => {}
            Lex::RawString => {
                return Err(EngineError::parse(lex_opened_at, "unterminated raw string"));
            }
            Lex::BlockComment => {
                return Err(EngineError::parse(lex_opened_at, "unterminated comment"));
            }
        }

        // Exactly one newline at end of file
        while matches!(segments.last(), Some(Segment::Line(l)) if l.trim().is_empty()) {
            segments.pop();
        }

        Ok(GoSource { segments })
    }
}

impl SourceUnit for GoSource {
    fn sort_imports(&mut self) {
        for segment in &mut self.segments {
            if let Segment::Imports(block) = segment {
                for group in &mut block.groups {
                    group.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
                    group.dedup();
                }
            }
        }
    }

    fn render(&self, sink: &mut dyn Write) -> Result<(), EngineError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Line(line) => {
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
                Segment::Verbatim(line) => {
                    out.push_str(line);
                    out.push('\n');
                }
                Segment::Imports(block) => render_block(block, &mut out),
            }
        }
        sink.write_all(out.as_bytes()).map_err(EngineError::Render)
    }
}

fn render_block(block: &ImportBlock, out: &mut String) {
    out.push_str(&block.open);
    out.push('\n');
    for (i, group) in block.groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for spec in group {
            for comment in &spec.leading_comments {
                out.push_str(comment);
                out.push('\n');
            }
            out.push('\t');
            if let Some(name) = &spec.name {
                out.push_str(name);
                out.push(' ');
            }
            out.push_str(&spec.path);
            if let Some(comment) = &spec.trailing_comment {
                out.push(' ');
                out.push_str(comment);
            }
            out.push('\n');
        }
    }
    for comment in &block.tail_comments {
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(")\n");
}
