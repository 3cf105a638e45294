//! Batch output naming via `--name-pattern` templates.
//!
//! A pattern is parsed once, before any file is touched, so an unknown
//! placeholder fails the whole batch up front rather than file by file.
//!
//! ## Placeholders
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{stem}` | input filename without extension |
//! | `{ext}` | resolved output extension, no leading dot |
//! | `{width}` | requested width, or `auto` |
//! | `{height}` | requested height, or `auto` |
//! | `{index}` | 1-based position in the sorted input listing |
//!
//! `{width}` and `{height}` are the *requested* values, not the computed
//! output size. A numeric placeholder may carry a zero-pad width, e.g.
//! `{index:03}` → `007`. Literal braces are written `{{` and `}}`.
//!
//! The rendered name excludes the extension; it is appended afterwards.

use crate::error::{ImgshError, Result};

/// Placeholder names, in the order they are listed to users.
pub const PLACEHOLDERS: &[&str] = &["stem", "ext", "width", "height", "index"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Stem,
    Ext,
    Width,
    Height,
    Index,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "stem" => Some(Field::Stem),
            "ext" => Some(Field::Ext),
            "width" => Some(Field::Width),
            "height" => Some(Field::Height),
            "index" => Some(Field::Index),
            _ => None,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Field::Width | Field::Height | Field::Index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, zero_pad: usize },
}

/// Values substituted into a pattern for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameContext<'a> {
    pub stem: &'a str,
    /// Extension with or without the leading dot.
    pub extension: &'a str,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub index: usize,
}

/// A validated `--name-pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    source: String,
    segments: Vec<Segment>,
}

impl NamePattern {
    /// Parse and validate a pattern.
    pub fn parse(pattern: &str) -> Result<Self> {
        let malformed = |reason: &str| ImgshError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern.trim().is_empty() {
            return Err(malformed("pattern is empty"));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(malformed("unmatched '}' (write '}}' for a literal brace)")),
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                return Err(malformed(
                                    "unclosed '{' (write '{{' for a literal brace)",
                                ));
                            }
                            Some(ch) => body.push(ch),
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(&body, &malformed)?);
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the file name (without extension) for one input.
    pub fn render(&self, ctx: &NameContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, zero_pad } => {
                    let value = match field {
                        Field::Stem => ctx.stem.to_string(),
                        Field::Ext => ctx.extension.trim_start_matches('.').to_string(),
                        Field::Width => auto_or(ctx.width, *zero_pad),
                        Field::Height => auto_or(ctx.height, *zero_pad),
                        Field::Index => format!("{:0width$}", ctx.index, width = *zero_pad),
                    };
                    out.push_str(&value);
                }
            }
        }
        out
    }
}

fn parse_field(body: &str, malformed: &dyn Fn(&str) -> ImgshError) -> Result<Segment> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };
    let field = Field::parse(name).ok_or_else(|| ImgshError::InvalidPlaceholder(name.to_string()))?;

    let zero_pad = match spec {
        None => 0,
        Some(_) if !field.is_numeric() => {
            return Err(malformed("only width, height and index accept a padding spec"));
        }
        Some(spec) => spec
            .strip_prefix('0')
            .and_then(|digits| digits.parse::<usize>().ok())
            .filter(|&n| n <= 16)
            .ok_or_else(|| malformed("padding spec must look like ':03'"))?,
    };

    Ok(Segment::Field { field, zero_pad })
}

fn auto_or(value: Option<u32>, zero_pad: usize) -> String {
    match value {
        Some(v) => format!("{:0width$}", v, width = zero_pad),
        None => "auto".to_string(),
    }
}
