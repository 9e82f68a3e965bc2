//! Styled text runs.
//!
//! A `FormattedOutput` is an ordered list of `TextSegment`s. Concatenating the
//! segment texts yields exactly the plain text that ends up on screen, so the
//! presentation layer never has to invent characters of its own.

use std::slice;

/// Semantic color identifiers (UI-agnostic).
///
/// These are translated to actual terminal colors by the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SegmentColor {
    Primary,
    Secondary,
    Accent,
    Warning,
    Error,
    Muted,
    #[default]
    Default,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSegment {
    pub text: String,
    pub color: SegmentColor,
    pub bold: bool,
    /// Target of the run when it is a link.
    pub url: Option<String>,
}

impl TextSegment {
    /// Creates a default-styled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates a segment with the given color.
    pub fn colored(text: impl Into<String>, color: SegmentColor) -> Self {
        Self {
            text: text.into(),
            color,
            ..Self::default()
        }
    }

    /// Creates a link segment. The visible text is the URL itself.
    pub fn link(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            text: url.clone(),
            color: SegmentColor::Secondary,
            bold: false,
            url: Some(url),
        }
    }

    /// Marks the segment bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Attaches a link target without changing the visible text.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns an empty segment with the same color, weight and link.
    pub fn empty_like(&self) -> Self {
        Self {
            text: String::new(),
            color: self.color,
            bold: self.bold,
            url: self.url.clone(),
        }
    }

    /// Returns true if both segments carry the same style and link.
    pub fn same_style(&self, other: &TextSegment) -> bool {
        self.color == other.color && self.bold == other.bold && self.url == other.url
    }
}

/// An ordered sequence of styled segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedOutput(Vec<TextSegment>);

impl FormattedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps plain text as a single default-styled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![TextSegment::plain(text)])
    }

    /// Appends a segment (builder style).
    #[must_use]
    pub fn with(mut self, segment: TextSegment) -> Self {
        self.0.push(segment);
        self
    }

    /// Appends a line break segment (builder style).
    #[must_use]
    pub fn newline(self) -> Self {
        self.with(TextSegment::plain("\n"))
    }

    pub fn push(&mut self, segment: TextSegment) {
        self.0.push(segment);
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.0
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<TextSegment> {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated text of all segments.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|s| s.text.as_str()).collect()
    }

    /// Number of Unicode scalar values across all segments.
    pub fn char_count(&self) -> usize {
        self.0.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Returns true if `self` is a prefix of `other`: every segment but the
    /// last is identical, and the last one is a same-styled text prefix of
    /// its counterpart.
    pub fn is_prefix_of(&self, other: &FormattedOutput) -> bool {
        let Some((last, head)) = self.0.split_last() else {
            return true;
        };
        if self.0.len() > other.0.len() {
            return false;
        }
        if head.iter().zip(&other.0).any(|(a, b)| a != b) {
            return false;
        }
        let counterpart = &other.0[head.len()];
        last.same_style(counterpart) && counterpart.text.starts_with(&last.text)
    }

    /// Prefix that is not equal to `other`.
    pub fn is_strict_prefix_of(&self, other: &FormattedOutput) -> bool {
        self != other && self.is_prefix_of(other)
    }
}

impl From<Vec<TextSegment>> for FormattedOutput {
    fn from(segments: Vec<TextSegment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<TextSegment> for FormattedOutput {
    fn from_iter<I: IntoIterator<Item = TextSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FormattedOutput {
    type Item = &'a TextSegment;
    type IntoIter = slice::Iter<'a, TextSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Command output as produced by handlers: either raw text or segments.
///
/// This union only exists at the handler boundary. Everything past the
/// dispatcher works on `FormattedOutput` via [`Content::into_lines`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Plain(String),
    Formatted(FormattedOutput),
}

impl Content {
    /// Normalizes into transcript lines.
    ///
    /// Plain text yields one single-segment output per embedded line break
    /// (a trailing break does not produce an extra empty line). Formatted
    /// output is kept as one line; its `\n` segments are painted as breaks.
    pub fn into_lines(self) -> Vec<FormattedOutput> {
        match self {
            Content::Plain(text) if text.is_empty() => vec![FormattedOutput::plain("")],
            Content::Plain(text) => text.lines().map(FormattedOutput::plain).collect(),
            Content::Formatted(output) => vec![output],
        }
    }

    pub fn plain_text(&self) -> String {
        match self {
            Content::Plain(text) => text.clone(),
            Content::Formatted(output) => output.plain_text(),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Plain(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Plain(text.to_string())
    }
}

impl From<FormattedOutput> for Content {
    fn from(output: FormattedOutput) -> Self {
        Content::Formatted(output)
    }
}
