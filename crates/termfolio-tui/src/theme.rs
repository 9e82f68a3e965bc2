//! Color themes.
//!
//! Segments carry semantic colors; a [`Theme`] maps them to terminal colors.

use ratatui::style::{Color, Modifier, Style};
use termfolio_core::config::ThemeName;
use termfolio_core::line::LineKind;
use termfolio_core::segment::{SegmentColor, TextSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub text: Color,
    pub caret: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                primary: Color::Green,
                secondary: Color::Cyan,
                accent: Color::Magenta,
                warning: Color::Yellow,
                error: Color::Red,
                muted: Color::DarkGray,
                text: Color::Reset,
                caret: Color::Green,
            },
            ThemeName::Dracula => Self {
                primary: Color::Rgb(0x50, 0xfa, 0x7b),
                secondary: Color::Rgb(0x8b, 0xe9, 0xfd),
                accent: Color::Rgb(0xff, 0x79, 0xc6),
                warning: Color::Rgb(0xf1, 0xfa, 0x8c),
                error: Color::Rgb(0xff, 0x55, 0x55),
                muted: Color::Rgb(0x62, 0x72, 0xa4),
                text: Color::Rgb(0xf8, 0xf8, 0xf2),
                caret: Color::Rgb(0xbd, 0x93, 0xf9),
            },
            ThemeName::Solarized => Self {
                primary: Color::Rgb(0x85, 0x99, 0x00),
                secondary: Color::Rgb(0x26, 0x8b, 0xd2),
                accent: Color::Rgb(0xd3, 0x36, 0x82),
                warning: Color::Rgb(0xb5, 0x89, 0x00),
                error: Color::Rgb(0xdc, 0x32, 0x2f),
                muted: Color::Rgb(0x58, 0x6e, 0x75),
                text: Color::Rgb(0x93, 0xa1, 0xa1),
                caret: Color::Rgb(0x2a, 0xa1, 0x98),
            },
        }
    }

    pub fn color(&self, color: SegmentColor) -> Color {
        match color {
            SegmentColor::Primary => self.primary,
            SegmentColor::Secondary => self.secondary,
            SegmentColor::Accent => self.accent,
            SegmentColor::Warning => self.warning,
            SegmentColor::Error => self.error,
            SegmentColor::Muted => self.muted,
            SegmentColor::Default => self.text,
        }
    }

    /// Color for default-colored text on a line of `kind`.
    fn base_color(&self, kind: LineKind) -> Color {
        match kind {
            LineKind::Error => self.error,
            LineKind::Info => self.muted,
            LineKind::CommandEcho | LineKind::Output | LineKind::Welcome => self.text,
        }
    }

    pub fn segment_style(&self, segment: &TextSegment, kind: LineKind) -> Style {
        let fg = match segment.color {
            SegmentColor::Default => self.base_color(kind),
            color => self.color(color),
        };
        let mut style = Style::default().fg(fg);
        if segment.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if segment.url.is_some() {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    pub fn caret_style(&self) -> Style {
        Style::default().fg(self.caret)
    }

    pub fn prompt_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::Default)
    }
}
