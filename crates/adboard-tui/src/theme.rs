//! Color language for the dashboard
//!
//! - Green: healthy ROI, success
//! - Red: ROI below break-even, errors
//! - Yellow: warnings, active filters
//! - Cyan: focus and selection
//! - Magenta: sort indicators and headline values
//! - Gray: missing data, hints

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Success,
    Error,
    Warning,
    Neutral,
    Focus,
    Important,
}

/// Resolves semantic roles to terminal styles
///
/// Monochrome mode (`--no-color` / `NO_COLOR`) keeps modifiers and drops
/// every foreground color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    pub monochrome: bool,
}

impl Palette {
    pub fn new(monochrome: bool) -> Self {
        Self { monochrome }
    }

    pub fn color(&self, role: StatusColor) -> Color {
        if self.monochrome {
            return Color::Reset;
        }
        match role {
            StatusColor::Success => Color::Green,
            StatusColor::Error => Color::Red,
            StatusColor::Warning => Color::Yellow,
            StatusColor::Neutral => Color::DarkGray,
            StatusColor::Focus => Color::Cyan,
            StatusColor::Important => Color::Magenta,
        }
    }

    pub fn fg(&self, role: StatusColor) -> Style {
        Style::default().fg(self.color(role))
    }

    pub fn header(&self) -> Style {
        self.fg(StatusColor::Focus).add_modifier(Modifier::BOLD)
    }

    /// Selected row; reversed so it stays visible without color
    pub fn selected_row(&self) -> Style {
        if self.monochrome {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        }
    }

    pub fn selected_cell(&self) -> Style {
        self.fg(StatusColor::Focus)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.fg(StatusColor::Focus)
        } else {
            self.fg(StatusColor::Neutral)
        }
    }

    /// ROI at or above break-even reads green
    pub fn roi(&self, roi: Option<f64>) -> Style {
        match roi {
            Some(v) if v >= 1.0 => self.fg(StatusColor::Success),
            Some(_) => self.fg(StatusColor::Error),
            None => self.fg(StatusColor::Neutral),
        }
    }
}
