//! Advanced filter inputs shown above the table

use crate::app::FilterField;
use crate::theme::{Palette, StatusColor};
use adboard_core::analytics::TimeWindow;
use adboard_core::filter::{parse_threshold, FilterInputs};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const FILTER_BAR_HEIGHT: u16 = 3;

/// A threshold field holding text that does not parse as a number
pub fn is_malformed(field: FilterField, inputs: &FilterInputs) -> bool {
    let value = field.value(inputs);
    field != FilterField::Name && !value.trim().is_empty() && parse_threshold(value).is_none()
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    inputs: &FilterInputs,
    active: Option<FilterField>,
    window: TimeWindow,
    palette: &Palette,
) {
    let fields = FilterField::all();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, fields.len() as u32); fields.len()])
        .split(area);

    for (field, chunk) in fields.iter().zip(chunks.iter()) {
        let focused = active == Some(*field);
        let value = field.value(inputs);

        let mut spans = vec![Span::raw(value.to_string())];
        if focused {
            spans.push(Span::styled("█", palette.fg(StatusColor::Focus)));
        } else if value.is_empty() {
            spans.push(Span::styled("不限", palette.fg(StatusColor::Neutral)));
        }
        let title_style = if is_malformed(*field, inputs) {
            palette.fg(StatusColor::Warning)
        } else if focused {
            palette.header()
        } else {
            palette.fg(StatusColor::Neutral)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(focused))
            .title(Span::styled(
                format!(" {} ", field.label(window)),
                title_style.add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), *chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_detection() {
        let inputs = FilterInputs {
            name: "abc".to_string(),
            spend: "12x".to_string(),
            roi: "1.5".to_string(),
            ..Default::default()
        };
        assert!(!is_malformed(FilterField::Name, &inputs));
        assert!(is_malformed(FilterField::Spend, &inputs));
        assert!(!is_malformed(FilterField::Roi, &inputs));
        assert!(!is_malformed(FilterField::RecentRoi, &inputs));
    }
}
