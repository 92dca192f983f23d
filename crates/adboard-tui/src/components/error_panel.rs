//! Panel shown in place of the table when the latest load failed

use crate::theme::{Palette, StatusColor};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let error = palette.fg(StatusColor::Error);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(error)
        .title(Span::styled(" 加载失败 ", error.add_modifier(Modifier::BOLD)));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!("✗ {}", message), error)),
        Line::from(""),
        Line::from(vec![
            Span::styled("按 ", palette.fg(StatusColor::Neutral)),
            Span::styled("r", palette.fg(StatusColor::Important)),
            Span::styled(" 重试", palette.fg(StatusColor::Neutral)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
