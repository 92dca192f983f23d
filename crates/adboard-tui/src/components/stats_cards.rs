//! Overview cards: headline value plus a windowed sparkline

use crate::theme::{Palette, StatusColor};
use adboard_core::analytics::{AboveAverageFilter, SeriesPoint, StatsCard};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

/// Cards per row
pub const CARDS_PER_ROW: usize = 5;
/// Height of one card row
pub const CARD_HEIGHT: u16 = 5;

/// Rows needed for `count` cards
pub fn card_rows(count: usize) -> u16 {
    count.div_ceil(CARDS_PER_ROW) as u16
}

/// Scale points to 0..=100 for the sparkline widget
pub fn sparkline_data(points: &[SeriesPoint]) -> Vec<u64> {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let range = max - min;
    points
        .iter()
        .map(|p| {
            if range > 0.0 {
                (((p.value - min) / range) * 100.0).round() as u64
            } else {
                50
            }
        })
        .collect()
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    cards: &[StatsCard],
    above_average: &AboveAverageFilter,
    palette: &Palette,
) {
    if cards.is_empty() {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); card_rows(cards.len()) as usize])
        .split(area);

    for (row_area, chunk) in rows.iter().zip(cards.chunks(CARDS_PER_ROW)) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW])
            .split(*row_area);
        for (card_area, card) in columns.iter().zip(chunk) {
            render_card(frame, *card_area, card, above_average.is_active(card.metric), palette);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &StatsCard, filtering: bool, palette: &Palette) {
    let mut title = vec![Span::styled(format!(" {} ", card.title), palette.header())];
    if filtering {
        title.push(Span::styled("≥均值 ", palette.fg(StatusColor::Warning)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(filtering))
        .title(Line::from(title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            card.value.as_str(),
            palette
                .fg(StatusColor::Important)
                .add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    let data = sparkline_data(&card.points);
    frame.render_widget(
        Sparkline::default()
            .data(&data)
            .max(100)
            .style(palette.fg(StatusColor::Focus)),
        chunks[1],
    );
}
