//! Overview field selection popup

use super::centered;
use crate::theme::{Palette, StatusColor};
use adboard_core::analytics::{AboveAverageFilter, FieldSelection, OverviewMetric};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    fields: &FieldSelection,
    above_average: &AboveAverageFilter,
    cursor: usize,
    palette: &Palette,
) {
    let metrics = OverviewMetric::all();
    let popup = centered(area, 44, metrics.len() as u16 + 4);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = metrics
        .iter()
        .map(|metric| {
            let selected = fields.is_selected(*metric);
            let mut spans = vec![
                Span::styled(
                    if selected { "[x] " } else { "[ ] " },
                    if selected {
                        palette.fg(StatusColor::Success)
                    } else {
                        palette.fg(StatusColor::Neutral)
                    },
                ),
                Span::raw(metric.label()),
            ];
            if above_average.is_active(*metric) {
                spans.push(Span::styled("  ≥均值", palette.fg(StatusColor::Warning)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(Span::styled(" 选择字段 ", palette.header()))
        .title_bottom(Span::styled(
            " Space 显示/隐藏 · a 仅看高于均值 ",
            palette.fg(StatusColor::Neutral),
        ));

    let mut state = ListState::default();
    state.select(Some(cursor.min(metrics.len().saturating_sub(1))));
    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(palette.selected_row())
            .highlight_symbol("› "),
        popup,
        &mut state,
    );
}
