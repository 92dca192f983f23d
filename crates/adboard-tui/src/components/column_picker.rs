//! Column customizer popup: searchable list with visibility checkboxes

use super::centered;
use crate::theme::{Palette, StatusColor};
use adboard_core::table::CustomizerEntry;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    entries: &[CustomizerEntry],
    search: &str,
    cursor: usize,
    palette: &Palette,
) {
    let popup = centered(area, 50, 24);
    frame.render_widget(Clear, popup);

    let selected = entries.iter().filter(|e| e.visible).count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(Span::styled(" 自定义列 ", palette.header()))
        .title_bottom(Span::styled(
            " Space 显示/隐藏 · Shift+↑↓ 排序 · Del 移除 · Ctrl+R 清空 ",
            palette.fg(StatusColor::Neutral),
        ));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("搜索: ", palette.fg(StatusColor::Neutral)),
            Span::raw(search.to_string()),
            Span::styled("█", palette.fg(StatusColor::Focus)),
        ])),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("已选 {} 项", selected),
            palette.fg(StatusColor::Neutral),
        )),
        chunks[1],
    );

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mark = if entry.visible { "[x]" } else { "[ ]" };
            let style = if entry.visible {
                palette.fg(StatusColor::Success)
            } else {
                palette.fg(StatusColor::Neutral)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", mark), style),
                Span::raw(entry.label.clone()),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !entries.is_empty() {
        state.select(Some(cursor.min(entries.len() - 1)));
    }
    let list = List::new(items)
        .highlight_style(palette.selected_row())
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, chunks[2], &mut state);
}
