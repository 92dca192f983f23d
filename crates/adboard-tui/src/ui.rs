//! TUI rendering logic

use crate::app::{App, Focus};
use crate::components::{
    centered, column_picker, error_panel, field_picker, filter_bar, help_modal, stats_cards,
    MaterialTable,
};
use crate::theme::StatusColor;
use adboard_core::table::TableSnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw one frame; `now_ms` anchors every windowed value on screen
pub fn render(frame: &mut Frame, app: &mut App, now_ms: i64) {
    let snapshot = app.snapshot(now_ms);
    let cards = app
        .store
        .data()
        .map(|data| data.overview.cards(&app.fields, app.window, now_ms))
        .unwrap_or_default();

    let show_filters = app.focus == Focus::Filters || !app.criteria.is_empty();
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(stats_cards::card_rows(cards.len()) * stats_cards::CARD_HEIGHT),
            Constraint::Length(if show_filters { filter_bar::FILTER_BAR_HEIGHT } else { 0 }),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app, &snapshot);
    stats_cards::render(frame, chunks[1], &cards, &app.above_average, &app.palette);
    if show_filters {
        let active = (app.focus == Focus::Filters).then_some(app.filter_field);
        filter_bar::render(frame, chunks[2], &app.inputs, active, app.window, &app.palette);
    }

    match app.store.load_state().error_message() {
        Some(message) => error_panel::render(frame, chunks[3], message, &app.palette),
        None => {
            MaterialTable {
                snapshot: &snapshot,
                selected_row: app.selected_row,
                selected_column: app.selected_column,
                preview: app.preview.active(),
                focused: app.focus == Focus::Table,
            }
            .render(frame, chunks[3], &app.palette);
            render_preview(frame, chunks[3], app, &snapshot);
        }
    }
    render_status_bar(frame, chunks[4], app);

    match app.focus {
        Focus::Customizer => {
            let entries = app.customizer_entries();
            column_picker::render(
                frame,
                area,
                &entries,
                app.customizer.search(),
                app.customizer_cursor,
                &app.palette,
            );
        }
        Focus::Fields => field_picker::render(
            frame,
            area,
            &app.fields,
            &app.above_average,
            app.fields_cursor,
            &app.palette,
        ),
        Focus::Help => help_modal::render(frame, area, &app.palette),
        Focus::Table | Focus::Filters => {}
    }

    app.toasts.render(frame, area, &app.palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, snapshot: &TableSnapshot) {
    let palette = &app.palette;
    let mut spans = vec![
        Span::styled(" 视频广告素材 ", palette.header().add_modifier(Modifier::REVERSED)),
        Span::raw(format!(" {} ", app.date.format("%Y-%m-%d"))),
        Span::styled(format!("· {} ", app.window.label()), palette.fg(StatusColor::Important)),
        Span::styled(
            format!("· {} 个素材 ", snapshot.pagination.total_rows),
            palette.fg(StatusColor::Neutral),
        ),
    ];

    let active_filters = app.criteria.active_count() + app.above_average.active().count();
    if active_filters > 0 {
        spans.push(Span::styled(
            format!("· {} 个筛选条件 ", active_filters),
            palette.fg(StatusColor::Warning),
        ));
    }
    if app.is_loading() {
        spans.extend(app.spinner.render_with_label("加载中"));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Floating preview of the hovered material's video
fn render_preview(frame: &mut Frame, area: Rect, app: &App, snapshot: &TableSnapshot) {
    let Some(id) = app.preview.active() else {
        return;
    };
    let Some(row) = snapshot.rows.iter().find(|r| r.id == id) else {
        return;
    };

    let palette = &app.palette;
    let popup = centered(area, 48, 6);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.fg(StatusColor::Important))
        .title(Span::styled(format!(" ▶ {} ", row.name), palette.header()));
    let text = vec![
        Line::from(Span::raw(row.video_url.clone())),
        Line::from(""),
        Line::from(Span::styled(
            "o 打开视频 · y 复制ID · Esc 关闭",
            palette.fg(StatusColor::Neutral),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hint = match app.focus {
        Focus::Table => "? 帮助 │ s 排序 │ / 筛选 │ c 自定义列 │ f 字段 │ w 窗口 │ [ ] 日期 │ n/p 翻页 │ q 退出",
        Focus::Filters => "Tab 下一项 │ Del 清空 │ Enter/Esc 完成",
        Focus::Customizer => "↑↓ 选择 │ 输入以搜索 │ Esc 完成",
        Focus::Fields => "↑↓ 选择 │ Space 切换 │ Esc 完成",
        Focus::Help => "任意键关闭",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, app.palette.fg(StatusColor::Neutral))),
        area,
    );
}
