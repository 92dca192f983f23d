//! Keybinding reference overlay

use super::centered;
use crate::theme::{Palette, StatusColor};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// (section, [(keys, description)])
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "表格",
        &[
            ("j/k ↑/↓", "选择行"),
            ("h/l ←/→", "选择列"),
            ("s / Enter", "排序 (升序 → 降序 → 取消)"),
            ("+ / -", "调整列宽"),
            ("< / >", "左移 / 右移列"),
            ("x", "隐藏列"),
            ("n/p g/G", "翻页 / 首页 / 末页"),
            ("z", "切换每页条数"),
        ],
    ),
    (
        "数据",
        &[
            ("w", "切换时间窗口"),
            ("[ / ]", "前一天 / 后一天"),
            ("r / F5", "重新加载"),
            ("/", "高级筛选"),
            ("R", "清除筛选"),
            ("c", "自定义列"),
            ("f", "选择字段"),
        ],
    ),
    (
        "素材",
        &[
            ("预览列", "停留以预览视频"),
            ("y", "复制素材ID"),
            ("o", "打开视频"),
        ],
    ),
    ("通用", &[("?", "帮助"), ("Esc", "关闭"), ("q", "退出")]),
];

fn lines(palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (section, bindings) in SECTIONS {
        lines.push(Line::from(Span::styled(*section, palette.header())));
        for (keys, description) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", keys), palette.fg(StatusColor::Important)),
                Span::raw(*description),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette) {
    let content = lines(palette);
    let popup = centered(area, 52, content.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(Span::styled(" 快捷键 ", palette.header()))
        .title_bottom(Span::styled(" 任意键关闭 ", palette.fg(StatusColor::Neutral)));
    frame.render_widget(
        Paragraph::new(content).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
