//! Toast notifications for load results and row actions
//!
//! Toasts stack in the bottom-right corner. Pushing a message that is already
//! on screen refreshes it and bumps a repeat counter instead of stacking a
//! copy, so a reload loop or a held key does not flood the corner.

use crate::theme::{Palette, StatusColor};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::time::{Duration, Instant};

const MAX_VISIBLE: usize = 4;
const TOAST_HEIGHT: u16 = 3;
/// Rows kept free below the stack for the status bar
const BOTTOM_MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
    Info,
}

impl ToastKind {
    fn role(&self) -> StatusColor {
        match self {
            Self::Success => StatusColor::Success,
            Self::Warning => StatusColor::Warning,
            Self::Error => StatusColor::Error,
            Self::Info => StatusColor::Focus,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::Info => "ℹ",
        }
    }

    fn lifetime(&self) -> Duration {
        match self {
            Self::Error => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    /// How many times the same message was pushed while shown
    pub repeats: u32,
    shown_at: Instant,
    lifetime: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            repeats: 1,
            shown_at: Instant::now(),
            lifetime: kind.lifetime(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.lifetime
    }

    fn same_as(&self, other: &Toast) -> bool {
        self.kind == other.kind && self.message == other.message
    }

    fn line(&self, palette: &Palette) -> Line<'_> {
        let mut spans = vec![
            Span::styled(
                format!("{} ", self.kind.icon()),
                palette.fg(self.kind.role()).add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.message.as_str()),
        ];
        if self.repeats > 1 {
            spans.push(Span::styled(
                format!(" ×{}", self.repeats),
                palette.fg(StatusColor::Neutral),
            ));
        }
        Line::from(spans)
    }
}

/// Stack of live toasts, newest at the bottom
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast; an identical live one is refreshed and moved to the bottom
    pub fn push(&mut self, toast: Toast) {
        match self.toasts.iter().position(|t| t.same_as(&toast)) {
            Some(index) => {
                let mut existing = self.toasts.remove(index);
                existing.repeats += 1;
                existing.shown_at = toast.shown_at;
                self.toasts.push(existing);
            }
            None => self.toasts.push(toast),
        }
    }

    pub fn clear_expired(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let start = self.toasts.len().saturating_sub(MAX_VISIBLE);
        let visible = &self.toasts[start..];
        if visible.is_empty() {
            return;
        }

        let stack_height = visible.len() as u16 * TOAST_HEIGHT;
        let mut y = area.height.saturating_sub(stack_height + BOTTOM_MARGIN);
        for toast in visible {
            let line = toast.line(palette);
            let width = (line.width() as u16 + 4).min(area.width);
            let rect = Rect {
                x: area.x + area.width.saturating_sub(width + 1),
                y: area.y + y,
                width,
                height: TOAST_HEIGHT.min(area.height.saturating_sub(y)),
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(palette.fg(toast.kind.role()));

            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(line).block(block), rect);
            y += TOAST_HEIGHT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expired_toasts_are_dropped() {
        let mut toasts = ToastManager::new();
        toasts.push(Toast::info("该列不可排序"));
        toasts.push(Toast::error("网络请求失败"));

        tokio::time::advance(Duration::from_secs(4)).await;
        toasts.clear_expired();

        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.latest().map(|t| t.kind), Some(ToastKind::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_message_refreshes_instead_of_stacking() {
        let mut toasts = ToastManager::new();
        toasts.push(Toast::warning("列宽已达上限"));
        toasts.push(Toast::success("已加载 30 个素材"));

        tokio::time::advance(Duration::from_secs(2)).await;
        toasts.push(Toast::warning("列宽已达上限"));

        assert_eq!(toasts.len(), 2);
        let latest = toasts.latest().unwrap();
        assert_eq!(latest.message, "列宽已达上限");
        assert_eq!(latest.repeats, 2);

        // The refreshed toast outlives the one pushed alongside its first copy
        tokio::time::advance(Duration::from_secs(2)).await;
        toasts.clear_expired();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.latest().map(|t| t.kind), Some(ToastKind::Warning));
    }

    #[test]
    fn test_same_text_different_kind_stacks() {
        let mut toasts = ToastManager::new();
        toasts.push(Toast::info("已复制"));
        toasts.push(Toast::error("已复制"));
        assert_eq!(toasts.len(), 2);
    }
}
