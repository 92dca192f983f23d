//! Braille spinner shown while a fetch is in flight

use ratatui::{
    style::{Color, Style},
    text::Span,
};
use std::time::{Duration, Instant};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug)]
pub struct Spinner {
    frame: usize,
    last_update: Instant,
    frame_duration: Duration,
    color: Color,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            frame: 0,
            last_update: Instant::now(),
            frame_duration: Duration::from_millis(80),
            color: Color::Cyan,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Advance one frame once the frame duration has elapsed
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.frame_duration {
            self.frame = (self.frame + 1) % FRAMES.len();
            self.last_update = now;
        }
    }

    pub fn render(&self) -> Span<'static> {
        Span::styled(FRAMES[self.frame], Style::default().fg(self.color))
    }

    /// Spinner followed by the loading label
    pub fn render_with_label(&self, label: &str) -> Vec<Span<'static>> {
        vec![self.render(), Span::raw(format!(" {}", label))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_stays_in_bounds() {
        let mut spinner = Spinner::new();
        for _ in 0..50 {
            spinner.tick();
        }
        assert!(spinner.frame < FRAMES.len());
    }

    #[test]
    fn test_label_follows_frame() {
        let spinner = Spinner::new().with_color(Color::Yellow);
        let spans = spinner.render_with_label("加载中");
        assert_eq!(spans[0].content, "⠋");
        assert_eq!(spans[1].content, " 加载中");
        assert_eq!(spinner.color, Color::Yellow);
    }
}
