use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// One-row status line: the latest status message, plus an inline progress
/// bar while a move is running.
pub struct StatusBarWidget<'a> {
    message: &'a str,
    is_error: bool,
    progress: Option<(f64, usize, usize)>,
    theme: &'a ThemeColors,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(message: &'a str, is_error: bool, theme: &'a ThemeColors) -> Self {
        Self {
            message,
            is_error,
            progress: None,
            theme,
        }
    }

    pub fn progress(mut self, progress: Option<(f64, usize, usize)>) -> Self {
        self.progress = progress;
        self
    }

    fn progress_cell(percentage: f64, moved: usize, total: usize, width: usize) -> String {
        let bar_width = width.saturating_sub(2);
        let clamped = percentage.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * bar_width as f64).round() as usize;
        let bar: String =
            "█".repeat(filled) + &"░".repeat(bar_width.saturating_sub(filled));
        format!("{} {:>3.0}% ({}/{})", bar, clamped, moved, total)
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        let message_style = if self.is_error {
            Style::default()
                .bg(self.theme.error_fg)
                .fg(self.theme.status_fg)
                .add_modifier(Modifier::BOLD)
        } else if self.progress.is_some() {
            Style::default().fg(self.theme.warning_fg)
        } else {
            Style::default().fg(self.theme.success_fg)
        };

        let mut spans = Vec::new();

        let progress_display = self
            .progress
            .map(|(pct, moved, total)| Self::progress_cell(pct, moved, total, 24));
        // Display width, not byte length: the bar glyphs are multi-byte.
        let progress_len = progress_display.as_deref().map(|s| s.chars().count());

        let message_width = width.saturating_sub(progress_len.map_or(0, |l| l + 1));
        let message_display: String = if self.message.len() > message_width {
            self.message.chars().take(message_width).collect()
        } else {
            format!("{:<width$}", self.message, width = message_width)
        };
        spans.push(Span::styled(message_display, message_style));

        if let Some(progress_text) = progress_display {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                progress_text,
                Style::default().fg(self.theme.info_fg),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
