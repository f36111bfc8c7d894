use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind};
use crate::theme::ThemeColors;

/// Modal confirmation overlay, rendered centered on top of everything else.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    source: Option<&'a Path>,
    target: Option<&'a Path>,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(
        mode: &'a AppMode,
        source: Option<&'a Path>,
        target: Option<&'a Path>,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            mode,
            source,
            target,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }

    fn message_lines(&self) -> Vec<String> {
        let display = |p: Option<&Path>| {
            p.map(|p| p.display().to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        match self.mode {
            AppMode::Dialog(DialogKind::ConfirmMove) => vec![
                "Move all content from:".to_string(),
                display(self.source),
                "to:".to_string(),
                display(self.target),
            ],
            AppMode::Dialog(DialogKind::CreateTarget) => vec![
                "Target directory doesn't exist:".to_string(),
                display(self.target),
                "Create it?".to_string(),
            ],
            AppMode::Normal => Vec::new(),
        }
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.message_lines();
        if lines.is_empty() {
            return;
        }

        let title = match self.mode {
            AppMode::Dialog(DialogKind::ConfirmMove) => " Confirm Move ",
            AppMode::Dialog(DialogKind::CreateTarget) => " Create Directory ",
            AppMode::Normal => return,
        };

        let longest = lines.iter().map(|l| l.len()).max().unwrap_or(0);
        let dialog_width = (longest as u16 + 6)
            .max(34)
            .min(area.width.saturating_sub(4));
        let dialog_height = (lines.len() as u16 + 4).min(area.height.saturating_sub(2));
        let rect = Self::centered_rect(dialog_width, dialog_height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        for (i, text) in lines.iter().enumerate() {
            if i as u16 >= inner.height.saturating_sub(1) {
                break;
            }
            let style = if i % 2 == 1 {
                // Path lines stand out from the prose around them.
                Style::default().fg(self.theme.info_fg)
            } else {
                Style::default().fg(self.theme.status_fg)
            };
            let line = Line::from(Span::styled(text.as_str(), style));
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }

        let hint = "[y] Confirm  [n/Esc] Cancel";
        let hint_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);
        let hint_line = Line::from(Span::styled(hint, hint_style));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}
