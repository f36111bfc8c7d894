use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Widget},
};

use crate::app::PathInput;
use crate::theme::ThemeColors;

/// Bordered single-line path input with a block cursor.
pub struct PathInputWidget<'a> {
    title: &'a str,
    input: &'a PathInput,
    theme: &'a ThemeColors,
    focused: bool,
}

impl<'a> PathInputWidget<'a> {
    pub fn new(title: &'a str, input: &'a PathInput, theme: &'a ThemeColors, focused: bool) -> Self {
        Self {
            title,
            input,
            theme,
            focused,
        }
    }
}

impl<'a> Widget for PathInputWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            self.theme.border_focused_fg
        } else {
            self.theme.border_fg
        };
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.input.text.is_empty() && !self.focused {
            let placeholder = Line::from(Span::styled(
                "Enter path...",
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
            buf.set_line(inner.x, inner.y, &placeholder, inner.width);
            return;
        }

        let text = &self.input.text;
        let cursor_pos = self.input.cursor;
        let max_width = inner.width as usize;

        let (before, cursor_char, after) = if cursor_pos < text.len() {
            let ch_len = text[cursor_pos..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            (
                &text[..cursor_pos],
                &text[cursor_pos..cursor_pos + ch_len],
                &text[cursor_pos + ch_len..],
            )
        } else {
            (text.as_str(), " ", "")
        };

        // Truncate from the left when the text is too long for the box.
        let total_len = before.len() + 1 + after.len();
        let before_display = if total_len > max_width && before.len() > max_width.saturating_sub(2)
        {
            let mut skip = before.len().saturating_sub(max_width.saturating_sub(2));
            while skip < before.len() && !before.is_char_boundary(skip) {
                skip += 1;
            }
            &before[skip..]
        } else {
            before
        };

        let text_style = Style::default().fg(self.theme.tree_fg);
        let cursor_style = if self.focused {
            Style::default()
                .bg(self.theme.tree_fg)
                .fg(self.theme.tree_selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            text_style
        };

        let spans = vec![
            Span::styled(before_display, text_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, text_style),
        ];
        let line = Line::from(spans);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeColors;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn renders_title_and_text() {
        let theme = ThemeColors::dark();
        let mut input = PathInput::default();
        input.set("/home/user/downloads".to_string());
        let widget = PathInputWidget::new("Source", &input, &theme, true);

        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Source"));
        assert!(content.contains("/home/user/downloads"));
    }

    #[test]
    fn placeholder_when_empty_and_unfocused() {
        let theme = ThemeColors::dark();
        let input = PathInput::default();
        let widget = PathInputWidget::new("Target", &input, &theme, false);

        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(buffer_to_string(&buf, area).contains("Enter path..."));
    }

    #[test]
    fn focused_border_uses_accent_color() {
        let theme = ThemeColors::dark();
        let input = PathInput::default();
        let area = Rect::new(0, 0, 20, 3);

        let mut buf = Buffer::empty(area);
        PathInputWidget::new("Source", &input, &theme, true).render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().fg, theme.border_focused_fg);

        let mut buf = Buffer::empty(area);
        PathInputWidget::new("Source", &input, &theme, false).render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().fg, theme.border_fg);
    }

    #[test]
    fn long_text_truncates_from_left() {
        let theme = ThemeColors::dark();
        let mut input = PathInput::default();
        input.set("/a/very/long/path/that/overflows/the/box/ending".to_string());
        let widget = PathInputWidget::new("Source", &input, &theme, true);

        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        // The tail (near the cursor) stays visible.
        assert!(buffer_to_string(&buf, area).contains("ending"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let theme = ThemeColors::dark();
        let input = PathInput::default();
        let widget = PathInputWidget::new("Source", &input, &theme, true);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
