use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::{DirTree, FlatItem, FlatKind};
use crate::theme::ThemeColors;

/// Tree widget that renders a pane's directory tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree: &'a DirTree,
    theme: &'a ThemeColors,
    use_icons: bool,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree: &'a DirTree, theme: &'a ThemeColors, use_icons: bool, focused: bool) -> Self {
        Self {
            tree,
            theme,
            use_icons,
            focused,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing characters.
    ///
    /// The ancestor chain decides where continuation lines are drawn.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();

        // For each ancestor level (1..depth), walk backwards to find the
        // ancestor at that depth and check whether it was a last sibling.
        for d in 1..item.depth {
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        if item.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Entry indicator by kind.
    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        if self.use_icons {
            match item.kind {
                FlatKind::Directory => "📁 ",
                FlatKind::File => "📄 ",
                FlatKind::Error => "⚠ ",
            }
        } else {
            match item.kind {
                FlatKind::Directory => "[D] ",
                FlatKind::File => "[F] ",
                FlatKind::Error => "[!] ",
            }
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.tree.flat_items;
        let selected = self.tree.selected_index;
        let visible_height = inner_area.height as usize;

        if items.is_empty() || visible_height == 0 {
            return;
        }

        let scroll = self.tree.scroll_offset;
        let visible_items = items.iter().enumerate().skip(scroll).take(visible_height);

        for (i, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::build_prefix(item, items, idx);
            let indicator = self.item_indicator(item);

            let is_selected = idx == selected && self.focused;
            let style = if is_selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match item.kind {
                    FlatKind::Directory => Style::default()
                        .fg(self.theme.tree_dir_fg)
                        .add_modifier(Modifier::BOLD),
                    FlatKind::File => Style::default().fg(self.theme.tree_file_fg),
                    FlatKind::Error => Style::default()
                        .fg(self.theme.error_fg)
                        .add_modifier(Modifier::ITALIC),
                }
            };

            let line_content = format!("{}{}{}", prefix, indicator, item.label);
            let line = Line::from(Span::styled(line_content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
