use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Focus};
use crate::components::dialog::DialogWidget;
use crate::components::path_input::PathInputWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::event::Pane;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let rows = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    let panes =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);

    render_pane(app, frame, Pane::Source, panes[0]);
    render_pane(app, frame, Pane::Target, panes[1]);

    let status = StatusBarWidget::new(&app.status_message, app.status_is_error, &app.theme)
        .progress(app.progress);
    frame.render_widget(status, rows[1]);

    render_hints(app, frame, rows[2]);

    let dialog = DialogWidget::new(
        &app.mode,
        app.source.path.as_deref(),
        app.target.path.as_deref(),
        &app.theme,
    );
    frame.render_widget(dialog, area);
}

fn render_pane(app: &mut App, frame: &mut Frame, pane: Pane, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(area);

    let input_focused = app.focus.is_input() && app.focus.pane() == pane;
    let tree_focused = !app.focus.is_input() && app.focus.pane() == pane;

    // Keep the selection visible before borrowing the tree for rendering.
    let tree_height = rows[1].height.saturating_sub(2) as usize;
    app.pane_mut(pane).tree.update_scroll(tree_height);

    let pane_state = app.pane(pane);
    let input = PathInputWidget::new(pane.title(), &pane_state.input, &app.theme, input_focused);
    frame.render_widget(input, rows[0]);

    let border_color = if tree_focused {
        app.theme.border_focused_fg
    } else {
        app.theme.border_fg
    };
    let title = match pane_state.tree.root() {
        Some(root) => format!(" {} ", root.name),
        None => " No directory ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let tree_widget = TreeWidget::new(&pane_state.tree, &app.theme, app.use_icons, tree_focused)
        .block(block);
    frame.render_widget(tree_widget, rows[1]);
}

fn render_hints(app: &App, frame: &mut Frame, area: Rect) {
    let hints = "Tab:focus  Enter:apply/expand  F2:swap  F5:move  F8:clear  Ctrl+Q:quit";
    let line = Line::from(Span::styled(
        hints,
        Style::default()
            .fg(app.theme.dim_fg)
            .add_modifier(Modifier::DIM),
    ));
    frame.render_widget(
        ratatui::widgets::Paragraph::new(line),
        area,
    );
}
