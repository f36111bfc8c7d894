use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if matches!(app.mode, AppMode::Dialog(_)) {
        handle_dialog_key(app, key);
        return;
    }

    // Global bindings work regardless of focus.
    match key.code {
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::BackTab => {
            app.cycle_focus_back();
            return;
        }
        KeyCode::F(2) => {
            app.swap_panes();
            return;
        }
        KeyCode::F(5) => {
            app.request_move();
            return;
        }
        KeyCode::F(8) => {
            app.clear_all();
            return;
        }
        _ => {}
    }

    if app.focus.is_input() {
        handle_input_key(app, key);
    } else {
        handle_tree_key(app, key);
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    let pane = app.focus.pane();
    match key.code {
        KeyCode::Enter => app.apply_path_input(pane),
        KeyCode::Char(c) => app.pane_mut(pane).input.insert_char(c),
        KeyCode::Backspace => app.pane_mut(pane).input.delete_char(),
        KeyCode::Left => app.pane_mut(pane).input.move_cursor_left(),
        KeyCode::Right => app.pane_mut(pane).input.move_cursor_right(),
        KeyCode::Home => app.pane_mut(pane).input.cursor_home(),
        KeyCode::End => app.pane_mut(pane).input.cursor_end(),
        _ => {}
    }
}

fn handle_tree_key(app: &mut App, key: KeyEvent) {
    let pane = app.focus.pane();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.tree_mut(pane).select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.tree_mut(pane).select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.tree_mut(pane).select_first(),
        KeyCode::End | KeyCode::Char('G') => app.tree_mut(pane).select_last(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.expand_tree(pane),
        KeyCode::Left | KeyCode::Char('h') => app.tree_mut(pane).collapse_selected(),
        KeyCode::Char('m') => app.request_move(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_dialog(true),
        KeyCode::Char('n') | KeyCode::Esc => app.confirm_dialog(false),
        _ => {}
    }
}

/// The scroll wheel moves the selection in the focused tree.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if matches!(app.mode, AppMode::Dialog(_)) || app.focus.is_input() {
        return;
    }
    let pane = app.focus.pane();
    match mouse.kind {
        MouseEventKind::ScrollDown => app.tree_mut(pane).select_next(),
        MouseEventKind::ScrollUp => app.tree_mut(pane).select_previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DialogKind, Focus};
    use crate::config::AppConfig;
    use crate::event::Pane;
    use std::fs;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn setup_app() -> (App, mpsc::UnboundedReceiver<crate::event::Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(&AppConfig::default(), tx), rx)
    }

    #[tokio::test]
    async fn ctrl_q_quits() {
        let (mut app, _rx) = setup_app();
        handle_key_event(&mut app, ctrl('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn tab_cycles_focus() {
        let (mut app, _rx) = setup_app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::SourceTree);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::SourceInput);
    }

    #[tokio::test]
    async fn typing_lands_in_focused_input() {
        let (mut app, _rx) = setup_app();
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        handle_key_event(&mut app, key(KeyCode::Char('t')));
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.source.input.text, "/");
        assert!(app.target.input.text.is_empty());
    }

    #[tokio::test]
    async fn enter_applies_path_in_input_focus() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f.txt"), "x").unwrap();
        let (mut app, _rx) = setup_app();
        for c in dir.path().display().to_string().chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.source.path.as_deref(), Some(dir.path()));
    }

    #[tokio::test]
    async fn tree_navigation_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("b"), "").unwrap();
        let (mut app, _rx) = setup_app();
        app.seed_path(Pane::Source, dir.path());
        app.focus = Focus::SourceTree;

        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.source.tree.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.source.tree.selected_index, 2);
        handle_key_event(&mut app, key(KeyCode::Up));
        assert_eq!(app.source.tree.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('G')));
        assert_eq!(app.source.tree.selected_index, 2);
        handle_key_event(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.source.tree.selected_index, 0);
    }

    #[tokio::test]
    async fn dialog_keys_confirm_and_cancel() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("s");
        let target = tmp.path().join("t");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&target).unwrap();

        let (mut app, _rx) = setup_app();
        app.seed_path(Pane::Source, &source);
        app.seed_path(Pane::Target, &target);

        handle_key_event(&mut app, key(KeyCode::F(5)));
        assert_eq!(app.mode, AppMode::Dialog(DialogKind::ConfirmMove));

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.moving);

        handle_key_event(&mut app, key(KeyCode::F(5)));
        handle_key_event(&mut app, key(KeyCode::Char('y')));
        assert!(app.moving);
    }

    #[tokio::test]
    async fn plain_q_types_instead_of_quitting() {
        let (mut app, _rx) = setup_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.source.input.text, "q");
    }

    #[tokio::test]
    async fn scroll_wheel_moves_tree_selection() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("b"), "").unwrap();
        let (mut app, _rx) = setup_app();
        app.seed_path(Pane::Source, dir.path());

        let scroll = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };

        // Input focus ignores the wheel.
        handle_mouse_event(&mut app, scroll(MouseEventKind::ScrollDown));
        assert_eq!(app.source.tree.selected_index, 0);

        app.focus = Focus::SourceTree;
        handle_mouse_event(&mut app, scroll(MouseEventKind::ScrollDown));
        assert_eq!(app.source.tree.selected_index, 1);
        handle_mouse_event(&mut app, scroll(MouseEventKind::ScrollUp));
        assert_eq!(app.source.tree.selected_index, 0);
    }
}
