//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.adjust(true),
        KeyCode::Char('-') | KeyCode::Left => app.adjust(false),
        KeyCode::Char('1') => app.switch_preset("baseline"),
        KeyCode::Char('2') => app.switch_preset("dense_rows"),
        KeyCode::Char('3') => app.switch_preset("winter"),
        KeyCode::Char('r') => app.reset(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn arrows_move_selection() {
        let mut app = App::new("baseline");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn number_keys_switch_preset() {
        let mut app = App::new("baseline");
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.preset_name, "winter");
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.preset_name, "dense_rows");
    }

    #[test]
    fn q_quits() {
        let mut app = App::new("baseline");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }
}
