use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tmux_sessionizer::picker::{self, ListOption, PickerEvent, PickerState};

use super::ui;

/// Show a picker and block until the user confirms or cancels.
/// Returns `None` on cancel.
pub fn pick(title: &str, options: Vec<ListOption>, allow_search: bool) -> Result<Option<ListOption>> {
    let mut state = PickerState::new(options, allow_search);
    tracing::debug!(title, count = state.all().len(), search = state.search_enabled(), "opening picker");

    super::with_terminal(|terminal| {
        while !state.is_done() {
            terminal.draw(|f| ui::draw_picker(f, title, &state))?;

            if let Event::Key(key) = event::read()? {
                if let Some(ev) = map_key(key, state.search_enabled()) {
                    picker::reduce(&mut state, ev);
                }
            }
        }
        Ok(())
    })?;

    let selection = state.into_selection();
    tracing::debug!(title, selected = ?selection.as_ref().map(|o| &o.value), "picker closed");
    Ok(selection)
}

/// Translate a key press into a picker event.
///
/// With search on, every printable key (including `j`, `k`, `q` and space)
/// edits the query, so navigation and cancel use arrows, Ctrl-N/P and Esc.
pub fn map_key(key: KeyEvent, search_enabled: bool) -> Option<PickerEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(PickerEvent::Cancel),
        KeyCode::Char('p') if ctrl => Some(PickerEvent::MoveUp),
        KeyCode::Char('n') if ctrl => Some(PickerEvent::MoveDown),
        KeyCode::Up => Some(PickerEvent::MoveUp),
        KeyCode::Down => Some(PickerEvent::MoveDown),
        KeyCode::Enter => Some(PickerEvent::Confirm),
        KeyCode::Esc => Some(PickerEvent::Cancel),
        KeyCode::Backspace if search_enabled => Some(PickerEvent::Backspace),
        KeyCode::Char(c) if search_enabled && !ctrl => Some(PickerEvent::Input(c)),
        KeyCode::Char('k') if !ctrl => Some(PickerEvent::MoveUp),
        KeyCode::Char('j') if !ctrl => Some(PickerEvent::MoveDown),
        KeyCode::Char(' ') => Some(PickerEvent::Confirm),
        KeyCode::Char('q') => Some(PickerEvent::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn letters_are_navigation_without_search() {
        assert_eq!(map_key(key(KeyCode::Char('j')), false), Some(PickerEvent::MoveDown));
        assert_eq!(map_key(key(KeyCode::Char('k')), false), Some(PickerEvent::MoveUp));
        assert_eq!(map_key(key(KeyCode::Char('q')), false), Some(PickerEvent::Cancel));
        assert_eq!(map_key(key(KeyCode::Char(' ')), false), Some(PickerEvent::Confirm));
        assert_eq!(map_key(key(KeyCode::Char('x')), false), None);
        assert_eq!(map_key(key(KeyCode::Backspace), false), None);
    }

    #[test]
    fn letters_are_query_input_with_search() {
        for c in ['j', 'k', 'q', ' ', 'x'] {
            assert_eq!(map_key(key(KeyCode::Char(c)), true), Some(PickerEvent::Input(c)));
        }
        assert_eq!(map_key(key(KeyCode::Backspace), true), Some(PickerEvent::Backspace));
    }

    #[test]
    fn arrows_enter_and_cancel_work_in_both_modes() {
        for search in [false, true] {
            assert_eq!(map_key(key(KeyCode::Up), search), Some(PickerEvent::MoveUp));
            assert_eq!(map_key(key(KeyCode::Down), search), Some(PickerEvent::MoveDown));
            assert_eq!(map_key(key(KeyCode::Enter), search), Some(PickerEvent::Confirm));
            assert_eq!(map_key(key(KeyCode::Esc), search), Some(PickerEvent::Cancel));
            assert_eq!(map_key(ctrl('c'), search), Some(PickerEvent::Cancel));
            assert_eq!(map_key(ctrl('n'), search), Some(PickerEvent::MoveDown));
            assert_eq!(map_key(ctrl('p'), search), Some(PickerEvent::MoveUp));
        }
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release, false), None);
    }
}
