use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tmux_sessionizer::config::{ConfigFile, WindowConfig};
use tmux_sessionizer::use_cases::{self, EditTarget};

use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Edit(usize),
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Command,
}

/// Window configuration editor.
pub struct App {
    pub target: EditTarget,
    pub file: ConfigFile,
    pub mode: Mode,
    pub cursor: usize,
    pub field: Field,
    pub name_input: String,
    pub command_input: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub saved: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(target: EditTarget) -> Self {
        let mut file = target.initial.clone();
        let initial = file.initial_window_index();
        file.initial_active_window = Some(initial as i64);

        Self {
            target,
            file,
            mode: Mode::List,
            cursor: 0,
            field: Field::Name,
            name_input: String::new(),
            command_input: String::new(),
            message: None,
            error: None,
            saved: false,
            should_quit: false,
        }
    }

    pub fn initial_window(&self) -> usize {
        self.file.initial_window_index()
    }

    fn set_initial_window(&mut self, index: usize) {
        self.file.initial_active_window = Some(index as i64);
    }

    fn clear_feedback(&mut self) {
        self.message = None;
        self.error = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match self.mode {
            Mode::List => self.handle_list_key(key),
            Mode::Edit(_) | Mode::Add => self.handle_form_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let len = self.file.windows.len();

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up if ctrl => self.move_window_up(),
            KeyCode::Down if ctrl => self.move_window_down(),
            KeyCode::Char('K') => self.move_window_up(),
            KeyCode::Char('J') => self.move_window_down(),
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('a') => {
                self.clear_feedback();
                self.mode = Mode::Add;
                self.field = Field::Name;
                self.name_input.clear();
                self.command_input.clear();
            }
            KeyCode::Char('e') | KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(window) = self.file.windows.get(self.cursor) {
                    self.name_input = window.name.clone();
                    self.command_input = window.command.clone();
                    self.clear_feedback();
                    self.mode = Mode::Edit(self.cursor);
                    self.field = Field::Name;
                }
            }
            KeyCode::Char('d') => self.delete_window(),
            KeyCode::Char('i') => {
                if self.cursor < len {
                    self.set_initial_window(self.cursor);
                    self.clear_feedback();
                    self.message = Some(format!(
                        "Window '{}' will be active on open",
                        self.file.windows[self.cursor].name
                    ));
                }
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::List;
                self.clear_feedback();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.field = match self.field {
                    Field::Name => Field::Command,
                    Field::Command => Field::Name,
                };
            }
            KeyCode::Enter => self.commit_form(),
            KeyCode::Backspace => {
                self.focused_input().pop();
            }
            KeyCode::Char(c) if !ctrl => self.focused_input().push(c),
            _ => {}
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match self.field {
            Field::Name => &mut self.name_input,
            Field::Command => &mut self.command_input,
        }
    }

    fn commit_form(&mut self) {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            self.error = Some("Window name cannot be empty".to_string());
            return;
        }
        let window = WindowConfig::new(&name, self.command_input.trim());

        match self.mode {
            Mode::Edit(index) => {
                if let Some(slot) = self.file.windows.get_mut(index) {
                    *slot = window;
                }
                self.message = Some("Window updated".to_string());
            }
            Mode::Add => {
                self.file.windows.push(window);
                self.cursor = self.file.windows.len() - 1;
                self.message = Some("Window added".to_string());
            }
            Mode::List => {}
        }
        self.error = None;
        self.mode = Mode::List;
    }

    fn delete_window(&mut self) {
        self.clear_feedback();
        let len = self.file.windows.len();
        if len <= 1 {
            self.error = Some("Cannot delete the last window".to_string());
            return;
        }
        if self.cursor >= len {
            return;
        }

        let initial = self.initial_window();
        self.file.windows.remove(self.cursor);
        let new_initial = if self.cursor < initial {
            initial - 1
        } else if self.cursor == initial {
            0
        } else {
            initial
        };
        self.set_initial_window(new_initial);

        if self.cursor >= self.file.windows.len() {
            self.cursor = self.file.windows.len() - 1;
        }
        self.message = Some("Window deleted".to_string());
    }

    fn swap_windows(&mut self, a: usize, b: usize) {
        self.file.windows.swap(a, b);
        let initial = self.initial_window();
        if initial == a {
            self.set_initial_window(b);
        } else if initial == b {
            self.set_initial_window(a);
        }
    }

    fn move_window_up(&mut self) {
        if self.cursor > 0 && self.cursor < self.file.windows.len() {
            self.swap_windows(self.cursor, self.cursor - 1);
            self.cursor -= 1;
            self.clear_feedback();
            self.message = Some("Window moved up".to_string());
        }
    }

    fn move_window_down(&mut self) {
        if self.cursor + 1 < self.file.windows.len() {
            self.swap_windows(self.cursor, self.cursor + 1);
            self.cursor += 1;
            self.clear_feedback();
            self.message = Some("Window moved down".to_string());
        }
    }

    fn save(&mut self) {
        self.clear_feedback();
        match use_cases::save_edit(&self.target, &self.file) {
            Ok(()) => {
                tracing::info!(path = %self.target.path.display(), "window config saved");
                self.saved = true;
                self.should_quit = true;
                self.message = Some("Configuration saved!".to_string());
            }
            Err(e) => {
                tracing::warn!(path = %self.target.path.display(), error = %format!("{e:#}"), "failed to save window config");
                self.error = Some(format!("Error saving config: {:#}", e));
            }
        }
    }
}

/// Run the editor until the user saves or quits. Returns whether the config was saved.
pub fn run_editor(target: EditTarget) -> Result<bool> {
    let mut app = App::new(target);
    tracing::debug!(path = %app.target.path.display(), "opening config editor");

    super::with_terminal(|terminal| {
        while !app.should_quit {
            terminal.draw(|f| ui::draw_editor(f, &app))?;
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        Ok(())
    })?;

    Ok(app.saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tmux_sessionizer::config;

    fn target(path: PathBuf) -> EditTarget {
        EditTarget {
            path,
            initial: ConfigFile::default(),
            label: "test".to_string(),
        }
    }

    fn app() -> App {
        App::new(target(PathBuf::from("/nonexistent/config.json")))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn names(app: &App) -> Vec<&str> {
        app.file.windows.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn add_window_with_command() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Add);

        type_text(&mut app, "logs");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "tail -f log.txt");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.cursor, 3);
        let added = &app.file.windows[3];
        assert_eq!(added.name, "logs");
        assert_eq!(added.command, "tail -f log.txt");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Add);
        assert_eq!(app.error.as_deref(), Some("Window name cannot be empty"));
        assert_eq!(app.file.windows.len(), 3);
    }

    #[test]
    fn edit_prefills_and_replaces_window() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit(0));
        assert_eq!(app.name_input, "nvim");
        assert_eq!(app.command_input, "nvim");

        for _ in 0.."nvim".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "editor");
        press(&mut app, KeyCode::Enter);

        assert_eq!(names(&app), vec!["editor", "server", "term"]);
        assert_eq!(app.file.windows[0].command, "nvim");
    }

    #[test]
    fn escape_discards_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, Mode::List);
        assert_eq!(names(&app), vec!["nvim", "server", "term"]);
    }

    #[test]
    fn delete_refuses_last_window() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(names(&app), vec!["term"]);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(names(&app), vec!["term"]);
        assert_eq!(app.error.as_deref(), Some("Cannot delete the last window"));
    }

    #[test]
    fn delete_clamps_cursor() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(names(&app), vec!["nvim", "server"]);
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn moving_windows_keeps_initial_window_attached() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.initial_window(), 1);

        press(&mut app, KeyCode::Char('K'));
        assert_eq!(names(&app), vec!["server", "nvim", "term"]);
        assert_eq!(app.cursor, 0);
        assert_eq!(app.initial_window(), 0);

        press(&mut app, KeyCode::Char('J'));
        press(&mut app, KeyCode::Char('J'));
        assert_eq!(names(&app), vec!["nvim", "term", "server"]);
        assert_eq!(app.initial_window(), 2);
    }

    #[test]
    fn deleting_before_initial_window_shifts_it() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(names(&app), vec!["server", "term"]);
        assert_eq!(app.initial_window(), 1);
    }

    #[test]
    fn quit_without_saving() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let mut app = App::new(target(path.clone()));

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
        assert!(!app.saved);
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_config_and_quits() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let mut app = App::new(target(path.clone()));

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Char('s'));

        assert!(app.saved);
        assert!(app.should_quit);
        let saved = config::load_config_file(&path).unwrap();
        assert_eq!(saved.windows, ConfigFile::default().windows);
        assert_eq!(saved.initial_active_window, Some(1));
    }

    #[test]
    fn save_failure_keeps_editor_open() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut app = App::new(target(blocker.join("config.json")));

        press(&mut app, KeyCode::Char('s'));

        assert!(!app.saved);
        assert!(!app.should_quit);
        assert!(app.error.as_deref().unwrap().starts_with("Error saving config"));
    }
}
