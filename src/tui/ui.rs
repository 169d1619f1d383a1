use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use tmux_sessionizer::picker::PickerState;

use super::app::{App, Field, Mode};

fn selected_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(40, 40, 60))
        .add_modifier(Modifier::BOLD)
}

fn key_hint(key: &str, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(key.to_string(), Style::default().fg(color)),
        Span::styled(format!(" {}  ", label), Style::default().fg(Color::DarkGray)),
    ]
}

fn titled_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

pub fn draw_picker(f: &mut Frame, title: &str, state: &PickerState) {
    let search_height = if state.search_enabled() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(search_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    if state.search_enabled() {
        let search = Paragraph::new(Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.query().to_string(), Style::default().fg(Color::White)),
            Span::styled("▊", Style::default().fg(Color::LightCyan)),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        f.render_widget(search, chunks[0]);
    }

    draw_picker_list(f, title, state, chunks[1]);

    let mut hints = Vec::new();
    if state.search_enabled() {
        hints.extend(key_hint("↑/↓", "nav", Color::LightCyan));
        hints.extend(key_hint("type", "search", Color::LightMagenta));
        hints.extend(key_hint("Enter", "select", Color::LightGreen));
        hints.extend(key_hint("Esc", "quit", Color::LightCyan));
    } else {
        hints.extend(key_hint("j/k", "nav", Color::LightCyan));
        hints.extend(key_hint("Enter", "select", Color::LightGreen));
        hints.extend(key_hint("q", "quit", Color::LightCyan));
    }
    f.render_widget(Paragraph::new(Line::from(hints)), chunks[2]);
}

fn draw_picker_list(f: &mut Frame, title: &str, state: &PickerState, area: Rect) {
    let block = titled_block(
        format!(" {} ({}/{}) ", title, state.filtered().len(), state.all().len()),
        Color::LightCyan,
    );

    if state.filtered().is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No matches.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .filtered()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let (prefix, style) = if i == state.cursor() {
                ("▸ ", selected_style())
            } else {
                ("  ", Style::default().fg(Color::Gray))
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(opt.label.clone(), style),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor()));
    f.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

pub fn draw_editor(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    match app.mode {
        Mode::List => draw_window_list(f, app, chunks[0]),
        Mode::Edit(_) | Mode::Add => draw_window_form(f, app, chunks[0]),
    }

    let feedback = match (&app.error, &app.message) {
        (Some(err), _) => Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::LightRed),
        )),
        (None, Some(msg)) => Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::LightGreen),
        )),
        (None, None) => Line::default(),
    };
    f.render_widget(Paragraph::new(feedback), chunks[1]);

    draw_editor_status_bar(f, app, chunks[2]);
}

fn draw_window_list(f: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(
        format!(" Windows ({}) ", app.target.label),
        Color::LightMagenta,
    );
    let initial = app.initial_window();

    let items: Vec<ListItem> = app
        .file
        .windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let style = if i == app.cursor {
                selected_style()
            } else {
                Style::default().fg(Color::Gray)
            };
            let prefix = if i == app.cursor { "▸ " } else { "  " };
            let command = if window.command.is_empty() {
                "<none>".to_string()
            } else {
                window.command.clone()
            };

            let mut spans = vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}: {}", i, window.name), style),
                Span::styled(format!("  {}", command), Style::default().fg(Color::DarkGray)),
            ];
            if i == initial {
                spans.push(Span::styled("  (active)", Style::default().fg(Color::LightYellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_window_form(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.mode {
        Mode::Edit(index) => format!(" Edit window {} ", index),
        _ => " Add window ".to_string(),
    };
    let block = titled_block(title, Color::LightGreen);

    let field_line = |label: &str, value: &str, focused: bool| {
        let label_style = if focused {
            Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(format!("{:<9}", label), label_style),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ];
        if focused {
            spans.push(Span::styled("▊", Style::default().fg(Color::LightCyan)));
        }
        Line::from(spans)
    };

    let lines = vec![
        field_line("Name:", &app.name_input, app.field == Field::Name),
        field_line("Command:", &app.command_input, app.field == Field::Command),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_editor_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut hints = Vec::new();
    match app.mode {
        Mode::List => {
            hints.extend(key_hint("j/k", "nav", Color::LightCyan));
            hints.extend(key_hint("a", "add", Color::LightGreen));
            hints.extend(key_hint("e", "edit", Color::LightGreen));
            hints.extend(key_hint("d", "del", Color::LightRed));
            hints.extend(key_hint("K/J", "move", Color::LightMagenta));
            hints.extend(key_hint("i", "active", Color::LightYellow));
            hints.extend(key_hint("s", "save", Color::LightGreen));
            hints.extend(key_hint("q", "quit", Color::LightCyan));
        }
        Mode::Edit(_) | Mode::Add => {
            hints.extend(key_hint("Tab", "field", Color::LightCyan));
            hints.extend(key_hint("Enter", "apply", Color::LightGreen));
            hints.extend(key_hint("Esc", "cancel", Color::LightCyan));
        }
    }
    f.render_widget(Paragraph::new(Line::from(hints)), area);
}
