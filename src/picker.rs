//! Filterable single-select list state, independent of any terminal.
//!
//! The terminal layer turns key presses into [`PickerEvent`]s and feeds them
//! to [`reduce`]. Drawing only ever reads [`PickerState`].

/// Candidates above this count get a search box.
pub const SEARCH_THRESHOLD: usize = 3;

/// One selectable entry: display text plus an opaque payload (usually a path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOption {
    pub label: String,
    pub value: String,
}

impl ListOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Case-insensitive substring filter on labels. Keeps the original order.
pub fn filter(all: &[ListOption], query: &str) -> Vec<ListOption> {
    if query.is_empty() {
        return all.to_vec();
    }
    let query = query.to_lowercase();
    all.iter()
        .filter(|opt| opt.label.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Keep `cursor` if it still points into a list of `len` items, else clamp to the last one.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.min(len - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    MoveUp,
    MoveDown,
    Confirm,
    Cancel,
    Backspace,
    Input(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    all: Vec<ListOption>,
    filtered: Vec<ListOption>,
    query: String,
    cursor: usize,
    search_enabled: bool,
    confirmed: Option<ListOption>,
    cancelled: bool,
}

impl PickerState {
    /// Start a pick over `options`. Search is only shown when `allow_search`
    /// is set and there are more than [`SEARCH_THRESHOLD`] options.
    pub fn new(options: Vec<ListOption>, allow_search: bool) -> Self {
        let search_enabled = allow_search && options.len() > SEARCH_THRESHOLD;
        let mut state = Self {
            all: options,
            filtered: Vec::new(),
            query: String::new(),
            cursor: 0,
            search_enabled,
            confirmed: None,
            cancelled: false,
        };
        state.refilter();
        state
    }

    pub fn all(&self) -> &[ListOption] {
        &self.all
    }

    pub fn filtered(&self) -> &[ListOption] {
        &self.filtered
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    pub fn confirmed(&self) -> Option<&ListOption> {
        self.confirmed.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_done(&self) -> bool {
        self.confirmed.is_some() || self.cancelled
    }

    /// The highlighted option, if the filtered list is non-empty.
    pub fn highlighted(&self) -> Option<&ListOption> {
        self.filtered.get(self.cursor)
    }

    /// Result of a finished pick: the chosen option, or `None` if cancelled.
    pub fn into_selection(self) -> Option<ListOption> {
        if self.cancelled {
            None
        } else {
            self.confirmed
        }
    }

    /// Re-apply the current query without treating it as an edit: the cursor
    /// keeps its position, clamped to the new list.
    pub fn refilter(&mut self) {
        self.filtered = filter(&self.all, &self.query);
        self.cursor = clamp_cursor(self.cursor, self.filtered.len());
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.query);
        self.filtered = filter(&self.all, &self.query);
        self.cursor = 0;
    }
}

/// Apply one event. Events after the pick is confirmed or cancelled are ignored.
pub fn reduce(state: &mut PickerState, event: PickerEvent) {
    if state.is_done() {
        return;
    }

    match event {
        PickerEvent::MoveUp => {
            state.cursor = state.cursor.saturating_sub(1);
        }
        PickerEvent::MoveDown => {
            if state.cursor + 1 < state.filtered.len() {
                state.cursor += 1;
            }
        }
        PickerEvent::Confirm => {
            let Some(highlighted) = state.highlighted().cloned() else {
                return;
            };
            state.confirmed = state.all.iter().find(|opt| **opt == highlighted).cloned();
        }
        PickerEvent::Cancel => {
            state.cancelled = true;
        }
        PickerEvent::Backspace => {
            if state.search_enabled && !state.query.is_empty() {
                state.edit_query(|q| {
                    q.pop();
                });
            }
        }
        PickerEvent::Input(c) => {
            if state.search_enabled && !c.is_control() {
                state.edit_query(|q| q.push(c));
            }
        }
    }
}
