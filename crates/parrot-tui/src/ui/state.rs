// Self-contained view state machines. Nothing in here touches the stores;
// handlers read these and decide what to mutate.

use std::collections::HashSet;

use uuid::Uuid;

use parrot_core::models::ConversationId;

/// Single-line text input with a char-based cursor
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Clear and return the current contents
    pub fn take(&mut self) -> String {
        let text = self.text();
        self.clear();
        text
    }
}

/// An in-flight note drag (mouse held down over a note card)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDrag {
    /// Note the drag started on
    pub source: Uuid,
    /// Note currently under the pointer, if any
    pub target: Option<Uuid>,
    /// Set once the pointer leaves the source card; a press-release on the
    /// same card is a click, not a drag
    pub moved: bool,
}

/// State for the storage grid: cursor, multi-select, drags and body editing
#[derive(Debug, Default)]
pub struct NotesViewState {
    /// Index into the visible note list
    pub cursor: usize,
    /// Notes marked for a pending merge (selection order preserved)
    selected: Vec<Uuid>,
    pub drag: Option<NoteDrag>,
    /// Char offset in the focused note body while editing
    pub body_cursor: usize,
    /// Anchor for a formatting range; set with mark, applied to body_cursor
    pub format_anchor: Option<usize>,
}

impl NotesViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp_cursor(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.cursor = 0;
        } else if self.cursor >= visible_len {
            self.cursor = visible_len - 1;
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self, visible_len: usize) {
        if visible_len > 0 && self.cursor + 1 < visible_len {
            self.cursor += 1;
        }
    }

    pub fn selection(&self) -> &[Uuid] {
        &self.selected
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Toggle membership; keeps first-selected-first order for merge titles
    pub fn toggle_select(&mut self, id: Uuid) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Clear and return the current selection
    pub fn take_selection(&mut self) -> Vec<Uuid> {
        std::mem::take(&mut self.selected)
    }

    pub fn begin_drag(&mut self, source: Uuid) {
        self.drag = Some(NoteDrag {
            source,
            target: None,
            moved: false,
        });
    }

    pub fn update_drag(&mut self, over: Option<Uuid>) {
        if let Some(drag) = self.drag.as_mut() {
            if over != Some(drag.source) {
                drag.moved = true;
            }
            drag.target = over.filter(|id| *id != drag.source);
        }
    }

    pub fn take_drag(&mut self) -> Option<NoteDrag> {
        self.drag.take()
    }

    pub fn set_format_anchor(&mut self) {
        self.format_anchor = Some(self.body_cursor);
    }

    /// Resolve the marked range as (start, end), or None without an anchor
    pub fn take_format_range(&mut self) -> Option<(usize, usize)> {
        let anchor = self.format_anchor.take()?;
        let (start, end) = if anchor <= self.body_cursor {
            (anchor, self.body_cursor)
        } else {
            (self.body_cursor, anchor)
        };
        (start < end).then_some((start, end))
    }
}

/// Cursor over a flat list (question sets, knowledge cards, settings rows)
#[derive(Debug, Default)]
pub struct ListState {
    pub selected: usize,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Tracks which conversation ids the sidebar shows collapsed
#[derive(Debug, Default)]
pub struct SidebarState {
    pub cursor: usize,
    collapsed: HashSet<ConversationId>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, id: ConversationId) -> bool {
        self.collapsed.contains(&id)
    }

    pub fn toggle_collapsed(&mut self, id: ConversationId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::new();
        for c in "helo".chars() {
            input.insert(c);
        }
        input.move_left();
        input.insert('l');
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), 4);

        input.move_end();
        input.backspace();
        assert_eq!(input.text(), "hell");
    }

    #[test]
    fn test_text_input_take_clears() {
        let mut input = TextInput::from_text("draft");
        assert_eq!(input.take(), "draft");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_selection_preserves_order() {
        let mut state = NotesViewState::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        state.toggle_select(b);
        state.toggle_select(a);
        state.toggle_select(c);
        assert_eq!(state.selection(), &[b, a, c]);

        state.toggle_select(a);
        assert_eq!(state.selection(), &[b, c]);
    }

    #[test]
    fn test_drag_ignores_self_target() {
        let mut state = NotesViewState::new();
        let source = Uuid::new_v4();
        let other = Uuid::new_v4();
        state.begin_drag(source);

        state.update_drag(Some(source));
        assert_eq!(state.drag.as_ref().unwrap().target, None);
        assert!(!state.drag.as_ref().unwrap().moved);

        state.update_drag(Some(other));
        let drag = state.take_drag().unwrap();
        assert_eq!(drag.target, Some(other));
        assert!(drag.moved);
    }

    #[test]
    fn test_format_range_normalizes_direction() {
        let mut state = NotesViewState::new();
        state.body_cursor = 8;
        state.set_format_anchor();
        state.body_cursor = 3;
        assert_eq!(state.take_format_range(), Some((3, 8)));

        // Empty range yields nothing
        state.body_cursor = 5;
        state.set_format_anchor();
        assert_eq!(state.take_format_range(), None);
    }

    #[test]
    fn test_sidebar_collapse_toggles_per_conversation() {
        let mut sidebar = SidebarState::new();
        let a = ConversationId::new();
        let b = ConversationId::new();
        sidebar.toggle_collapsed(a);
        assert!(sidebar.is_collapsed(a));
        assert!(!sidebar.is_collapsed(b));
        sidebar.toggle_collapsed(a);
        assert!(!sidebar.is_collapsed(a));
    }

    #[test]
    fn test_list_state_bounds() {
        let mut list = ListState::new();
        list.up();
        assert_eq!(list.selected, 0);
        list.down(3);
        list.down(3);
        list.down(3);
        assert_eq!(list.selected, 2);
        list.clamp(1);
        assert_eq!(list.selected, 0);
    }
}
