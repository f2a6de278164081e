// Floating overlay cards drawn above the active view: highlight cards with
// their own reply box, sticky notes, question and clarification popups.
// Overlays are spawned from bus signals and live until closed.

use uuid::Uuid;

use crate::ui::state::TextInput;

const DEFAULT_WIDTH: u16 = 42;
const DEFAULT_HEIGHT: u16 = 10;
const SPAWN_ORIGIN: (u16, u16) = (6, 3);
const SPAWN_STEP: u16 = 2;
const SPAWN_WRAP: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    /// A highlighted passage with an inline reply box. While `in_card` is on
    /// (the default), replies accumulate inside the card instead of the main
    /// chat thread.
    Highlight {
        highlight_id: Uuid,
        replies: Vec<String>,
        in_card: bool,
    },
    StickyNote {
        editable: bool,
    },
    QuestionPopup,
    Clarification,
}

#[derive(Debug)]
pub struct Overlay {
    pub id: Uuid,
    pub kind: OverlayKind,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Card body (highlight text, sticky contents, question list)
    pub text: String,
    /// Reply or edit buffer, depending on kind
    pub input: TextInput,
}

impl Overlay {
    fn new(kind: OverlayKind, text: String, x: u16, y: u16) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            text,
            input: TextInput::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match &self.kind {
            OverlayKind::Highlight { .. } => "Highlight",
            OverlayKind::StickyNote { editable: true } => "Sticky note (editing)",
            OverlayKind::StickyNote { editable: false } => "Sticky note",
            OverlayKind::QuestionPopup => "Questions",
            OverlayKind::Clarification => "Clarification",
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(
            self.kind,
            OverlayKind::Highlight { .. } | OverlayKind::StickyNote { editable: true }
        )
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }

    /// Whether the point sits on the card's top border (the drag handle)
    pub fn on_title_bar(&self, col: u16, row: u16) -> bool {
        row == self.y && col >= self.x && col < self.x + self.width
    }

    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.x = self.x.saturating_add_signed(dx);
        self.y = self.y.saturating_add_signed(dy);
    }

    /// Grow or shrink the card, clamped to a usable minimum
    pub fn resize_by(&mut self, dw: i16, dh: i16) {
        const MIN_WIDTH: u16 = 16;
        const MIN_HEIGHT: u16 = 5;
        self.width = self.width.saturating_add_signed(dw).max(MIN_WIDTH);
        self.height = self.height.saturating_add_signed(dh).max(MIN_HEIGHT);
    }
}

#[derive(Debug, Clone, Copy)]
struct OverlayDrag {
    id: Uuid,
    grab_dx: u16,
    grab_dy: u16,
}

/// Owns all floating cards. Last element draws on top; focus follows the
/// topmost card unless cycled explicitly.
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlays: Vec<Overlay>,
    focused: Option<Uuid>,
    drag: Option<OverlayDrag>,
    spawn_count: u16,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    pub fn focused(&self) -> Option<&Overlay> {
        let id = self.focused?;
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn focused_mut(&mut self) -> Option<&mut Overlay> {
        let id = self.focused?;
        self.overlays.iter_mut().find(|o| o.id == id)
    }

    pub fn focused_id(&self) -> Option<Uuid> {
        self.focused
    }

    fn next_spawn_pos(&mut self) -> (u16, u16) {
        let step = (self.spawn_count % SPAWN_WRAP) * SPAWN_STEP;
        self.spawn_count += 1;
        (SPAWN_ORIGIN.0 + step, SPAWN_ORIGIN.1 + step / 2)
    }

    fn push(&mut self, overlay: Overlay) -> Uuid {
        let id = overlay.id;
        self.overlays.push(overlay);
        self.focused = Some(id);
        id
    }

    /// New highlight cards keep their replies in-card; routing to the main
    /// thread is the opt-in.
    pub fn spawn_highlight(&mut self, highlight_id: Uuid, text: String) -> Uuid {
        let (x, y) = self.next_spawn_pos();
        self.push(Overlay::new(
            OverlayKind::Highlight {
                highlight_id,
                replies: Vec::new(),
                in_card: true,
            },
            text,
            x,
            y,
        ))
    }

    /// A branched highlight takes over from the existing highlight card
    /// instead of stacking a second one.
    pub fn spawn_branched_highlight(&mut self, highlight_id: Uuid, text: String) -> Uuid {
        let previous = self
            .overlays
            .iter()
            .position(|o| matches!(o.kind, OverlayKind::Highlight { .. }));
        if let Some(pos) = previous {
            let old = self.overlays.remove(pos);
            if self.focused == Some(old.id) {
                self.focused = None;
            }
        }
        self.spawn_highlight(highlight_id, text)
    }

    pub fn spawn_sticky(&mut self, text: String, editable: bool) -> Uuid {
        let (x, y) = self.next_spawn_pos();
        let mut overlay = Overlay::new(OverlayKind::StickyNote { editable }, text, x, y);
        if editable {
            overlay.input = TextInput::from_text(&overlay.text);
        }
        self.push(overlay)
    }

    pub fn spawn_question_popup(&mut self, questions: &[String]) -> Uuid {
        let (x, y) = self.next_spawn_pos();
        let mut overlay = Overlay::new(OverlayKind::QuestionPopup, questions.join("\n"), x, y);
        overlay.height = (questions.len() as u16 + 4).max(DEFAULT_HEIGHT);
        self.push(overlay)
    }

    pub fn spawn_clarification(&mut self, text: String) -> Uuid {
        let (x, y) = self.next_spawn_pos();
        self.push(Overlay::new(OverlayKind::Clarification, text, x, y))
    }

    /// Cycle focus through the open cards, topmost first
    pub fn focus_next(&mut self) {
        if self.overlays.is_empty() {
            self.focused = None;
            return;
        }
        let current = self
            .focused
            .and_then(|id| self.overlays.iter().position(|o| o.id == id));
        let next = match current {
            Some(pos) if pos > 0 => pos - 1,
            _ => self.overlays.len() - 1,
        };
        self.focused = Some(self.overlays[next].id);
    }

    pub fn close(&mut self, id: Uuid) -> Option<Overlay> {
        let pos = self.overlays.iter().position(|o| o.id == id)?;
        let overlay = self.overlays.remove(pos);
        if self.focused == Some(id) {
            self.focused = self.overlays.last().map(|o| o.id);
        }
        if self.drag.map(|d| d.id) == Some(id) {
            self.drag = None;
        }
        Some(overlay)
    }

    pub fn close_focused(&mut self) -> Option<Overlay> {
        self.focused.and_then(|id| self.close(id))
    }

    /// Topmost overlay under the pointer
    pub fn overlay_at(&self, col: u16, row: u16) -> Option<&Overlay> {
        self.overlays.iter().rev().find(|o| o.contains(col, row))
    }

    pub fn bring_to_front(&mut self, id: Uuid) {
        if let Some(pos) = self.overlays.iter().position(|o| o.id == id) {
            let overlay = self.overlays.remove(pos);
            self.overlays.push(overlay);
            self.focused = Some(id);
        }
    }

    pub fn begin_drag(&mut self, id: Uuid, col: u16, row: u16) {
        if let Some(overlay) = self.overlays.iter().find(|o| o.id == id) {
            self.drag = Some(OverlayDrag {
                id,
                grab_dx: col.saturating_sub(overlay.x),
                grab_dy: row.saturating_sub(overlay.y),
            });
        }
    }

    pub fn drag_to(&mut self, col: u16, row: u16) {
        let Some(drag) = self.drag else { return };
        if let Some(overlay) = self.overlays.iter_mut().find(|o| o.id == drag.id) {
            overlay.x = col.saturating_sub(drag.grab_dx);
            overlay.y = row.saturating_sub(drag.grab_dy);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_focuses_new_card() {
        let mut mgr = OverlayManager::new();
        let first = mgr.spawn_clarification("what do you mean?".into());
        assert_eq!(mgr.focused_id(), Some(first));
        let second = mgr.spawn_sticky("remember this".into(), false);
        assert_eq!(mgr.focused_id(), Some(second));
        assert_eq!(mgr.len(), 2);
    }

    #[test]
    fn test_branched_highlight_replaces_existing_card() {
        let mut mgr = OverlayManager::new();
        let h1 = Uuid::new_v4();
        let h2 = Uuid::new_v4();
        mgr.spawn_highlight(h1, "first passage".into());
        mgr.spawn_sticky("unrelated".into(), false);
        mgr.spawn_branched_highlight(h2, "second passage".into());

        let highlights: Vec<_> = mgr
            .iter()
            .filter(|o| matches!(o.kind, OverlayKind::Highlight { .. }))
            .collect();
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].text, "second passage");
        assert_eq!(mgr.len(), 2);
    }

    #[test]
    fn test_close_focused_moves_focus_to_top() {
        let mut mgr = OverlayManager::new();
        let first = mgr.spawn_clarification("a".into());
        mgr.spawn_clarification("b".into());
        mgr.close_focused();
        assert_eq!(mgr.focused_id(), Some(first));
        mgr.close_focused();
        assert!(mgr.is_empty());
        assert_eq!(mgr.focused_id(), None);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut mgr = OverlayManager::new();
        let below = mgr.spawn_clarification("below".into());
        let above = mgr.spawn_clarification("above".into());
        // Force full overlap
        for overlay in mgr.overlays.iter_mut() {
            overlay.x = 5;
            overlay.y = 5;
        }
        let hit = mgr.overlay_at(10, 8).map(|o| o.id);
        assert_eq!(hit, Some(above));

        mgr.bring_to_front(below);
        let hit = mgr.overlay_at(10, 8).map(|o| o.id);
        assert_eq!(hit, Some(below));
    }

    #[test]
    fn test_drag_moves_card_by_grab_offset() {
        let mut mgr = OverlayManager::new();
        let id = mgr.spawn_sticky("drag me".into(), false);
        let (x, y) = {
            let o = mgr.focused().unwrap();
            (o.x, o.y)
        };
        mgr.begin_drag(id, x + 3, y);
        mgr.drag_to(x + 13, y + 5);
        mgr.end_drag();
        let o = mgr.focused().unwrap();
        assert_eq!((o.x, o.y), (x + 10, y + 5));
        assert!(!mgr.is_dragging());
    }
}
