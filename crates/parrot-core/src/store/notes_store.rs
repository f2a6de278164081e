//! State owner for the notes/storage view.
//!
//! The store keeps a flat display collection of note cards plus an optional
//! "open folder" scope. While a merged note is open, every mutation
//! (rename, recolor, resize, delete, merge, reorder) addresses that folder's
//! `merged_notes` instead of the top-level collection, and the folder's
//! derived body is recomputed after each membership change.
//!
//! All operations are silent no-ops on unknown ids.

use uuid::Uuid;

use crate::constants::DEFAULT_NOTE_TITLE;
use crate::models::rich_text::RunStyle;
use crate::models::{NoteAlignment, NoteColor, NoteKind, NoteSize, RichText, StoredNote};

#[derive(Default)]
pub struct NotesStore {
    /// Top-level display collection, in display order
    notes: Vec<StoredNote>,
    /// When set, the visible collection is this merged note's members
    open_folder: Option<Uuid>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- scope -------------------------------------------------------------

    pub fn open_folder_id(&self) -> Option<Uuid> {
        self.open_folder
    }

    /// Open a merged note as a folder, re-scoping the visible collection to
    /// its members. No-op unless `id` names a top-level merged note.
    pub fn open_folder(&mut self, id: Uuid) {
        if self
            .notes
            .iter()
            .any(|n| n.id == id && n.is_folder())
        {
            self.open_folder = Some(id);
        }
    }

    pub fn close_folder(&mut self) {
        self.open_folder = None;
    }

    /// The collection the UI currently renders: the open folder's members,
    /// or the top-level notes.
    pub fn visible(&self) -> &[StoredNote] {
        match self.open_folder {
            Some(fid) => self
                .notes
                .iter()
                .find(|n| n.id == fid)
                .map(|n| n.merged_notes.as_slice())
                .unwrap_or(&[]),
            None => &self.notes,
        }
    }

    pub fn top_level(&self) -> &[StoredNote] {
        &self.notes
    }

    pub fn visible_note(&self, id: Uuid) -> Option<&StoredNote> {
        self.visible().iter().find(|n| n.id == id)
    }

    fn scope_mut(&mut self) -> Option<&mut Vec<StoredNote>> {
        match self.open_folder {
            Some(fid) => self
                .notes
                .iter_mut()
                .find(|n| n.id == fid)
                .map(|n| &mut n.merged_notes),
            None => Some(&mut self.notes),
        }
    }

    /// Recompute the open folder's derived body after a membership change.
    fn rederive_open_folder(&mut self) {
        if let Some(fid) = self.open_folder {
            if let Some(folder) = self.notes.iter_mut().find(|n| n.id == fid) {
                folder.rederive_merged_body();
            }
        }
    }

    // --- creation ------------------------------------------------------------

    /// Notes created from broadcast signals always land in the top-level
    /// collection, regardless of scope.
    pub fn add(&mut self, note: StoredNote) -> Uuid {
        let id = note.id;
        self.notes.push(note);
        id
    }

    pub fn add_highlight(&mut self, text: &str) -> Uuid {
        let title: String = text.chars().take(32).collect();
        self.add(StoredNote::new(
            NoteKind::Highlight,
            title,
            RichText::from_plain(text),
            "highlight",
        ))
    }

    pub fn add_sticky(&mut self, text: &str, title: Option<String>) -> Uuid {
        self.add(StoredNote::new(
            NoteKind::StickyNote,
            title.unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_string()),
            RichText::from_plain(text),
            "sticky-note",
        ))
    }

    pub fn add_text(&mut self, text: &str, source: &str) -> Uuid {
        let title: String = text.chars().take(32).collect();
        self.add(StoredNote::new(
            NoteKind::Manual,
            title,
            RichText::from_plain(text),
            source,
        ))
    }

    // --- field updates (scoped) ---------------------------------------------

    fn with_note_mut(&mut self, id: Uuid, mutate: impl FnOnce(&mut StoredNote)) {
        let mut touched = false;
        if let Some(scope) = self.scope_mut() {
            if let Some(note) = scope.iter_mut().find(|n| n.id == id) {
                mutate(note);
                touched = true;
            }
        }
        if touched {
            self.rederive_open_folder();
        }
    }

    pub fn rename(&mut self, id: Uuid, title: &str) {
        self.with_note_mut(id, |n| n.title = title.to_string());
    }

    pub fn set_size(&mut self, id: Uuid, size: NoteSize) {
        self.with_note_mut(id, |n| n.size = size);
    }

    pub fn set_color(&mut self, id: Uuid, color: NoteColor) {
        self.with_note_mut(id, |n| n.color = color);
    }

    pub fn set_alignment(&mut self, id: Uuid, alignment: NoteAlignment) {
        self.with_note_mut(id, |n| n.alignment = alignment);
    }

    pub fn set_body(&mut self, id: Uuid, body: RichText) {
        self.with_note_mut(id, |n| n.body = body);
    }

    /// Apply inline formatting to a char range of a note's body. Malformed
    /// ranges are absorbed by `RichText::apply` (logged, content unchanged).
    pub fn format_body<F>(&mut self, id: Uuid, start: usize, end: usize, mutate: F)
    where
        F: Fn(&mut RunStyle),
    {
        self.with_note_mut(id, |n| n.body.apply(start, end, &mutate));
    }

    pub fn delete(&mut self, id: Uuid) {
        let mut removed = false;
        if let Some(scope) = self.scope_mut() {
            let before = scope.len();
            scope.retain(|n| n.id != id);
            removed = scope.len() != before;
        }
        if removed {
            self.rederive_open_folder();
        }
    }

    // --- merge / reorder -------------------------------------------------------

    /// Merge the notes named by `ids` (selection order) into a new
    /// `Merged` note that replaces them in the current scope, at the
    /// position of the first member. Tolerates any non-empty selection; the
    /// UI gates the affordance at two or more. Returns the new note's id.
    pub fn merge(&mut self, ids: &[Uuid]) -> Option<Uuid> {
        let merged = {
            let scope = self.scope_mut()?;
            let mut members: Vec<StoredNote> = Vec::with_capacity(ids.len());
            let mut insert_at = scope.len();
            for &id in ids {
                if let Some(pos) = scope.iter().position(|n| n.id == id) {
                    insert_at = insert_at.min(pos);
                    members.push(scope.remove(pos));
                }
            }
            if members.is_empty() {
                return None;
            }
            // The merged note takes the earliest position a member held
            let insert_at = insert_at.min(scope.len());

            let title = if members.len() > 1 {
                format!("{} +{} more", members[0].title, members.len() - 1)
            } else {
                members[0].title.clone()
            };

            let mut merged = StoredNote::new(NoteKind::Merged, title, RichText::new(), "merged");
            merged.merged_notes = members;
            merged.rederive_merged_body();
            let id = merged.id;
            scope.insert(insert_at, merged);
            id
        };
        self.rederive_open_folder();
        Some(merged)
    }

    /// Drag-to-reorder: swap the positions of two notes in the current
    /// scope. No-op unless both ids resolve.
    pub fn swap(&mut self, a: Uuid, b: Uuid) {
        if let Some(scope) = self.scope_mut() {
            let pa = scope.iter().position(|n| n.id == a);
            let pb = scope.iter().position(|n| n.id == b);
            if let (Some(pa), Some(pb)) = (pa, pb) {
                scope.swap(pa, pb);
            }
        }
    }

    /// Drag-onto-a-folder: move the notes named by `ids` out of the current
    /// scope and into `target.merged_notes`, recomputing the target's
    /// derived body. The target itself is never absorbed into itself.
    pub fn merge_into(&mut self, target: Uuid, ids: &[Uuid]) {
        let mut changed = false;
        if let Some(scope) = self.scope_mut() {
            if !scope.iter().any(|n| n.id == target && n.is_folder()) {
                return;
            }
            let mut moved: Vec<StoredNote> = Vec::new();
            for &id in ids {
                if id == target {
                    continue;
                }
                if let Some(pos) = scope.iter().position(|n| n.id == id) {
                    moved.push(scope.remove(pos));
                }
            }
            if !moved.is_empty() {
                if let Some(folder) = scope.iter_mut().find(|n| n.id == target) {
                    folder.merged_notes.extend(moved);
                    folder.rederive_merged_body();
                    changed = true;
                }
            }
        }
        if changed {
            self.rederive_open_folder();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_note(store: &mut NotesStore, text: &str) -> Uuid {
        store.add_text(text, "test")
    }

    fn merged_invariant_holds(note: &StoredNote) {
        match note.kind {
            NoteKind::Merged => {
                let expected = note
                    .merged_notes
                    .iter()
                    .map(|n| n.body.plain())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                assert_eq!(note.body.plain(), expected);
            }
            _ => assert!(note.merged_notes.is_empty()),
        }
    }

    #[test]
    fn test_merge_concatenates_with_blank_line_separator() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "alpha");
        let b = plain_note(&mut store, "beta");

        let merged = store.merge(&[a, b]).unwrap();

        let note = store.visible_note(merged).unwrap();
        assert_eq!(note.body.plain(), "alpha\n\nbeta");
        assert_eq!(note.merged_count(), 2);
        assert_eq!(store.visible().len(), 1);
        merged_invariant_holds(note);
    }

    #[test]
    fn test_merge_title_gets_plus_n_more_suffix() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "first body");
        let b = plain_note(&mut store, "second");
        let c = plain_note(&mut store, "third");

        let merged = store.merge(&[a, b, c]).unwrap();
        let note = store.visible_note(merged).unwrap();
        assert!(note.title.ends_with("+2 more"), "title: {}", note.title);
    }

    #[test]
    fn test_single_note_merge_is_tolerated() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "solo");
        let merged = store.merge(&[a]).unwrap();
        let note = store.visible_note(merged).unwrap();
        assert_eq!(note.merged_count(), 1);
        assert_eq!(note.body.plain(), "solo");
        assert!(!note.title.contains("more"));
    }

    #[test]
    fn test_non_merged_notes_never_carry_children() {
        let mut store = NotesStore::new();
        store.add_highlight("h");
        store.add_sticky("s", None);
        store.add_text("m", "chat");
        for note in store.top_level() {
            merged_invariant_holds(note);
        }
    }

    #[test]
    fn test_merge_then_reopen_and_delete_inside() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A text");
        let b = plain_note(&mut store, "B text");
        let merged = store.merge(&[a, b]).unwrap();
        assert_eq!(
            store.visible_note(merged).unwrap().body.plain(),
            "A text\n\nB text"
        );

        store.open_folder(merged);
        assert_eq!(store.visible().len(), 2);

        store.delete(a);

        assert_eq!(store.visible().len(), 1);
        store.close_folder();
        let folder = store.visible_note(merged).unwrap();
        assert_eq!(folder.merged_count(), 1);
        assert_eq!(folder.body.plain(), "B text");
    }

    #[test]
    fn test_edits_inside_open_folder_write_into_members() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let b = plain_note(&mut store, "B");
        let merged = store.merge(&[a, b]).unwrap();

        store.open_folder(merged);
        store.set_color(a, NoteColor::Rose);
        store.set_size(b, NoteSize::Three);
        store.close_folder();

        let folder = store.visible_note(merged).unwrap();
        assert_eq!(folder.merged_notes[0].color, NoteColor::Rose);
        assert_eq!(folder.merged_notes[1].size, NoteSize::Three);
        // The folder itself is untouched
        assert_eq!(folder.color, NoteColor::Slate);
    }

    #[test]
    fn test_merge_into_folder_recomputes_body() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let b = plain_note(&mut store, "B");
        let folder = store.merge(&[a, b]).unwrap();
        let c = plain_note(&mut store, "C");

        store.merge_into(folder, &[c]);

        let note = store.visible_note(folder).unwrap();
        assert_eq!(note.merged_count(), 3);
        assert_eq!(note.body.plain(), "A\n\nB\n\nC");
        assert_eq!(store.visible().len(), 1);
        merged_invariant_holds(note);
    }

    #[test]
    fn test_merge_into_plain_note_is_a_noop() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let b = plain_note(&mut store, "B");

        store.merge_into(a, &[b]);

        assert_eq!(store.visible().len(), 2);
        assert!(store.visible_note(a).unwrap().merged_notes.is_empty());
    }

    #[test]
    fn test_swap_reorders_scope() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let b = plain_note(&mut store, "B");
        let c = plain_note(&mut store, "C");

        store.swap(a, c);

        let order: Vec<Uuid> = store.visible().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn test_unknown_ids_are_silent_noops() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let ghost = Uuid::new_v4();

        store.rename(ghost, "nope");
        store.delete(ghost);
        store.swap(a, ghost);
        store.open_folder(ghost);
        assert!(store.merge(&[ghost]).is_none());

        assert_eq!(store.visible().len(), 1);
        assert!(store.open_folder_id().is_none());
    }

    #[test]
    fn test_signal_created_notes_land_top_level_even_with_folder_open() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "A");
        let b = plain_note(&mut store, "B");
        let folder = store.merge(&[a, b]).unwrap();
        store.open_folder(folder);

        store.add_highlight("from a signal");

        store.close_folder();
        assert_eq!(store.top_level().len(), 2);
    }

    #[test]
    fn test_format_body_with_stale_range_leaves_note_unchanged() {
        let mut store = NotesStore::new();
        let a = plain_note(&mut store, "tiny");
        let before = store.visible_note(a).unwrap().body.clone();
        store.format_body(a, 2, 100, |s| s.bold = true);
        assert_eq!(store.visible_note(a).unwrap().body, before);
    }
}
