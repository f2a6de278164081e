use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::now_secs;
use super::rich_text::RichText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    StickyNote,
    Highlight,
    Manual,
    Merged,
}

/// Grid footprint of a note card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteSize {
    One,
    Two,
    Three,
}

impl NoteSize {
    pub fn cells(self) -> u16 {
        match self {
            NoteSize::One => 1,
            NoteSize::Two => 2,
            NoteSize::Three => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            NoteSize::One => NoteSize::Two,
            NoteSize::Two => NoteSize::Three,
            NoteSize::Three => NoteSize::One,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteColor {
    Slate,
    Amber,
    Sage,
    Sky,
    Rose,
    Lavender,
}

impl NoteColor {
    pub const ALL: [NoteColor; 6] = [
        NoteColor::Slate,
        NoteColor::Amber,
        NoteColor::Sage,
        NoteColor::Sky,
        NoteColor::Rose,
        NoteColor::Lavender,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NoteColor::Slate => "slate",
            NoteColor::Amber => "amber",
            NoteColor::Sage => "sage",
            NoteColor::Sky => "sky",
            NoteColor::Rose => "rose",
            NoteColor::Lavender => "lavender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A note card in the storage view. Plain notes carry no children; a
/// `Merged` note owns the notes it absorbed (one level of nesting only -
/// merged-of-merged is not modeled) and its body is always re-derived from
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNote {
    pub id: Uuid,
    pub title: String,
    pub body: RichText,
    pub created_at: u64,
    /// Where the note came from ("highlight", "sticky-note", "chat", ...)
    pub source: String,
    pub kind: NoteKind,
    pub size: NoteSize,
    pub color: NoteColor,
    pub alignment: NoteAlignment,
    /// Non-empty only when `kind == Merged`
    pub merged_notes: Vec<StoredNote>,
}

impl StoredNote {
    pub fn new(
        kind: NoteKind,
        title: impl Into<String>,
        body: RichText,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body,
            created_at: now_secs(),
            source: source.into(),
            kind,
            size: NoteSize::One,
            color: NoteColor::Slate,
            alignment: NoteAlignment::default(),
            merged_notes: Vec::new(),
        }
    }

    pub fn merged_count(&self) -> usize {
        self.merged_notes.len()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NoteKind::Merged
    }

    /// Re-derive a merged note's body from its members: plain texts joined
    /// with a blank line. Invariant holder - call after every membership
    /// mutation. No-op on plain notes.
    pub fn rederive_merged_body(&mut self) {
        if self.kind != NoteKind::Merged {
            return;
        }
        let joined = self
            .merged_notes
            .iter()
            .map(|n| n.body.plain())
            .collect::<Vec<_>>()
            .join("\n\n");
        self.body = RichText::from_plain(joined);
    }
}
