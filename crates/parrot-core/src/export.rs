//! JSON snapshot export for the notes collection.
//!
//! Writes to a temp file in the target directory first, then renames over
//! the destination, so a crash mid-write never leaves a truncated snapshot.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::models::StoredNote;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct NotesSnapshot<'a> {
    exported_at: u64,
    notes: &'a [StoredNote],
}

pub fn export_notes(path: &Path, notes: &[StoredNote]) -> Result<(), ExportError> {
    let snapshot = NotesSnapshot {
        exported_at: chrono::Utc::now().timestamp().max(0) as u64,
        notes,
    };
    let json = serde_json::to_vec_pretty(&snapshot)?;

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), count = notes.len(), "exported notes");
    Ok(())
}

/// Read a snapshot back into notes. The inverse of [`export_notes`].
pub fn import_notes(path: &Path) -> Result<Vec<StoredNote>, ExportError> {
    #[derive(serde::Deserialize)]
    struct OwnedSnapshot {
        notes: Vec<StoredNote>,
    }
    let data = fs::read(path)?;
    let snapshot: OwnedSnapshot = serde_json::from_slice(&data)?;
    Ok(snapshot.notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NotesStore;

    #[test]
    fn test_export_then_import_round_trips_notes() {
        let mut store = NotesStore::new();
        store.add_sticky("remember the milk", Some("groceries".into()));
        let a = store.add_text("alpha", "test");
        let b = store.add_text("beta", "test");
        store.merge(&[a, b]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        export_notes(&path, store.top_level()).unwrap();

        let restored = import_notes(&path).unwrap();
        assert_eq!(restored.len(), 2);
        let folder = restored.iter().find(|n| n.is_folder()).unwrap();
        assert_eq!(folder.merged_count(), 2);
        assert_eq!(folder.body.plain(), "alpha\n\nbeta");
    }

    #[test]
    fn test_import_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_notes(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
