use anyhow::Context;

use crate::model::{Bucket, Snapshot};

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir_exist<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    anyhow::Ok(())
}

/// Loads the persisted history, or `None` when no history file exists yet.
///
/// # Errors
/// * If the file exists but cannot be read or is not a JSON array of snapshots.
pub fn load_history<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Option<Vec<Snapshot>>> {
    let path = path.as_ref();
    if !path.exists() {
        return anyhow::Ok(None);
    }
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let history: Vec<Snapshot> = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse history {}", path.display()))?;
    log::debug!("Loaded {} snapshots from {}", history.len(), path.display());
    anyhow::Ok(Some(history))
}

/// Appends `snapshot` to the end of `existing`, starting a new history if there is none.
///
/// Existing entries are never reordered. A snapshot older than the last entry
/// is still appended, with a warning, since bucketing relies on time order.
pub fn append_snapshot(existing: Option<Vec<Snapshot>>, snapshot: Snapshot) -> Vec<Snapshot> {
    let mut history = existing.unwrap_or_default();
    if let Some(last) = history.last() {
        if snapshot.time < last.time {
            log::warn!(
                "Snapshot {} is older than last history entry {}",
                snapshot.time,
                last.time
            );
        }
    }
    history.push(snapshot);
    history
}

/// Overwrites the history file with `history`.
pub fn save_history<P: AsRef<std::path::Path>>(path: P, history: &[Snapshot]) -> anyhow::Result<()> {
    write_json(path, history)
}

/// Overwrites the bucketed-history side file.
pub fn save_buckets<P: AsRef<std::path::Path>>(path: P, buckets: &[Bucket]) -> anyhow::Result<()> {
    write_json(path, buckets)
}

/// Serializes `value` next to `path` and renames it into place, so an
/// interrupted run leaves the previous file intact.
pub fn write_json<P, T>(path: P, value: &T) -> anyhow::Result<()>
where
    P: AsRef<std::path::Path>,
    T: serde::Serialize + ?Sized,
{
    let path = path.as_ref();
    ensure_parent_dir_exist(path)?;

    let tmp_path = path.with_extension("json.tmp");
    let data = serde_json::to_vec(value)?;
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;
    anyhow::Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_append_starts_history() {
        let history = append_snapshot(None, Snapshot::new("2024/01/10 09:00:00.000"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn append_keeps_existing_entries() {
        let existing = vec![
            Snapshot::new("2024/01/10 09:00:00.000"),
            Snapshot::new("2024/01/11 09:00:00.000"),
        ];
        let history = append_snapshot(Some(existing.clone()), Snapshot::new("2024/01/12 09:00:00.000"));
        assert_eq!(&history[..2], &existing[..]);
        assert_eq!(history[2].time, "2024/01/12 09:00:00.000");
    }

    #[test]
    fn history_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("portfolio.json");
        assert!(load_history(&path).unwrap().is_none());

        let history = append_snapshot(None, Snapshot::new("2024/01/10 09:00:00.000"));
        save_history(&path, &history).unwrap();
        let loaded = load_history(&path).unwrap().unwrap();
        assert_eq!(loaded, history);

        let history = append_snapshot(Some(loaded), Snapshot::new("2024/01/10 10:00:00.000"));
        save_history(&path, &history).unwrap();
        assert_eq!(load_history(&path).unwrap().unwrap().len(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_history_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_history(&path).is_err());
    }
}
