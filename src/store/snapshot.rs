/// Snapshot persistence: the whole [`StoreState`] as one pretty-printed
/// JSON file. Writes go to a sibling `.tmp` file first and land via
/// rename, so a crash mid-write leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::state::StoreState;

/// Load a snapshot. A missing file is an empty store, not an error;
/// unreadable JSON is reported as [`StoreError::Corrupt`].
pub fn load(path: &Path) -> StoreResult<StoreState> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot yet, starting empty");
            return Ok(StoreState::default());
        }
        Err(err) => return Err(err.into()),
    };

    let mut state: StoreState =
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    state.normalize();
    Ok(state)
}

/// Persist a snapshot atomically: write `<name>.tmp`, then rename over
/// the live file.
pub fn save(path: &Path, state: &StoreState) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let text = serde_json::to_string_pretty(state)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    let tmp = tmp_path(path);
    std::fs::write(&tmp, text)?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err.into());
    }

    debug!(
        path = %path.display(),
        users = state.users.len(),
        scores = state.scores.len(),
        "snapshot saved"
    );
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
