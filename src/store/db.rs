/// Store facade: accounts, scores and per-user country progress over a
/// single JSON snapshot. Every call loads the snapshot, works on it in
/// memory and, when it mutated something, persists the whole state
/// again. That keeps the store consistent across processes that share
/// the file, at the cost of re-reading per call, which is fine at this
/// scale.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::domain::credentials::{generate_salt, hash_password, verify_password};
use crate::domain::leaderboard::{self, RankedTime};
use crate::domain::record::{Score, User};
use crate::error::{StoreError, StoreResult};
use crate::store::snapshot;
use crate::store::state::StoreState;

/// Minimum character count for usernames and passwords.
const MIN_FIELD_CHARS: usize = 3;

/// Handle on one snapshot file.
pub struct MazeDb {
    path: PathBuf,
}

impl MazeDb {
    /// Open the store at `path`, creating an empty snapshot when the
    /// file does not exist yet.
    pub fn open(path: &Path) -> StoreResult<MazeDb> {
        if !path.exists() {
            snapshot::save(path, &StoreState::default())?;
        }
        Ok(MazeDb { path: path.to_path_buf() })
    }

    fn load(&self) -> StoreResult<StoreState> {
        snapshot::load(&self.path)
    }

    // ── Accounts ──────────────────────────────────────────────

    /// Register a new account and return its id. The username is
    /// trimmed; the password is taken as given, spaces included.
    pub fn create_user(&self, username: &str, password: &str) -> StoreResult<u64> {
        let username = username.trim();
        if username.chars().count() < MIN_FIELD_CHARS
            || password.chars().count() < MIN_FIELD_CHARS
        {
            return Err(StoreError::Validation(format!(
                "username and password must be at least {MIN_FIELD_CHARS} characters"
            )));
        }

        let mut state = self.load()?;
        if state.find_by_username(username).is_some() {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let salt = generate_salt();
        let pw_hash = hash_password(password, &salt);
        let id = state.alloc_user_id();
        state.users.push(User::new(id, username.to_string(), salt, pw_hash, now_unix()));
        snapshot::save(&self.path, &state)?;

        debug!(user_id = id, username, "user created");
        Ok(id)
    }

    /// Check credentials and return the user id on success.
    pub fn verify_user(&self, username: &str, password: &str) -> StoreResult<u64> {
        let username = username.trim();
        let state = self.load()?;
        let user = state
            .find_by_username(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        if !verify_password(password, &user.salt, &user.pw_hash) {
            return Err(StoreError::WrongPassword);
        }
        Ok(user.id)
    }

    pub fn user_id_by_username(&self, username: &str) -> StoreResult<Option<u64>> {
        let state = self.load()?;
        Ok(state.find_by_username(username.trim()).map(|u| u.id))
    }

    // ── Scores ────────────────────────────────────────────────

    /// Record a finished run. The user id is stored as given, so score
    /// rows survive even if the account goes away.
    pub fn record_score(&self, user_id: u64, level: u32, time_sec: u32) -> StoreResult<u64> {
        let mut state = self.load()?;
        let id = state.alloc_score_id();
        state.scores.push(Score { id, user_id, level, time_sec, created_at: now_unix() });
        snapshot::save(&self.path, &state)?;

        debug!(score_id = id, user_id, level, time_sec, "score recorded");
        Ok(id)
    }

    /// Ranking for one level: each user's best time, fastest first.
    pub fn top_times(&self, level: u32, limit: usize) -> StoreResult<Vec<RankedTime>> {
        let state = self.load()?;
        Ok(leaderboard::top_times(&state.scores, &state.users, level, limit))
    }

    /// Best stored time on `level` across all users.
    pub fn best_time(&self, level: u32) -> StoreResult<Option<u32>> {
        let state = self.load()?;
        Ok(leaderboard::best_time(&state.scores, level))
    }

    /// Would `time_sec` beat the level's best stored time? Call this
    /// before recording the run, otherwise the run competes with
    /// itself.
    pub fn is_new_best(&self, level: u32, time_sec: u32) -> StoreResult<bool> {
        let state = self.load()?;
        Ok(leaderboard::is_new_best(&state.scores, level, time_sec))
    }

    // ── Progress ──────────────────────────────────────────────

    /// Mark `country` completed. Returns false when the user id is
    /// unknown; re-adding an already completed country is a no-op.
    pub fn add_country_progress(&self, user_id: u64, country: &str) -> StoreResult<bool> {
        let mut state = self.load()?;
        let changed = match state.find_user_mut(user_id) {
            Some(user) => user.add_progress(country),
            None => return Ok(false),
        };
        if changed {
            snapshot::save(&self.path, &state)?;
        }
        Ok(true)
    }

    /// Unmark a completed country. Returns false when the user id is
    /// unknown.
    pub fn remove_country_progress(&self, user_id: u64, country: &str) -> StoreResult<bool> {
        let mut state = self.load()?;
        let changed = match state.find_user_mut(user_id) {
            Some(user) => user.remove_progress(country),
            None => return Ok(false),
        };
        if changed {
            snapshot::save(&self.path, &state)?;
        }
        Ok(true)
    }

    /// Completed countries in completion order. Unknown users have
    /// completed nothing.
    pub fn get_progress(&self, user_id: u64) -> StoreResult<Vec<String>> {
        let state = self.load()?;
        Ok(state.find_user(user_id).map(|u| u.progress.clone()).unwrap_or_default())
    }

    pub fn has_access(&self, user_id: u64, country: &str) -> StoreResult<bool> {
        let state = self.load()?;
        Ok(state.find_user(user_id).is_some_and(|u| u.has_completed(country)))
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
