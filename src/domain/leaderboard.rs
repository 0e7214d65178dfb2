/// Per-level best-time ranking.
///
/// Pure derivation over store data: filter by level, reduce each user
/// to their minimum time, sort ascending, truncate. Recomputed from
/// scratch on every call; nothing is cached.
///
/// Ties keep first-appearance order: with equal best times, the user
/// whose score entered the log first ranks ahead.

use crate::domain::record::{Score, User};

/// One leaderboard row: resolved display name + best time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedTime {
    pub username: String,
    pub time_sec: u32,
}

/// Best time per user for `level`, ascending, at most `limit` rows.
///
/// Scores whose user vanished from the store still rank, displayed as
/// `User {id}`.
pub fn top_times(scores: &[Score], users: &[User], level: u32, limit: usize) -> Vec<RankedTime> {
    // Minimum per user; vec keeps first-appearance order for ties.
    let mut best: Vec<(u64, u32)> = Vec::new();
    for score in scores.iter().filter(|s| s.level == level) {
        match best.iter_mut().find(|(uid, _)| *uid == score.user_id) {
            Some((_, t)) => {
                if score.time_sec < *t {
                    *t = score.time_sec;
                }
            }
            None => best.push((score.user_id, score.time_sec)),
        }
    }

    best.sort_by_key(|&(_, t)| t); // stable sort, ties keep scan order
    best.truncate(limit);

    best.into_iter()
        .map(|(uid, time_sec)| RankedTime {
            username: users
                .iter()
                .find(|u| u.id == uid)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| format!("User {uid}")),
            time_sec,
        })
        .collect()
}

/// Best time across all users, None when the level has no scores.
pub fn best_time(scores: &[Score], level: u32) -> Option<u32> {
    scores.iter().filter(|s| s.level == level).map(|s| s.time_sec).min()
}

/// Does `time_sec` strictly beat the current best (or is it the first
/// time on this level)? Call before the run's own score is recorded.
pub fn is_new_best(scores: &[Score], level: u32, time_sec: u32) -> bool {
    match best_time(scores, level) {
        Some(best) => time_sec < best,
        None => true,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
