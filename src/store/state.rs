/// In-memory snapshot state: every user and score, plus the id
/// counters. The whole struct is what gets serialized to disk, so all
/// mutation goes through a load / mutate / persist cycle in the store
/// facade.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::record::{Score, User};

/// Next-id counters. Ids start at 1; 0 is never handed out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default = "first_id")]
    pub next_user_id: u64,
    #[serde(default = "first_id")]
    pub next_score_id: u64,
}

fn first_id() -> u64 {
    1
}

impl Default for Counters {
    fn default() -> Self {
        Counters { next_user_id: 1, next_score_id: 1 }
    }
}

/// The full persisted state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(default)]
    pub counters: Counters,
}

impl StoreState {
    pub fn find_user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_user_mut(&mut self, id: u64) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Exact, case-sensitive username lookup. Callers trim first.
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn alloc_user_id(&mut self) -> u64 {
        let id = self.counters.next_user_id;
        self.counters.next_user_id += 1;
        id
    }

    pub fn alloc_score_id(&mut self) -> u64 {
        let id = self.counters.next_score_id;
        self.counters.next_score_id += 1;
        id
    }

    /// Repair after load: counters must stay ahead of every stored id
    /// even if the file was hand-edited, and progress lists carry no
    /// duplicates.
    pub fn normalize(&mut self) {
        let max_user = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        let max_score = self.scores.iter().map(|s| s.id).max().unwrap_or(0);
        self.counters.next_user_id = self.counters.next_user_id.max(max_user + 1);
        self.counters.next_score_id = self.counters.next_score_id.max(max_score + 1);

        for user in &mut self.users {
            let mut seen = HashSet::new();
            user.progress.retain(|c| seen.insert(c.clone()));
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
