pub mod atlas;
pub mod credentials;
pub mod leaderboard;
pub mod record;
pub mod tier;
pub mod unlock;
