/// Maze difficulty tiers.
/// Grid size, the numeric level stored with scores, and display labels
/// are queried via methods so tier semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelTier {
    Easy,      // 20x20
    Medium,    // 40x40
    Difficult, // 60x60
}

impl LevelTier {
    pub const ALL: [LevelTier; 3] =
        [LevelTier::Easy, LevelTier::Medium, LevelTier::Difficult];

    /// Numeric level recorded with scores.
    pub fn db_level(self) -> u32 {
        match self {
            LevelTier::Easy => 1,
            LevelTier::Medium => 2,
            LevelTier::Difficult => 3,
        }
    }

    /// Maze side length in cells.
    pub fn grid_size(self) -> u32 {
        match self {
            LevelTier::Easy => 20,
            LevelTier::Medium => 40,
            LevelTier::Difficult => 60,
        }
    }

    /// Column header used by the leaderboard screen.
    pub fn label(self) -> &'static str {
        match self {
            LevelTier::Easy => "EASY (20x20)",
            LevelTier::Medium => "MEDIUM (40x40)",
            LevelTier::Difficult => "DIFFICULT (60x60)",
        }
    }

    /// Reverse of `db_level`, for reading stored scores back.
    pub fn from_db_level(level: u32) -> Option<LevelTier> {
        match level {
            1 => Some(LevelTier::Easy),
            2 => Some(LevelTier::Medium),
            3 => Some(LevelTier::Difficult),
            _ => None,
        }
    }
}
