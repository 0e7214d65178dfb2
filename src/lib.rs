//! Maze Keeper: account, progress and leaderboard core for the Maze
//! geography game.
//!
//! The crate keeps the non-maze half of the game in one place: password
//! hashing and account storage, per-user country progress with chain
//! unlocking, per-level best-time leaderboards, and the screen flow
//! that strings them together. Everything persists as a single JSON
//! snapshot; the maze itself and all rendering stay in the caller.
//!
//! ```no_run
//! use mazekeeper::{Atlas, FlowEvent, KeeperConfig, MazeDb, Session};
//!
//! # fn run() -> Result<(), mazekeeper::StoreError> {
//! let config = KeeperConfig::load();
//! let db = MazeDb::open(&config.db_path)?;
//! let atlas = Atlas::load(&config.countries_file);
//! let mut session = Session::new(db, atlas, config.game.clone());
//!
//! session.handle(FlowEvent::LoginSubmitted {
//!     username: "ada".into(),
//!     password: "hunter2".into(),
//! });
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod flow;
pub mod store;

pub use config::{GameTuning, KeeperConfig};
pub use domain::atlas::{Atlas, Country};
pub use domain::leaderboard::RankedTime;
pub use domain::tier::LevelTier;
pub use error::{StoreError, StoreResult};
pub use flow::event::{FlowEvent, MenuItem};
pub use flow::screen::Screen;
pub use flow::session::{AuthMode, CountryView, LevelBoard, Player, RunResult, Session};
pub use store::db::MazeDb;
