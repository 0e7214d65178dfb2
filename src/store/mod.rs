pub mod db;
pub mod snapshot;
pub mod state;
