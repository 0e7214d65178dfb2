/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or the
/// user/system data directories. Falls back to sensible defaults if the
/// file is missing or incomplete.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct KeeperConfig {
    pub game: GameTuning,
    /// Resolved path of the JSON snapshot file.
    pub db_path: PathBuf,
    /// Resolved path of the countries list.
    pub countries_file: PathBuf,
}

#[derive(Clone, Debug)]
pub struct GameTuning {
    pub countries_per_page: usize,
    pub leaderboard_limit: usize,
}

impl Default for GameTuning {
    fn default() -> Self {
        GameTuning {
            countries_per_page: default_countries_per_page(),
            leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    storage: TomlStorage,
    #[serde(default)]
    atlas: TomlAtlas,
    #[serde(default)]
    game: TomlGame,
}

#[derive(Deserialize, Debug)]
struct TomlStorage {
    #[serde(default = "default_data_dir")]
    data_dir: String,
    #[serde(default = "default_db_file")]
    db_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlAtlas {
    #[serde(default = "default_countries_file")]
    countries_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_countries_per_page")]
    countries_per_page: usize,
    #[serde(default = "default_leaderboard_limit")]
    leaderboard_limit: usize,
}

// ── Defaults ──

fn default_data_dir() -> String { "data".into() }
fn default_db_file() -> String { "maze.json".into() }
fn default_countries_file() -> String { "countries.json".into() }
fn default_countries_per_page() -> usize { 8 }
fn default_leaderboard_limit() -> usize { 10 }

impl Default for TomlStorage {
    fn default() -> Self {
        TomlStorage {
            data_dir: default_data_dir(),
            db_file: default_db_file(),
        }
    }
}

impl Default for TomlAtlas {
    fn default() -> Self {
        TomlAtlas {
            countries_file: default_countries_file(),
        }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            countries_per_page: default_countries_per_page(),
            leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

// ── Loading ──

impl KeeperConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/mazekeeper`, (4) `/usr/share/mazekeeper`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();

        // Find config.toml
        let toml_cfg = load_toml(&search_dirs);

        // Resolve the snapshot path. The data dir must be writable, so
        // relative dirs resolve against the first writable base rather
        // than whichever candidate happens to exist.
        let data_dir_str = &toml_cfg.storage.data_dir;
        let data_dir = if PathBuf::from(data_dir_str).is_absolute() {
            PathBuf::from(data_dir_str)
        } else {
            writable_base().join(data_dir_str)
        };
        let db_path = data_dir.join(&toml_cfg.storage.db_file);

        // Resolve the countries list (read-only, so an existing copy in
        // any candidate dir wins).
        let countries_str = &toml_cfg.atlas.countries_file;
        let countries_file = if PathBuf::from(countries_str).is_absolute() {
            PathBuf::from(countries_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(countries_str))
                .find(|p| p.is_file())
                .unwrap_or_else(|| {
                    // Default: relative to CWD
                    PathBuf::from(countries_str)
                })
        };

        KeeperConfig {
            game: GameTuning {
                countries_per_page: toml_cfg.game.countries_per_page,
                leaderboard_limit: toml_cfg.game.leaderboard_limit,
            },
            db_path,
            countries_file,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/mazekeeper → /usr/games/mazekeeper
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/mazekeeper)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/mazekeeper");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/mazekeeper)
    let sys = PathBuf::from("/usr/share/mazekeeper");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First base directory the process can write under.
fn writable_base() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_mazekeeper");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/mazekeeper) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/mazekeeper");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!(path = %path.display(), "config.toml parse error: {e}");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), "could not read config: {e}");
                }
            }
        }
    }
    TomlConfig::default()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
