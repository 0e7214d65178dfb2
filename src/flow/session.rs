/// Session state machine: one player moving from the login form to the
/// maze and back. Holds the store handle, the atlas and everything the
/// current screen needs to render.
///
/// ## Screen transitions (events not listed are ignored)
///
/// ┌───────────────┬──────────────────────────┬──────────────────────────┐
/// │ Screen        │ Event                    │ Effect                   │
/// ├───────────────┼──────────────────────────┼──────────────────────────┤
/// │ Login         │ LoginSubmitted (valid)   │ → MainMenu               │
/// │ Login         │ SignupSubmitted (valid)  │ back to the login form   │
/// │ MainMenu      │ Play                     │ → CountrySelect, page 0  │
/// │ MainMenu      │ Scores                   │ → Leaderboard            │
/// │ MainMenu      │ Preferences              │ → Preferences            │
/// │ MainMenu      │ Quit                     │ quit flag set            │
/// │ CountrySelect │ CountryChosen (unlocked) │ → LevelSelect            │
/// │ LevelSelect   │ LevelChosen              │ → Playing, city drawn    │
/// │ Playing       │ RunCompleted             │ record run, → GameOver   │
/// │ GameOver      │ Back                     │ → MainMenu               │
/// └───────────────┴──────────────────────────┴──────────────────────────┘
///
/// `Back` otherwise steps one screen up. Failed store calls land in the
/// status line instead of unwinding the session.

use crate::config::GameTuning;
use crate::domain::atlas::{Atlas, Country};
use crate::domain::leaderboard::RankedTime;
use crate::domain::tier::LevelTier;
use crate::domain::unlock;
use crate::error::StoreResult;
use crate::flow::event::{FlowEvent, MenuItem};
use crate::flow::screen::Screen;
use crate::store::db::MazeDb;

/// Which form the login screen shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthMode {
    Login,
    Signup,
}

/// The signed-in account.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: u64,
    pub username: String,
}

/// Outcome of the last finished run, shown on the game-over screen.
#[derive(Clone, Copy, Debug)]
pub struct RunResult {
    pub tier: LevelTier,
    pub time_sec: u32,
    pub new_best: bool,
}

/// One tier's rows on the leaderboard screen.
#[derive(Clone, Debug)]
pub struct LevelBoard {
    pub tier: LevelTier,
    pub rows: Vec<RankedTime>,
}

/// One row of the country picker page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryView {
    pub index: usize,
    pub name: String,
    pub unlocked: bool,
}

pub struct Session {
    db: MazeDb,
    atlas: Atlas,
    tuning: GameTuning,
    screen: Screen,
    auth_mode: AuthMode,
    /// Message line for the current screen (errors, signup feedback).
    status: String,
    player: Option<Player>,
    country_page: usize,
    selected_country: Option<usize>,
    target_city: Option<String>,
    tier: Option<LevelTier>,
    last_run: Option<RunResult>,
    board: Vec<LevelBoard>,
    music_on: bool,
    quit: bool,
}

impl Session {
    pub fn new(db: MazeDb, atlas: Atlas, tuning: GameTuning) -> Session {
        Session {
            db,
            atlas,
            tuning,
            screen: Screen::Login,
            auth_mode: AuthMode::Login,
            status: String::new(),
            player: None,
            country_page: 0,
            selected_country: None,
            target_city: None,
            tier: None,
            last_run: None,
            board: Vec::new(),
            music_on: true,
            quit: false,
        }
    }

    /// Feed one event through the current screen.
    pub fn handle(&mut self, event: FlowEvent) {
        match self.screen {
            // ── Login / Signup ──
            Screen::Login => match event {
                FlowEvent::LoginSubmitted { username, password } => {
                    self.submit_login(&username, &password);
                }
                FlowEvent::SignupSubmitted { username, password, repeat } => {
                    self.submit_signup(&username, &password, &repeat);
                }
                FlowEvent::SwitchAuthMode => {
                    self.auth_mode = match self.auth_mode {
                        AuthMode::Login => AuthMode::Signup,
                        AuthMode::Signup => AuthMode::Login,
                    };
                }
                _ => {}
            },

            // ── Main Menu ──
            Screen::MainMenu => match event {
                FlowEvent::MenuSelected(MenuItem::Play) => {
                    self.country_page = 0;
                    self.screen = Screen::CountrySelect;
                }
                FlowEvent::MenuSelected(MenuItem::Scores) => {
                    self.board = self.fetch_board();
                    self.screen = Screen::Leaderboard;
                }
                FlowEvent::MenuSelected(MenuItem::Preferences) => {
                    self.screen = Screen::Preferences;
                }
                FlowEvent::MenuSelected(MenuItem::Quit) => self.quit = true,
                _ => {}
            },

            // ── Country Select ──
            Screen::CountrySelect => match event {
                FlowEvent::NextPage => {
                    self.country_page = (self.country_page + 1).min(self.max_page());
                }
                FlowEvent::PrevPage => {
                    self.country_page = self.country_page.saturating_sub(1);
                }
                FlowEvent::CountryChosen(index) => self.choose_country(index),
                FlowEvent::Back => self.screen = Screen::MainMenu,
                _ => {}
            },

            // ── Level Select ──
            Screen::LevelSelect => match event {
                FlowEvent::LevelChosen(tier) => self.choose_level(tier),
                FlowEvent::Back => self.screen = Screen::MainMenu,
                _ => {}
            },

            // ── Playing ──
            Screen::Playing => match event {
                FlowEvent::RunCompleted { time_sec } => self.finish_run(time_sec),
                FlowEvent::ToggleMusic => self.music_on = !self.music_on,
                // Abandoned run: nothing is recorded.
                FlowEvent::Back => self.screen = Screen::LevelSelect,
                _ => {}
            },

            // ── Game Over ──
            Screen::GameOver => match event {
                FlowEvent::Back => {
                    self.selected_country = None;
                    self.target_city = None;
                    self.tier = None;
                    self.screen = Screen::MainMenu;
                }
                _ => {}
            },

            // ── Preferences ──
            Screen::Preferences => match event {
                FlowEvent::ToggleMusic => self.music_on = !self.music_on,
                FlowEvent::Back => self.screen = Screen::MainMenu,
                _ => {}
            },

            // ── Leaderboard ──
            Screen::Leaderboard => match event {
                FlowEvent::Back => {
                    self.board.clear();
                    self.screen = Screen::MainMenu;
                }
                _ => {}
            },
        }
    }

    // ── Auth ──

    fn submit_login(&mut self, username: &str, password: &str) {
        match self.db.verify_user(username, password) {
            Ok(id) => {
                self.player = Some(Player { id, username: username.trim().to_string() });
                self.status.clear();
                self.screen = Screen::MainMenu;
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn submit_signup(&mut self, username: &str, password: &str, repeat: &str) {
        // Checked as the form shows them, before any trimming.
        if username.is_empty() || password.is_empty() || repeat.is_empty() {
            self.status = "Fill in every field.".to_string();
            return;
        }
        if password != repeat {
            self.status = "Passwords do not match.".to_string();
            return;
        }
        match self.db.create_user(username, password) {
            Ok(_) => {
                self.status = "Account created! Log in now.".to_string();
                self.auth_mode = AuthMode::Login;
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    // ── Country / level selection ──

    fn choose_country(&mut self, index: usize) {
        let country = match self.atlas.get(index) {
            Some(c) => c.country.clone(),
            None => return,
        };
        let progress = match self.progress() {
            Ok(p) => p,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };
        if !unlock::is_unlocked(&self.atlas.country_ids(), &progress, &country) {
            // Locked entries do not react.
            return;
        }
        self.selected_country = Some(index);
        self.screen = Screen::LevelSelect;
    }

    fn choose_level(&mut self, tier: LevelTier) {
        self.tier = Some(tier);
        self.target_city = self
            .selected_country
            .and_then(|i| self.atlas.get(i))
            .and_then(|c| c.pick_city());
        self.last_run = None;
        self.screen = Screen::Playing;
    }

    // ── Run completion ──

    fn finish_run(&mut self, time_sec: u32) {
        let tier = match self.tier {
            Some(t) => t,
            None => return,
        };
        let player_id = self.player.as_ref().map(|p| p.id);
        let country = self
            .selected_country
            .and_then(|i| self.atlas.get(i))
            .map(|c| c.country.clone());

        let mut new_best = false;
        if let Some(id) = player_id {
            // Best check first, so the run does not compete with itself.
            new_best = match self.db.is_new_best(tier.db_level(), time_sec) {
                Ok(b) => b,
                Err(e) => {
                    self.status = e.to_string();
                    false
                }
            };
            if let Err(e) = self.db.record_score(id, tier.db_level(), time_sec) {
                self.status = e.to_string();
            }
            if let Some(name) = country {
                if let Err(e) = self.db.add_country_progress(id, &name) {
                    self.status = e.to_string();
                }
            }
        }

        self.last_run = Some(RunResult { tier, time_sec, new_best });
        self.screen = Screen::GameOver;
    }

    // ── Derived views ──

    /// The country rows on the current page, with their unlock state.
    pub fn page_view(&self) -> Vec<CountryView> {
        let per = self.tuning.countries_per_page.max(1);
        let start = self.country_page * per;
        let progress = self.progress().unwrap_or_default();
        let flags = unlock::unlocked_flags(&self.atlas.country_ids(), &progress);

        self.atlas
            .entries()
            .iter()
            .zip(flags)
            .enumerate()
            .skip(start)
            .take(per)
            .map(|(index, (c, unlocked))| CountryView {
                index,
                name: c.country.clone(),
                unlocked,
            })
            .collect()
    }

    fn fetch_board(&mut self) -> Vec<LevelBoard> {
        let mut board = Vec::with_capacity(LevelTier::ALL.len());
        for tier in LevelTier::ALL {
            let rows = match self.db.top_times(tier.db_level(), self.tuning.leaderboard_limit) {
                Ok(rows) => rows,
                Err(e) => {
                    self.status = e.to_string();
                    Vec::new()
                }
            };
            board.push(LevelBoard { tier, rows });
        }
        board
    }

    fn progress(&self) -> StoreResult<Vec<String>> {
        match &self.player {
            Some(p) => self.db.get_progress(p.id),
            None => Ok(Vec::new()),
        }
    }

    fn max_page(&self) -> usize {
        let per = self.tuning.countries_per_page.max(1);
        let total = self.atlas.len();
        if total == 0 { 0 } else { (total - 1) / per }
    }

    // ── Accessors ──

    pub fn screen(&self) -> Screen { self.screen }
    pub fn auth_mode(&self) -> AuthMode { self.auth_mode }
    pub fn status(&self) -> &str { &self.status }
    pub fn player(&self) -> Option<&Player> { self.player.as_ref() }
    pub fn country_page(&self) -> usize { self.country_page }
    pub fn page_count(&self) -> usize { self.max_page() + 1 }
    pub fn selected_country(&self) -> Option<&Country> {
        self.selected_country.and_then(|i| self.atlas.get(i))
    }
    pub fn target_city(&self) -> Option<&str> { self.target_city.as_deref() }
    pub fn tier(&self) -> Option<LevelTier> { self.tier }
    pub fn last_run(&self) -> Option<&RunResult> { self.last_run.as_ref() }
    pub fn board(&self) -> &[LevelBoard] { &self.board }
    pub fn music_on(&self) -> bool { self.music_on }
    pub fn should_quit(&self) -> bool { self.quit }
    pub fn db(&self) -> &MazeDb { &self.db }
    pub fn atlas(&self) -> &Atlas { &self.atlas }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_session(dir: &tempfile::TempDir) -> Session {
        let db = MazeDb::open(&dir.path().join("maze.json")).unwrap();
        let tuning = GameTuning { countries_per_page: 4, leaderboard_limit: 10 };
        Session::new(db, Atlas::fallback(), tuning)
    }

    fn signed_in(dir: &tempfile::TempDir) -> Session {
        let mut s = fresh_session(dir);
        s.handle(FlowEvent::SignupSubmitted {
            username: "ada".into(),
            password: "hunter2".into(),
            repeat: "hunter2".into(),
        });
        s.handle(FlowEvent::LoginSubmitted {
            username: "ada".into(),
            password: "hunter2".into(),
        });
        assert_eq!(s.screen(), Screen::MainMenu);
        s
    }

    /// Complete one easy run on the country at `index` and return to
    /// the main menu.
    fn run_country(s: &mut Session, index: usize, time_sec: u32) {
        s.handle(FlowEvent::MenuSelected(MenuItem::Play));
        s.handle(FlowEvent::CountryChosen(index));
        s.handle(FlowEvent::LevelChosen(LevelTier::Easy));
        s.handle(FlowEvent::RunCompleted { time_sec });
        s.handle(FlowEvent::Back);
        assert_eq!(s.screen(), Screen::MainMenu);
    }

    // ── Auth ──

    #[test]
    fn login_failure_stays_on_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = fresh_session(&dir);

        s.handle(FlowEvent::LoginSubmitted {
            username: "ghost".into(),
            password: "hunter2".into(),
        });
        assert_eq!(s.screen(), Screen::Login);
        assert!(s.player().is_none());
        assert_eq!(s.status(), "no such user 'ghost'");
    }

    #[test]
    fn signup_then_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = fresh_session(&dir);
        s.handle(FlowEvent::SwitchAuthMode);
        assert_eq!(s.auth_mode(), AuthMode::Signup);

        s.handle(FlowEvent::SignupSubmitted {
            username: "ada".into(),
            password: "hunter2".into(),
            repeat: "hunter2".into(),
        });
        // Success flips back to the login form with a hint.
        assert_eq!(s.auth_mode(), AuthMode::Login);
        assert_eq!(s.status(), "Account created! Log in now.");
        assert_eq!(s.screen(), Screen::Login);

        s.handle(FlowEvent::LoginSubmitted {
            username: "ada".into(),
            password: "hunter2".into(),
        });
        assert_eq!(s.screen(), Screen::MainMenu);
        assert_eq!(s.player().unwrap().username, "ada");
        assert_eq!(s.status(), "");
    }

    #[test]
    fn signup_form_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = fresh_session(&dir);

        s.handle(FlowEvent::SignupSubmitted {
            username: "ada".into(),
            password: "".into(),
            repeat: "".into(),
        });
        assert_eq!(s.status(), "Fill in every field.");

        s.handle(FlowEvent::SignupSubmitted {
            username: "ada".into(),
            password: "hunter2".into(),
            repeat: "hunter3".into(),
        });
        assert_eq!(s.status(), "Passwords do not match.");

        // Store-side rule surfaces on the same status line.
        s.handle(FlowEvent::SignupSubmitted {
            username: "ab".into(),
            password: "hunter2".into(),
            repeat: "hunter2".into(),
        });
        assert!(s.status().contains("at least"));
    }

    // ── Play flow ──

    #[test]
    fn full_run_records_score_and_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);

        s.handle(FlowEvent::MenuSelected(MenuItem::Play));
        assert_eq!(s.screen(), Screen::CountrySelect);
        assert_eq!(s.country_page(), 0);

        s.handle(FlowEvent::CountryChosen(0));
        assert_eq!(s.screen(), Screen::LevelSelect);
        assert_eq!(s.selected_country().unwrap().country, "India");

        s.handle(FlowEvent::LevelChosen(LevelTier::Easy));
        assert_eq!(s.screen(), Screen::Playing);
        let city = s.target_city().unwrap().to_string();
        assert!(s.atlas().get(0).unwrap().cities.contains(&city));

        s.handle(FlowEvent::RunCompleted { time_sec: 42 });
        assert_eq!(s.screen(), Screen::GameOver);
        let run = s.last_run().unwrap();
        assert_eq!(run.tier, LevelTier::Easy);
        assert_eq!(run.time_sec, 42);
        assert!(run.new_best);

        let player_id = s.player().unwrap().id;
        let board = s.db().top_times(LevelTier::Easy.db_level(), 10).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "ada");
        assert_eq!(board[0].time_sec, 42);
        assert_eq!(s.db().get_progress(player_id).unwrap(), vec!["India"]);

        s.handle(FlowEvent::Back);
        assert_eq!(s.screen(), Screen::MainMenu);
        assert!(s.tier().is_none());
        assert!(s.target_city().is_none());
        // The result stays readable until the next run starts.
        assert!(s.last_run().is_some());
    }

    #[test]
    fn locked_country_clicks_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        s.handle(FlowEvent::MenuSelected(MenuItem::Play));

        s.handle(FlowEvent::CountryChosen(2));
        assert_eq!(s.screen(), Screen::CountrySelect);
        assert!(s.selected_country().is_none());
    }

    #[test]
    fn completing_a_country_unlocks_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        run_country(&mut s, 0, 60);

        s.handle(FlowEvent::MenuSelected(MenuItem::Play));
        let view = s.page_view();
        assert!(view[0].unlocked);
        assert!(view[1].unlocked, "successor of a completed country");
        assert!(!view[2].unlocked);

        // And the successor is actually selectable now.
        s.handle(FlowEvent::CountryChosen(1));
        assert_eq!(s.screen(), Screen::LevelSelect);
    }

    #[test]
    fn abandoning_a_run_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);

        s.handle(FlowEvent::MenuSelected(MenuItem::Play));
        s.handle(FlowEvent::CountryChosen(0));
        s.handle(FlowEvent::LevelChosen(LevelTier::Medium));
        s.handle(FlowEvent::Back);
        assert_eq!(s.screen(), Screen::LevelSelect);

        let player_id = s.player().unwrap().id;
        assert!(s.db().top_times(LevelTier::Medium.db_level(), 10).unwrap().is_empty());
        assert!(s.db().get_progress(player_id).unwrap().is_empty());
    }

    // ── Paging ──

    #[test]
    fn paging_clamps_at_both_ends() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        s.handle(FlowEvent::MenuSelected(MenuItem::Play));

        // Ten countries, four per page.
        assert_eq!(s.page_count(), 3);
        s.handle(FlowEvent::PrevPage);
        assert_eq!(s.country_page(), 0);

        for _ in 0..5 {
            s.handle(FlowEvent::NextPage);
        }
        assert_eq!(s.country_page(), 2);

        let view = s.page_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].index, 8);
        assert_eq!(view[1].index, 9);
    }

    // ── Menus ──

    #[test]
    fn quit_sets_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        assert!(!s.should_quit());
        s.handle(FlowEvent::MenuSelected(MenuItem::Quit));
        assert!(s.should_quit());
    }

    #[test]
    fn music_toggles_in_preferences_and_while_playing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        assert!(s.music_on());

        s.handle(FlowEvent::MenuSelected(MenuItem::Preferences));
        s.handle(FlowEvent::ToggleMusic);
        assert!(!s.music_on());
        s.handle(FlowEvent::Back);

        s.handle(FlowEvent::MenuSelected(MenuItem::Play));
        s.handle(FlowEvent::CountryChosen(0));
        s.handle(FlowEvent::LevelChosen(LevelTier::Easy));
        s.handle(FlowEvent::ToggleMusic);
        assert!(s.music_on());
    }

    #[test]
    fn leaderboard_shows_best_times_per_tier() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);
        run_country(&mut s, 0, 60);
        run_country(&mut s, 0, 45);
        assert!(s.last_run().unwrap().new_best);
        run_country(&mut s, 0, 50);
        assert!(!s.last_run().unwrap().new_best);

        s.handle(FlowEvent::MenuSelected(MenuItem::Scores));
        assert_eq!(s.screen(), Screen::Leaderboard);
        assert_eq!(s.board().len(), 3);

        let easy = &s.board()[0];
        assert_eq!(easy.tier, LevelTier::Easy);
        assert_eq!(easy.rows.len(), 1);
        assert_eq!(easy.rows[0].time_sec, 45);
        assert!(s.board()[1].rows.is_empty());
        assert!(s.board()[2].rows.is_empty());

        s.handle(FlowEvent::Back);
        assert_eq!(s.screen(), Screen::MainMenu);
        assert!(s.board().is_empty());
    }

    #[test]
    fn events_on_the_wrong_screen_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = signed_in(&dir);

        s.handle(FlowEvent::RunCompleted { time_sec: 10 });
        assert_eq!(s.screen(), Screen::MainMenu);
        s.handle(FlowEvent::CountryChosen(0));
        assert_eq!(s.screen(), Screen::MainMenu);

        let player_id = s.player().unwrap().id;
        assert!(s.db().top_times(1, 10).unwrap().is_empty());
        assert!(s.db().get_progress(player_id).unwrap().is_empty());
    }
}
