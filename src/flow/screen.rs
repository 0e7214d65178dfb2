/// The screens a session moves through. Pure identifiers; the data
/// each screen shows lives in [`Session`](crate::flow::session::Session).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Login,
    MainMenu,
    CountrySelect,
    LevelSelect,
    Playing,
    GameOver,
    Preferences,
    Leaderboard,
}
