/// Player intents fed into the session state machine.
/// The presentation layer translates raw input into these; the session
/// decides what they mean on the current screen.

use crate::domain::tier::LevelTier;

#[derive(Clone, Debug)]
pub enum FlowEvent {
    /// Login form submitted.
    LoginSubmitted { username: String, password: String },
    /// Signup form submitted.
    SignupSubmitted { username: String, password: String, repeat: String },
    /// Toggle between the login and signup forms.
    SwitchAuthMode,
    /// A main menu entry chosen.
    MenuSelected(MenuItem),
    /// Next page of the country list.
    NextPage,
    /// Previous page of the country list.
    PrevPage,
    /// A country chosen by absolute atlas index.
    CountryChosen(usize),
    /// A difficulty tier chosen.
    LevelChosen(LevelTier),
    /// The maze was solved in `time_sec` seconds.
    RunCompleted { time_sec: u32 },
    /// Music on/off.
    ToggleMusic,
    /// Leave the current screen.
    Back,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    Play,
    Scores,
    Preferences,
    Quit,
}
