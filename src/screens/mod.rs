pub mod components;
pub mod tournament_options;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    Navigate(Screen),
    /// Rebuild the current screen from scratch, optionally announcing
    /// something once the new instance is up.
    Reload {
        message: Option<String>,
    },
    /// One-shot notice shown over whatever screen is active.
    SystemMessage(String),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    TournamentOptions,
}
