use crate::api::{Country, FetchError};
use crate::screen::ViewToken;
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A list fetch finished. `token` names the screen that asked for it.
    RecordsLoaded {
        token: ViewToken,
        result: Result<Vec<Country>, FetchError>,
    },

    /// An exact-name lookup finished.
    DetailLoaded {
        token: ViewToken,
        result: Result<Country, FetchError>,
    },

    /// Tick for UI refresh
    Tick,
}
