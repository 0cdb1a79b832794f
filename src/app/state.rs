use crate::app::action::Action;
use crate::config::AppConfig;
use crate::screen::{DetailScreen, ListMode, ListScreen, LoadState, Route, ScreenError, ViewToken};
use crate::store::{StarredSet, StringListStore};
use std::num::NonZeroUsize;

/// The screen currently on display. Exactly one exists at a time.
pub enum Screen {
    List(ListScreen),
    Detail(DetailScreen),
}

impl Screen {
    pub fn token(&self) -> ViewToken {
        match self {
            Screen::List(list) => list.token(),
            Screen::Detail(detail) => detail.token(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        match self {
            Screen::List(list) => list.body().state(),
            Screen::Detail(detail) => detail.body().state(),
        }
    }
}

/// Build the screen for `route` and the fetch it needs, if any.
fn build_screen(
    route: &Route,
    token: ViewToken,
    page_size: NonZeroUsize,
) -> Result<(Screen, Option<Action>), ScreenError> {
    match route {
        Route::Starred | Route::Browse { .. } => {
            let mode = match route {
                Route::Browse { filter, query } => ListMode::Browse {
                    filter: *filter,
                    query: query.clone(),
                },
                _ => ListMode::Starred,
            };
            let list = ListScreen::new(mode, token, page_size)?;
            let (kind, value) = list.request();
            Ok((Screen::List(list), Some(Action::FetchRecords { token, kind, value })))
        }
        Route::Details { name } => {
            let detail = DetailScreen::new(name.clone(), token)?;
            let action = detail.fetch_name().map(|name| Action::FetchDetail {
                token,
                name: name.to_string(),
            });
            Ok((Screen::Detail(detail), action))
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub route: Route,
    pub screen: Screen,
    pub history: Vec<Route>,
    pub starred: StarredSet,
    pub store: Box<dyn StringListStore>,
    pub detail_scroll: u16,
    pub next_token: ViewToken,
    pub tick_count: u64,
    pub should_quit: bool,
    pub dirty: bool,
    pub status_message: Option<String>,
}

impl AppState {
    /// Open `route` as the first screen. The returned actions start its fetch.
    pub fn new(
        config: AppConfig,
        starred: StarredSet,
        store: Box<dyn StringListStore>,
        route: Route,
    ) -> Result<(Self, Vec<Action>), ScreenError> {
        let token = ViewToken::default();
        let (screen, action) = build_screen(&route, token, config.ui.page_size())?;
        tracing::info!(route = %route, token = %token, "opened screen");
        let state = Self {
            config,
            route,
            screen,
            history: Vec::new(),
            starred,
            store,
            detail_scroll: 0,
            next_token: token.next(),
            tick_count: 0,
            should_quit: false,
            dirty: true,
            status_message: None,
        };
        Ok((state, action.into_iter().collect()))
    }

    pub fn allocate_token(&mut self) -> ViewToken {
        let token = self.next_token;
        self.next_token = token.next();
        token
    }

    /// Replace the current screen without touching history.
    fn open(&mut self, route: Route) -> Result<Vec<Action>, ScreenError> {
        let token = self.allocate_token();
        let (screen, action) = build_screen(&route, token, self.config.ui.page_size())?;
        tracing::info!(route = %route, token = %token, "opened screen");
        self.screen = screen;
        self.route = route;
        self.detail_scroll = 0;
        self.status_message = None;
        self.dirty = true;
        Ok(action.into_iter().collect())
    }

    /// Open `route`, remembering the current one for [`AppState::back`].
    /// Navigating to the route on top of the history unwinds it instead.
    pub fn navigate(&mut self, route: Route) -> Result<Vec<Action>, ScreenError> {
        if route == self.route {
            return Ok(vec![]);
        }
        let returning = self.history.last() == Some(&route);
        let previous = self.route.clone();
        let actions = self.open(route)?;
        if returning {
            self.history.pop();
        } else {
            self.history.push(previous);
        }
        Ok(actions)
    }

    /// Return to the previous screen. Returns no actions at the root.
    pub fn back(&mut self) -> Result<Vec<Action>, ScreenError> {
        match self.history.pop() {
            Some(route) => self.open(route),
            None => Ok(vec![]),
        }
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        format!("{} | {} starred", self.route, self.starred.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FilterKind;
    use crate::store::MemoryStore;

    fn state(route: Route) -> (AppState, Vec<Action>) {
        AppState::new(
            AppConfig::default(),
            StarredSet::default(),
            Box::new(MemoryStore::default()),
            route,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_fetch_per_route() {
        let (_, actions) = state(Route::Starred);
        assert_eq!(
            actions,
            vec![Action::FetchRecords {
                token: ViewToken::default(),
                kind: FilterKind::All,
                value: String::new()
            }]
        );

        let (_, actions) = state(Route::Details {
            name: Some("Peru".into()),
        });
        assert!(matches!(&actions[..], [Action::FetchDetail { name, .. }] if name == "Peru"));

        let (s, actions) = state(Route::Details { name: None });
        assert!(actions.is_empty());
        assert!(matches!(s.screen.load_state(), LoadState::Error(_)));
    }

    #[test]
    fn test_navigate_and_back_use_fresh_tokens() {
        let (mut s, _) = state(Route::Starred);
        let first = s.screen.token();
        let actions = s
            .navigate(Route::Details {
                name: Some("Chad".into()),
            })
            .unwrap();
        let second = s.screen.token();
        assert_ne!(first, second);
        assert!(matches!(&actions[..], [Action::FetchDetail { token, .. }] if *token == second));
        assert_eq!(s.history, vec![Route::Starred]);

        s.back().unwrap();
        assert_eq!(s.route, Route::Starred);
        assert!(s.history.is_empty());
        assert_ne!(s.screen.token(), first);
        assert_ne!(s.screen.token(), second);
        assert!(s.back().unwrap().is_empty());
    }

    #[test]
    fn test_navigate_to_same_route_is_noop() {
        let (mut s, _) = state(Route::Starred);
        let token = s.screen.token();
        assert!(s.navigate(Route::Starred).unwrap().is_empty());
        assert_eq!(s.screen.token(), token);
        assert!(s.history.is_empty());
    }

    #[test]
    fn test_switching_back_and_forth_keeps_history_flat() {
        let (mut s, _) = state(Route::Starred);
        let browse = Route::Browse {
            filter: FilterKind::All,
            query: String::new(),
        };
        for _ in 0..1000 {
            s.navigate(browse.clone()).unwrap();
            s.navigate(Route::Starred).unwrap();
        }
        assert!(s.history.is_empty());

        s.navigate(browse.clone()).unwrap();
        assert_eq!(s.history, vec![Route::Starred]);
        s.back().unwrap();
        assert_eq!(s.route, Route::Starred);
        assert!(s.history.is_empty());
    }
}
