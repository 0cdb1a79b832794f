use crate::api::{Country, FetchError, FilterKind};
use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::screen::{DetailScreen, ListMode, ListScreen, LoadState, Route, ScreenError, ViewToken};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    let result = match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::RecordsLoaded { token, result } => handle_records(state, token, result),
        AppEvent::DetailLoaded { token, result } => handle_detail(state, token, result),
        AppEvent::Tick => {
            handle_tick(state);
            Ok(vec![])
        }
    };

    match result {
        Ok(actions) => actions,
        Err(e) => {
            tracing::error!(error = %e, route = %state.route, "screen update failed");
            state.status_message = Some(e.to_string());
            state.dirty = true;
            vec![]
        }
    }
}

/// Responses for a screen that has since been replaced are dropped.
fn is_stale(state: &AppState, token: ViewToken) -> bool {
    let current = state.screen.token();
    if token != current {
        tracing::debug!(%token, %current, "discarding stale response");
        return true;
    }
    false
}

fn handle_records(
    state: &mut AppState,
    token: ViewToken,
    result: Result<Vec<Country>, FetchError>,
) -> Result<Vec<Action>, ScreenError> {
    if is_stale(state, token) {
        return Ok(vec![]);
    }
    if let Screen::List(list) = &mut state.screen {
        list.apply_records(result, &state.starred)?;
        state.dirty = true;
    }
    Ok(vec![])
}

fn handle_detail(
    state: &mut AppState,
    token: ViewToken,
    result: Result<Country, FetchError>,
) -> Result<Vec<Action>, ScreenError> {
    if is_stale(state, token) {
        return Ok(vec![]);
    }
    if let Screen::Detail(detail) = &mut state.screen {
        detail.apply(result, &state.starred)?;
        state.dirty = true;
    }
    Ok(vec![])
}

fn handle_tick(state: &mut AppState) {
    state.tick_count = state.tick_count.wrapping_add(1);
    // The loading spinner is the only thing that animates.
    if *state.screen.load_state() == LoadState::Loading && state.tick_count % 2 == 0 {
        state.dirty = true;
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Result<Vec<Action>, ScreenError> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            Ok(vec![])
        }
        _ => Ok(vec![]),
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Result<Vec<Action>, ScreenError> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(vec![Action::Quit]);
    }

    // The query line captures all input while it is open
    let editing = matches!(&state.screen, Screen::List(list) if list.draft().is_some());
    if editing {
        return handle_query_key(state, key);
    }

    match key.code {
        KeyCode::Char('q') => return Ok(vec![Action::Quit]),
        KeyCode::Esc => return state.back(),
        KeyCode::Tab => {
            let next = match state.route {
                Route::Browse { .. } => Route::Starred,
                _ => Route::Browse {
                    filter: FilterKind::All,
                    query: String::new(),
                },
            };
            return state.navigate(next);
        }
        _ => {}
    }

    if matches!(state.screen, Screen::List(_)) {
        handle_list_key(state, key)
    } else {
        handle_detail_key(state, key)
    }
}

fn handle_query_key(state: &mut AppState, key: KeyEvent) -> Result<Vec<Action>, ScreenError> {
    if key.code == KeyCode::Enter {
        let token = state.allocate_token();
        return submit_query(state, token);
    }
    let Some(list) = list_mut(state) else {
        return Ok(vec![]);
    };
    match key.code {
        KeyCode::Esc => {
            list.cancel_edit();
        }
        KeyCode::Backspace => list.pop_char(),
        KeyCode::Char(c) => list.push_char(c),
        _ => {}
    }
    Ok(vec![])
}

/// Restart the browse screen under `token` with the typed query.
fn submit_query(state: &mut AppState, token: ViewToken) -> Result<Vec<Action>, ScreenError> {
    let Screen::List(list) = &mut state.screen else {
        return Ok(vec![]);
    };
    list.restart(token)?;
    let (kind, value) = list.request();
    if let ListMode::Browse { filter, query } = list.mode() {
        state.route = Route::Browse {
            filter: *filter,
            query: query.clone(),
        };
    }
    tracing::info!(filter = kind.label(), query = %value, %token, "search submitted");
    Ok(vec![Action::FetchRecords { token, kind, value }])
}

fn list_mut(state: &mut AppState) -> Option<&mut ListScreen> {
    match &mut state.screen {
        Screen::List(list) => Some(list),
        Screen::Detail(_) => None,
    }
}

fn detail_mut(state: &mut AppState) -> Option<&mut DetailScreen> {
    match &mut state.screen {
        Screen::Detail(detail) => Some(detail),
        Screen::List(_) => None,
    }
}

fn handle_list_key(state: &mut AppState, key: KeyEvent) -> Result<Vec<Action>, ScreenError> {
    match key.code {
        KeyCode::Right => {
            if let Screen::List(list) = &mut state.screen {
                list.next_page(&state.starred)?;
            }
        }
        KeyCode::Left => {
            if let Screen::List(list) = &mut state.screen {
                list.prev_page(&state.starred)?;
            }
        }
        KeyCode::Down => {
            if let Some(list) = list_mut(state) {
                list.select_next();
            }
        }
        KeyCode::Up => {
            if let Some(list) = list_mut(state) {
                list.select_prev();
            }
        }
        KeyCode::Char('s') | KeyCode::Char(' ') => toggle_list_star(state),
        KeyCode::Enter => {
            let name = list_mut(state)
                .and_then(|list| list.selected_country())
                .map(|c| c.id().to_string());
            if let Some(name) = name {
                return state.navigate(Route::Details { name: Some(name) });
            }
        }
        KeyCode::Char('/') => {
            if let Some(list) = list_mut(state) {
                list.begin_edit();
            }
        }
        KeyCode::Char('f') => {
            let cycled = match list_mut(state) {
                Some(list) => list.cycle_filter()?,
                None => None,
            };
            match cycled {
                // Nothing to type for "all", so fetch straight away.
                Some(FilterKind::All) => {
                    let token = state.allocate_token();
                    return submit_query(state, token);
                }
                Some(kind) => {
                    state.status_message = Some(format!("filter: {} (press / to search)", kind.label()));
                }
                None => {}
            }
        }
        _ => {}
    }
    Ok(vec![])
}

fn toggle_list_star(state: &mut AppState) {
    let Screen::List(list) = &mut state.screen else {
        return;
    };
    let name = list.selected_country().map(|c| c.id().to_string());
    match list.toggle_selected(&mut state.starred, state.store.as_mut()) {
        Ok(Some(starred)) => {
            let name = name.unwrap_or_default();
            state.status_message = Some(star_message(&name, starred));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "star toggle failed");
            state.status_message = Some(e.to_string());
        }
    }
}

fn handle_detail_key(state: &mut AppState, key: KeyEvent) -> Result<Vec<Action>, ScreenError> {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char(' ') => {
            let Screen::Detail(detail) = &mut state.screen else {
                return Ok(vec![]);
            };
            match detail.toggle_star(&mut state.starred, state.store.as_mut()) {
                Ok(Some(starred)) => {
                    let name = detail.country().map(|c| c.id().to_string()).unwrap_or_default();
                    state.status_message = Some(star_message(&name, starred));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "star toggle failed");
                    state.status_message = Some(e.to_string());
                }
            }
        }
        KeyCode::Char(c @ '1'..='3') => {
            let index = c as usize - '1' as usize;
            if let Some(detail) = detail_mut(state) {
                detail.toggle_section(index)?;
            }
        }
        KeyCode::Backspace => return state.back(),
        KeyCode::Down => state.detail_scroll = state.detail_scroll.saturating_add(1),
        KeyCode::Up => state.detail_scroll = state.detail_scroll.saturating_sub(1),
        KeyCode::PageDown => state.detail_scroll = state.detail_scroll.saturating_add(10),
        KeyCode::PageUp => state.detail_scroll = state.detail_scroll.saturating_sub(10),
        KeyCode::Home => state.detail_scroll = 0,
        _ => {}
    }
    Ok(vec![])
}

fn star_message(name: &str, starred: bool) -> String {
    if starred {
        format!("Starred {}", name)
    } else {
        format!("Unstarred {}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::CountryName;
    use crate::config::AppConfig;
    use crate::store::{MemoryStore, StarredSet};

    fn country(name: &str) -> Country {
        Country {
            name: CountryName {
                common: name.to_string(),
                ..CountryName::default()
            },
            ..Country::default()
        }
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn browse_state() -> AppState {
        let (state, _) = AppState::new(
            AppConfig::default(),
            StarredSet::default(),
            Box::new(MemoryStore::default()),
            Route::Browse {
                filter: FilterKind::All,
                query: String::new(),
            },
        )
        .unwrap();
        state
    }

    fn loaded(state: &mut AppState, names: &[&str]) {
        let token = state.screen.token();
        let records = names.iter().map(|n| country(n)).collect();
        handle_event(
            state,
            AppEvent::RecordsLoaded {
                token,
                result: Ok(records),
            },
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = browse_state();
        let old = state.screen.token();
        let actions = handle_event(&mut state, key(KeyCode::Tab));
        assert_eq!(state.route, Route::Starred);
        assert_eq!(actions.len(), 1);

        handle_event(
            &mut state,
            AppEvent::RecordsLoaded {
                token: old,
                result: Ok(vec![country("Chad")]),
            },
        );
        assert_eq!(*state.screen.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_enter_opens_selected_details() {
        let mut state = browse_state();
        loaded(&mut state, &["Chad", "Chile"]);
        handle_event(&mut state, key(KeyCode::Down));
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        assert_eq!(
            state.route,
            Route::Details {
                name: Some("Chile".into())
            }
        );
        let token = state.screen.token();
        assert_eq!(
            actions,
            vec![Action::FetchDetail {
                token,
                name: "Chile".into()
            }]
        );

        handle_event(
            &mut state,
            AppEvent::DetailLoaded {
                token,
                result: Ok(country("Chile")),
            },
        );
        assert_eq!(*state.screen.load_state(), LoadState::Data);

        handle_event(&mut state, key(KeyCode::Esc));
        assert!(matches!(state.route, Route::Browse { .. }));
    }

    #[test]
    fn test_star_toggle_reports_status() {
        let mut state = browse_state();
        loaded(&mut state, &["Chad"]);
        handle_event(&mut state, key(KeyCode::Char('s')));
        assert!(state.starred.contains("Chad"));
        assert_eq!(state.status_message.as_deref(), Some("Starred Chad"));
        handle_event(&mut state, key(KeyCode::Char(' ')));
        assert!(!state.starred.contains("Chad"));
        assert_eq!(state.status_message.as_deref(), Some("Unstarred Chad"));
    }

    #[test]
    fn test_query_submit_refetches_with_new_token() {
        let mut state = browse_state();
        loaded(&mut state, &["Chad"]);
        handle_event(&mut state, key(KeyCode::Char('f')));
        handle_event(&mut state, key(KeyCode::Char('/')));
        for c in "peru".chars() {
            handle_event(&mut state, key(KeyCode::Char(c)));
        }
        // 'q' while typing is text, not quit.
        assert!(!handle_event(&mut state, key(KeyCode::Char('q'))).contains(&Action::Quit));
        handle_event(&mut state, key(KeyCode::Backspace));

        let before = state.screen.token();
        let actions = handle_event(&mut state, key(KeyCode::Enter));
        let token = state.screen.token();
        assert_ne!(token, before);
        assert_eq!(
            actions,
            vec![Action::FetchRecords {
                token,
                kind: FilterKind::Name,
                value: "peru".into()
            }]
        );
        assert_eq!(
            state.route,
            Route::Browse {
                filter: FilterKind::Name,
                query: "peru".into()
            }
        );
        assert_eq!(*state.screen.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_quit_keys() {
        let mut state = browse_state();
        assert_eq!(handle_event(&mut state, key(KeyCode::Char('q'))), vec![Action::Quit]);
        let ctrl_c = AppEvent::Terminal(CEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(handle_event(&mut state, ctrl_c), vec![Action::Quit]);
    }

    #[test]
    fn test_detail_sections_and_scroll() {
        let (mut state, _) = AppState::new(
            AppConfig::default(),
            StarredSet::default(),
            Box::new(MemoryStore::default()),
            Route::Details {
                name: Some("Peru".into()),
            },
        )
        .unwrap();
        handle_event(&mut state, key(KeyCode::Char('2')));
        handle_event(&mut state, key(KeyCode::Down));
        handle_event(&mut state, key(KeyCode::Down));
        assert_eq!(state.detail_scroll, 2);
        let Screen::Detail(detail) = &state.screen else {
            panic!("expected details");
        };
        let second = detail.sections()[1];
        assert!(detail.tree().has_class(second, "show"));
    }
}
