//! Screens built on the view layer: the country lists and the detail page.
//!
//! Each screen owns its own view tree. The states below are what the
//! screens bind to nodes; their render callbacks are total over every
//! variant and only touch classes, attributes and text.

pub mod address;
pub mod detail;
pub mod list;
pub mod template;

use crate::api::FetchError;
use crate::store::StoreError;
use crate::view::binding::RenderFn;
use crate::view::tree::NodeMut;
use crate::view::ViewError;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub use address::Route;
pub use detail::DetailScreen;
pub use list::{ListMode, ListScreen};

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("could not save starred countries: {0}")]
    Store(#[from] StoreError),
}

/// Identifies one screen instance. Fetch results carry the token of the
/// screen that asked for them and are dropped if that screen is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewToken(u64);

impl ViewToken {
    pub fn next(self) -> Self {
        ViewToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ViewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a screen has nothing to show. All variants render the same error
/// state; the distinction is kept for logging and the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A required address parameter is missing or empty.
    Input(String),
    /// The lookup succeeded but matched nothing.
    Unavailable(String),
    /// Transport, status or decoding failure.
    Failed(String),
}

impl From<&FetchError> for LoadError {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::InvalidInput(field) => LoadError::Input(format!("missing {}", field)),
            FetchError::NotFound(name) => LoadError::Unavailable(format!("no match for '{}'", name)),
            other => LoadError::Failed(other.to_string()),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Input(msg) | LoadError::Unavailable(msg) | LoadError::Failed(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

pub const LOAD_CLASSES: [&str; 3] = ["loading", "error", "data"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Error(LoadError),
    Data,
}

impl LoadState {
    pub fn class(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Error(_) => "error",
            LoadState::Data => "data",
        }
    }
}

pub fn load_render() -> RenderFn<LoadState> {
    Rc::new(|state: &LoadState, mut node: NodeMut<'_>| {
        node.swap_class(&LOAD_CLASSES, state.class());
        let reason = match state {
            LoadState::Error(err) => err.to_string(),
            _ => String::new(),
        };
        node.set_attr("data-reason", reason);
    })
}

pub const STAR_CLASSES: [&str; 2] = ["fas", "far"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    Starred,
    Unstarred,
}

impl StarState {
    pub fn from_starred(starred: bool) -> Self {
        if starred {
            StarState::Starred
        } else {
            StarState::Unstarred
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            StarState::Starred => "fas",
            StarState::Unstarred => "far",
        }
    }
}

/// Applies to the node itself when it is the star control, otherwise to its
/// first descendant with class `star`.
pub fn star_render() -> RenderFn<StarState> {
    Rc::new(|state: &StarState, mut node: NodeMut<'_>| {
        if node.has_class("star") {
            node.swap_class(&STAR_CLASSES, state.class());
        } else if let Some(mut star) = node.find_class("star") {
            star.swap_class(&STAR_CLASSES, state.class());
        }
    })
}

/// Whether a navigation control accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Valid,
    Invalid,
}

impl NavState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            NavState::Valid
        } else {
            NavState::Invalid
        }
    }
}

pub fn nav_render() -> RenderFn<NavState> {
    Rc::new(|state: &NavState, mut node: NodeMut<'_>| match state {
        NavState::Valid => {
            node.remove_class("invalid");
        }
        NavState::Invalid => {
            node.add_class("invalid");
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRange {
    pub page: usize,
    pub total: usize,
}

pub fn range_render() -> RenderFn<PageRange> {
    Rc::new(|state: &PageRange, mut node: NodeMut<'_>| {
        node.set_text(format!("{} of {}", state.page, state.total));
    })
}
