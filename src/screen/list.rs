//! The paginated country list, in starred or browse mode.

use super::template::country_card;
use super::{
    load_render, nav_render, range_render, star_render, LoadError, LoadState, NavState,
    PageRange, ScreenError, StarState, ViewToken,
};
use crate::api::{Country, FetchError, FilterKind};
use crate::store::{StarredSet, StringListStore};
use crate::view::binding::Binding;
use crate::view::list::{ListRenderer, MountFn, TemplateFn};
use crate::view::pager::Pager;
use crate::view::tree::{Fragment, NodeId, NodeMut, Tree};
use crate::view::ViewError;
use std::num::NonZeroUsize;
use std::rc::Rc;

/// Group class every country card carries.
pub const CARD_GROUP: &str = "country-info";
pub const NO_RESULTS: &str = "no search results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    /// Everything, narrowed to the starred set.
    Starred,
    Browse { filter: FilterKind, query: String },
}

impl ListMode {
    pub fn title(&self) -> &'static str {
        match self {
            ListMode::Starred => "Starred countries",
            ListMode::Browse { .. } => "Browse countries",
        }
    }
}

pub struct ListScreen {
    mode: ListMode,
    token: ViewToken,
    tree: Tree,
    body: Binding<LoadState>,
    prev: Binding<NavState>,
    next: Binding<NavState>,
    range: Binding<PageRange>,
    cards: ListRenderer<Country, StarState>,
    filter_label: NodeId,
    query_label: NodeId,
    notice: NodeId,
    pager: Pager<Country>,
    records: Vec<Country>,
    selected: usize,
    draft: Option<String>,
}

fn card_template() -> TemplateFn<Country> {
    Rc::new(country_card)
}

/// Cards expose their star control to the keyboard once mounted. The star
/// closes the actions row, which closes the card.
fn card_mount() -> MountFn<StarState> {
    Rc::new(|node: NodeMut<'_>, state: &StarState| {
        let star = node
            .last_child()
            .and_then(NodeMut::last_child)
            .filter(|n| n.has_class("star"));
        if let Some(mut star) = star {
            star.set_attr("data-key", "s");
            star.set_attr("data-initial", state.class());
        }
    })
}

impl ListScreen {
    pub fn new(mode: ListMode, token: ViewToken, page_size: NonZeroUsize) -> Result<Self, ScreenError> {
        let mut tree = Tree::new();
        let (filter_text, query_text) = match &mode {
            ListMode::Starred => (String::new(), String::new()),
            ListMode::Browse { filter, query } => (filter.label().to_string(), query.clone()),
        };

        let root = tree.create(Fragment::new("main").class("countries"));
        let missing = move || ViewError::MissingNode(root);
        tree.append(root, Fragment::new("h1").class("heading").text(mode.title()))
            .ok_or_else(missing)?;
        let search = tree
            .append(root, Fragment::new("form").class("search"))
            .ok_or_else(missing)?;
        let filter_label = tree
            .append(search, Fragment::new("select").class("filter").text(filter_text))
            .ok_or_else(missing)?;
        let query_label = tree
            .append(search, Fragment::new("input").class("query").text(query_text))
            .ok_or_else(missing)?;
        let container = tree
            .append(root, Fragment::new("section").class("countries-list"))
            .ok_or_else(missing)?;
        let notice = tree
            .append(root, Fragment::new("p").class("notice").class("hidden").text(NO_RESULTS))
            .ok_or_else(missing)?;
        let nav = tree
            .append(root, Fragment::new("nav").class("pagination"))
            .ok_or_else(missing)?;
        let prev_node = tree
            .append(nav, Fragment::new("button").class("previous-page").text("previous"))
            .ok_or_else(missing)?;
        let range_node = tree
            .append(nav, Fragment::new("span").class("page-range"))
            .ok_or_else(missing)?;
        let next_node = tree
            .append(nav, Fragment::new("button").class("next-page").text("next"))
            .ok_or_else(missing)?;

        let body = Binding::new(&mut tree, root, LoadState::Loading, load_render())?;
        let prev = Binding::new(&mut tree, prev_node, NavState::Invalid, nav_render())?;
        let next = Binding::new(&mut tree, next_node, NavState::Invalid, nav_render())?;
        let range = Binding::new(&mut tree, range_node, PageRange::default(), range_render())?;
        let cards = ListRenderer::new(CARD_GROUP, container, card_mount(), card_template(), star_render());

        Ok(Self {
            mode,
            token,
            tree,
            body,
            prev,
            next,
            range,
            cards,
            filter_label,
            query_label,
            notice,
            pager: Pager::new(page_size),
            records: Vec::new(),
            selected: 0,
            draft: None,
        })
    }

    pub fn mode(&self) -> &ListMode {
        &self.mode
    }

    pub fn token(&self) -> ViewToken {
        self.token
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn body(&self) -> &Binding<LoadState> {
        &self.body
    }

    pub fn cards(&self) -> &[NodeId] {
        self.cards.nodes()
    }

    /// Bound star state of a card on the current page.
    pub fn card_state(&self, card: NodeId) -> Option<&StarState> {
        self.cards.state(card)
    }

    pub fn notice(&self) -> NodeId {
        self.notice
    }

    pub fn filter_label(&self) -> NodeId {
        self.filter_label
    }

    pub fn query_label(&self) -> NodeId {
        self.query_label
    }

    pub fn prev_control(&self) -> NodeId {
        self.prev.node()
    }

    pub fn next_control(&self) -> NodeId {
        self.next.node()
    }

    pub fn range_control(&self) -> NodeId {
        self.range.node()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_country(&self) -> Option<&Country> {
        self.pager.current().get(self.selected)
    }

    #[cfg(test)]
    pub fn pager(&self) -> &Pager<Country> {
        &self.pager
    }

    /// Query text being typed, if the input line is active.
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Filter and value the current mode fetches with.
    pub fn request(&self) -> (FilterKind, String) {
        match &self.mode {
            ListMode::Starred => (FilterKind::All, String::new()),
            ListMode::Browse { filter, query } => (*filter, query.clone()),
        }
    }

    fn visible(&self, starred: &StarredSet) -> Vec<Country> {
        match self.mode {
            ListMode::Starred => starred.filter(&self.records),
            ListMode::Browse { .. } => self.records.clone(),
        }
    }

    /// Apply the outcome of the fetch this screen asked for.
    pub fn apply_records(
        &mut self,
        result: Result<Vec<Country>, FetchError>,
        starred: &StarredSet,
    ) -> Result<(), ScreenError> {
        match result {
            Ok(records) => {
                tracing::debug!(token = %self.token, count = records.len(), "records loaded");
                self.records = records;
                let visible = self.visible(starred);
                self.pager.load(&visible);
                self.selected = 0;
                self.display(starred)?;
                self.body.set_state(&mut self.tree, LoadState::Data)?;
            }
            Err(err) => {
                tracing::warn!(token = %self.token, error = %err, "country list unavailable");
                self.cards.clear(&mut self.tree);
                self.body
                    .set_state(&mut self.tree, LoadState::Error(LoadError::from(&err)))?;
            }
        }
        Ok(())
    }

    /// Rebuild the cards for the current page and refresh the controls.
    fn display(&mut self, starred: &StarredSet) -> Result<(), ViewError> {
        self.cards.clear(&mut self.tree);
        for country in self.pager.current() {
            let state = StarState::from_starred(starred.contains(country.id()));
            self.cards.insert(&mut self.tree, country, state)?;
        }

        let controls = self.pager.controls();
        self.prev
            .set_state(&mut self.tree, NavState::from_enabled(controls.prev_enabled))?;
        self.next
            .set_state(&mut self.tree, NavState::from_enabled(controls.next_enabled))?;
        self.range.set_state(
            &mut self.tree,
            PageRange {
                page: controls.page,
                total: controls.total,
            },
        )?;

        let mut notice = self
            .tree
            .node_mut(self.notice)
            .ok_or(ViewError::MissingNode(self.notice))?;
        if controls.empty {
            notice.remove_class("hidden");
        } else {
            notice.add_class("hidden");
        }

        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
        Ok(())
    }

    /// Returns false when the control is disabled.
    pub fn next_page(&mut self, starred: &StarredSet) -> Result<bool, ScreenError> {
        if *self.next.state() == NavState::Invalid {
            return Ok(false);
        }
        self.pager.next();
        tracing::debug!(page = self.pager.cursor(), of = self.pager.page_count(), "next page");
        self.selected = 0;
        self.display(starred)?;
        Ok(true)
    }

    pub fn prev_page(&mut self, starred: &StarredSet) -> Result<bool, ScreenError> {
        if *self.prev.state() == NavState::Invalid {
            return Ok(false);
        }
        self.pager.prev();
        tracing::debug!(page = self.pager.cursor(), of = self.pager.page_count(), "previous page");
        self.selected = 0;
        self.display(starred)?;
        Ok(true)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Star or unstar the selected card. Returns the new membership, or
    /// `None` when nothing is selected.
    pub fn toggle_selected(
        &mut self,
        starred: &mut StarredSet,
        store: &mut dyn StringListStore,
    ) -> Result<Option<bool>, ScreenError> {
        let Some(node) = self.cards.nodes().get(self.selected).copied() else {
            return Ok(None);
        };
        let Some(name) = self.selected_country().map(|c| c.id().to_string()) else {
            return Ok(None);
        };

        let now = starred.toggle(&name, store)?;
        match self.mode {
            ListMode::Starred => {
                let visible = starred.filter(&self.records);
                self.pager.reload(&visible);
                self.display(starred)?;
            }
            ListMode::Browse { .. } => {
                self.cards
                    .set_state(&mut self.tree, node, StarState::from_starred(now))?;
            }
        }
        Ok(Some(now))
    }

    pub fn begin_edit(&mut self) {
        if let ListMode::Browse { query, .. } = &self.mode {
            self.draft = Some(query.clone());
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.draft.take().is_some()
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(draft) = self.draft.as_mut() {
            draft.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
        }
    }

    /// Browse mode only.
    pub fn cycle_filter(&mut self) -> Result<Option<FilterKind>, ScreenError> {
        let ListMode::Browse { filter, .. } = &mut self.mode else {
            return Ok(None);
        };
        *filter = filter.next();
        let label = filter.label();
        let kind = *filter;
        self.tree
            .node_mut(self.filter_label)
            .ok_or(ViewError::MissingNode(self.filter_label))?
            .set_text(label);
        Ok(Some(kind))
    }

    /// Commit the typed query and start over under `token`. The caller is
    /// expected to issue the fetch for [`ListScreen::request`].
    pub fn restart(&mut self, token: ViewToken) -> Result<(), ScreenError> {
        if let Some(draft) = self.draft.take() {
            if let ListMode::Browse { query, .. } = &mut self.mode {
                *query = draft.trim().to_string();
            }
        }
        let query = match &self.mode {
            ListMode::Browse { query, .. } => query.clone(),
            ListMode::Starred => String::new(),
        };
        self.tree
            .node_mut(self.query_label)
            .ok_or(ViewError::MissingNode(self.query_label))?
            .set_text(query);

        self.token = token;
        self.records.clear();
        self.pager.load(&[]);
        self.selected = 0;
        self.cards.clear(&mut self.tree);
        self.body.set_state(&mut self.tree, LoadState::Loading)?;
        Ok(())
    }
}
