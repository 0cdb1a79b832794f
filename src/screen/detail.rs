//! Full details for a single country, looked up by exact name.

use super::template::{description, translations, NOT_AVAILABLE};
use super::{load_render, star_render, LoadError, LoadState, ScreenError, StarState, ViewToken};
use crate::api::{Country, FetchError};
use crate::store::{StarredSet, StringListStore};
use crate::view::binding::Binding;
use crate::view::tree::{Fragment, NodeId, NodeMut, Tree};
use crate::view::ViewError;

pub const SECTION_TITLES: [&str; 3] = ["Description", "Translations", "National symbols"];

pub struct DetailScreen {
    name: Option<String>,
    token: ViewToken,
    tree: Tree,
    body: Binding<LoadState>,
    star: Binding<StarState>,
    headline: NodeId,
    subheadline: NodeId,
    description: NodeId,
    translations: NodeId,
    flag: NodeId,
    flag_caption: NodeId,
    arms: NodeId,
    arms_caption: NodeId,
    sections: [NodeId; 3],
    country: Option<Country>,
}

impl DetailScreen {
    /// A missing or empty `name` puts the screen straight into the error
    /// state; [`DetailScreen::fetch_name`] is then `None` and nothing should
    /// be fetched.
    pub fn new(name: Option<String>, token: ViewToken) -> Result<Self, ScreenError> {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("main").class("details"));
        let missing = move || ViewError::MissingNode(root);

        let head = tree
            .append(root, Fragment::new("div").class("headline"))
            .ok_or_else(missing)?;
        let headline = tree
            .append(head, Fragment::new("h1").class("title"))
            .ok_or_else(missing)?;
        let subheadline = tree
            .append(head, Fragment::new("span").class("subtitle"))
            .ok_or_else(missing)?;
        let star_node = tree
            .append(head, Fragment::new("span").class("star"))
            .ok_or_else(missing)?;

        let mut sections = [root; 3];
        for (slot, title) in sections.iter_mut().zip(SECTION_TITLES) {
            *slot = tree
                .append(
                    root,
                    Fragment::new("section")
                        .class("accordion-topic")
                        .attr("title", title),
                )
                .ok_or_else(missing)?;
        }
        tree.node_mut(sections[0])
            .ok_or_else(missing)?
            .add_class("show");

        let description = tree
            .append(sections[0], Fragment::new("p").class("description"))
            .ok_or_else(missing)?;
        let translations = tree
            .append(sections[1], Fragment::new("ul").class("translations"))
            .ok_or_else(missing)?;
        let flag = tree
            .append(sections[2], Fragment::new("img").class("country-flag"))
            .ok_or_else(missing)?;
        let flag_caption = tree
            .append(sections[2], Fragment::new("figcaption").class("country-flag"))
            .ok_or_else(missing)?;
        let arms = tree
            .append(sections[2], Fragment::new("img").class("coat-of-arms"))
            .ok_or_else(missing)?;
        let arms_caption = tree
            .append(sections[2], Fragment::new("figcaption").class("coat-of-arms"))
            .ok_or_else(missing)?;

        let initial = match &name {
            Some(_) => LoadState::Loading,
            None => LoadState::Error(LoadError::Input("missing country name".into())),
        };
        let body = Binding::new(&mut tree, root, initial, load_render())?;
        let star = Binding::new(&mut tree, star_node, StarState::Unstarred, star_render())?;

        if name.is_none() {
            tracing::warn!(token = %token, "details opened without a country name");
        }

        Ok(Self {
            name,
            token,
            tree,
            body,
            star,
            headline,
            subheadline,
            description,
            translations,
            flag,
            flag_caption,
            arms,
            arms_caption,
            sections,
            country: None,
        })
    }

    pub fn token(&self) -> ViewToken {
        self.token
    }

    /// Name to look up, if there is one.
    pub fn fetch_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn body(&self) -> &Binding<LoadState> {
        &self.body
    }

    pub fn star(&self) -> &Binding<StarState> {
        &self.star
    }

    pub fn headline(&self) -> NodeId {
        self.headline
    }

    pub fn subheadline(&self) -> NodeId {
        self.subheadline
    }

    pub fn description(&self) -> NodeId {
        self.description
    }

    pub fn translations(&self) -> NodeId {
        self.translations
    }

    pub fn symbols(&self) -> [(NodeId, NodeId); 2] {
        [(self.flag, self.flag_caption), (self.arms, self.arms_caption)]
    }

    pub fn sections(&self) -> [NodeId; 3] {
        self.sections
    }

    pub fn apply(&mut self, result: Result<Country, FetchError>, starred: &StarredSet) -> Result<(), ScreenError> {
        let country = match result {
            Ok(country) => country,
            Err(err) => {
                tracing::warn!(token = %self.token, name = ?self.name, error = %err, "country details unavailable");
                self.body
                    .set_state(&mut self.tree, LoadState::Error(LoadError::from(&err)))?;
                return Ok(());
            }
        };

        let official = country.name.official.clone();
        self.set_text(self.headline, country.id().to_string())?;
        self.set_text(self.subheadline, official.clone())?;
        self.set_text(self.description, description(&country))?;
        self.tree.clear_children(self.translations);
        for item in translations(&country) {
            self.tree
                .append(self.translations, item)
                .ok_or(ViewError::MissingNode(self.translations))?;
        }
        self.set_text(self.flag_caption, format!("{} flag", official))?;
        self.set_text(self.arms_caption, format!("{} coat of arms", official))?;

        let flag_alt = country
            .flags
            .alt
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let flag_src = country.flags.svg.clone().unwrap_or_default();
        let arms_src = country.coat_of_arms.svg.clone().unwrap_or_default();
        self.node(self.flag)?
            .set_attr("src", flag_src)
            .set_attr("alt", flag_alt);
        self.node(self.arms)?
            .set_attr("src", arms_src)
            .set_attr("alt", format!("The {} coat of arms", official));

        let state = StarState::from_starred(starred.contains(country.id()));
        self.star.set_state(&mut self.tree, state)?;
        tracing::debug!(token = %self.token, name = country.id(), "details loaded");
        self.country = Some(country);
        self.body.set_state(&mut self.tree, LoadState::Data)?;
        Ok(())
    }

    fn node(&mut self, id: NodeId) -> Result<NodeMut<'_>, ViewError> {
        self.tree.node_mut(id).ok_or(ViewError::MissingNode(id))
    }

    fn set_text(&mut self, id: NodeId, text: String) -> Result<(), ViewError> {
        self.node(id)?.set_text(text);
        Ok(())
    }

    /// Star or unstar the shown country. `None` until a record is loaded.
    pub fn toggle_star(
        &mut self,
        starred: &mut StarredSet,
        store: &mut dyn StringListStore,
    ) -> Result<Option<bool>, ScreenError> {
        let Some(name) = self.country.as_ref().map(|c| c.id().to_string()) else {
            return Ok(None);
        };
        let now = starred.toggle(&name, store)?;
        self.star
            .set_state(&mut self.tree, StarState::from_starred(now))?;
        Ok(Some(now))
    }

    /// Expand or collapse accordion section `index` (0-based). Returns
    /// whether it is now shown.
    pub fn toggle_section(&mut self, index: usize) -> Result<Option<bool>, ScreenError> {
        let Some(&section) = self.sections.get(index) else {
            return Ok(None);
        };
        Ok(Some(self.node(section)?.toggle_class("show")))
    }
}
