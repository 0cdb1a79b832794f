//! Repeated template rendering into a shared container.
//!
//! Every inserted item is built from the same template, tagged with the
//! renderer's group class, bound to its own state and mounted once.

use super::binding::{BindingRegistry, RenderFn};
use super::tree::{Fragment, NodeId, NodeMut, Tree};
use super::ViewError;
use std::rc::Rc;

pub type TemplateFn<R> = Rc<dyn Fn(&R) -> Fragment>;

/// One-time setup for a freshly inserted node. Runs after the node is bound.
pub type MountFn<S> = Rc<dyn Fn(NodeMut<'_>, &S)>;

pub struct ListRenderer<R, S> {
    group: String,
    container: NodeId,
    on_mount: MountFn<S>,
    template: TemplateFn<R>,
    on_state_change: RenderFn<S>,
    bindings: BindingRegistry<S>,
    items: Vec<NodeId>,
}

impl<R, S> ListRenderer<R, S> {
    pub fn new(
        group: impl Into<String>,
        container: NodeId,
        on_mount: MountFn<S>,
        template: TemplateFn<R>,
        on_state_change: RenderFn<S>,
    ) -> Self {
        Self {
            group: group.into(),
            container,
            on_mount,
            template,
            on_state_change,
            bindings: BindingRegistry::new(),
            items: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Render `record`, append it to the container, bind it to `initial` and
    /// mount it. On success the returned node is attached, tagged, bound and
    /// mounted.
    pub fn insert(&mut self, tree: &mut Tree, record: &R, initial: S) -> Result<NodeId, ViewError> {
        let fragment = (self.template)(record).class(self.group.clone());

        tree.append(self.container, fragment)
            .ok_or(ViewError::MissingNode(self.container))?;

        let node = tree
            .last_child_with_class(self.container, &self.group)
            .ok_or_else(|| ViewError::Untagged(self.group.clone()))?;

        let binding = self
            .bindings
            .bind(tree, node, initial, self.on_state_change.clone())?;
        let mounted = tree.node_mut(node).ok_or(ViewError::MissingNode(node))?;
        (self.on_mount)(mounted, binding.state());
        tracing::trace!(node = %tree.selector(node), "mounted list item");

        self.items.push(node);
        Ok(node)
    }

    /// Remove every child of the container and drop their bindings.
    pub fn clear(&mut self, tree: &mut Tree) {
        tree.clear_children(self.container);
        self.bindings.prune(tree);
        self.items.clear();
    }

    pub fn state(&self, node: NodeId) -> Option<&S> {
        self.bindings.state(node)
    }

    pub fn set_state(&mut self, tree: &mut Tree, node: NodeId, state: S) -> Result<(), ViewError> {
        self.bindings.set_state(tree, node, state)
    }

    /// Tagged item nodes in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Star {
        On,
        Off,
    }

    fn template() -> TemplateFn<&'static str> {
        Rc::new(|name: &&'static str| {
            Fragment::new("card")
                .child(Fragment::new("h2").class("title").text(*name))
                .child(Fragment::new("span").class("star"))
        })
    }

    fn star_render() -> RenderFn<Star> {
        Rc::new(|state: &Star, node: NodeMut<'_>| {
            if let Some(mut star) = node.find_class("star") {
                let class = match state {
                    Star::On => "fas",
                    Star::Off => "far",
                };
                star.swap_class(&["fas", "far"], class);
            }
        })
    }

    fn setup(mounted: &Rc<RefCell<Vec<Star>>>) -> (Tree, ListRenderer<&'static str, Star>) {
        let mut tree = Tree::new();
        let container = tree.create(Fragment::new("list"));
        let log = mounted.clone();
        let on_mount: MountFn<Star> = Rc::new(move |mut node: NodeMut<'_>, state: &Star| {
            node.set_attr("mounted", "yes");
            log.borrow_mut().push(*state);
        });
        let list = ListRenderer::new("country-info", container, on_mount, template(), star_render());
        (tree, list)
    }

    #[test]
    fn test_three_inserts_three_tagged_nodes() {
        let mounted = Rc::default();
        let (mut tree, mut list) = setup(&mounted);
        let a = list.insert(&mut tree, &"France", Star::On).unwrap();
        let b = list.insert(&mut tree, &"Ghana", Star::Off).unwrap();
        let c = list.insert(&mut tree, &"Peru", Star::On).unwrap();

        let tagged: Vec<_> = tree
            .children(list.container())
            .iter()
            .copied()
            .filter(|&id| tree.has_class(id, "country-info"))
            .collect();
        assert_eq!(tagged, vec![a, b, c]);
        assert_eq!(list.nodes(), &[a, b, c]);
        assert_eq!(list.state(a), Some(&Star::On));
        assert_eq!(list.state(b), Some(&Star::Off));
        assert_eq!(list.state(c), Some(&Star::On));
        assert_eq!(tree.text(tree.find_class(b, "title").unwrap()), "Ghana");
    }

    #[test]
    fn test_mount_runs_after_binding() {
        let mounted = Rc::default();
        let (mut tree, mut list) = setup(&mounted);
        let node = list.insert(&mut tree, &"Chad", Star::Off).unwrap();
        assert_eq!(*mounted.borrow(), vec![Star::Off]);
        assert_eq!(tree.node(node).unwrap().attr("mounted"), Some("yes"));
        let star = tree.find_class(node, "star").unwrap();
        assert!(tree.has_class(star, "far"));
    }

    #[test]
    fn test_set_state_updates_only_that_item() {
        let mounted = Rc::default();
        let (mut tree, mut list) = setup(&mounted);
        let a = list.insert(&mut tree, &"Oman", Star::Off).unwrap();
        let b = list.insert(&mut tree, &"Fiji", Star::Off).unwrap();
        list.set_state(&mut tree, b, Star::On).unwrap();

        assert!(tree.has_class(tree.find_class(a, "star").unwrap(), "far"));
        assert!(tree.has_class(tree.find_class(b, "star").unwrap(), "fas"));
        assert_eq!(list.state(b), Some(&Star::On));
    }

    #[test]
    fn test_clear_drops_items_and_bindings() {
        let mounted = Rc::default();
        let (mut tree, mut list) = setup(&mounted);
        let a = list.insert(&mut tree, &"Mali", Star::On).unwrap();
        list.clear(&mut tree);
        assert_eq!(list.len(), 0);
        assert!(list.state(a).is_none());
        assert!(tree.children(list.container()).is_empty());

        // Append-only again after clearing.
        list.insert(&mut tree, &"Iraq", Star::On).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insert_into_removed_container() {
        let mounted = Rc::default();
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("main"));
        let container = tree.append(root, Fragment::new("list")).unwrap();
        let log: Rc<RefCell<Vec<Star>>> = Rc::clone(&mounted);
        let on_mount: MountFn<Star> = Rc::new(move |_node: NodeMut<'_>, state: &Star| {
            log.borrow_mut().push(*state);
        });
        let mut list = ListRenderer::new("item", container, on_mount, template(), star_render());
        tree.clear_children(root);

        let err = list.insert(&mut tree, &"Laos", Star::On).unwrap_err();
        assert!(matches!(err, ViewError::MissingNode(id) if id == container));
        assert!(mounted.borrow().is_empty());
    }
}
