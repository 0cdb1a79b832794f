//! Retained view tree.
//!
//! Nodes live in a slot map owned by whichever screen renders them. Bindings
//! and list renderers refer to nodes by [`NodeId`] and never own them, so a
//! node removed from the tree simply stops resolving.

use slotmap::{new_key_type, SlotMap};
use std::collections::{BTreeMap, BTreeSet};

new_key_type! {
    /// Stable handle to a node in a [`Tree`].
    pub struct NodeId;
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Structured template output. The root is tagged by whoever inserts it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Default)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node, typically a screen root.
    pub fn create(&mut self, fragment: Fragment) -> NodeId {
        self.build(None, fragment)
    }

    /// Append `fragment` as the last child of `parent`. Existing children are
    /// left untouched. Returns `None` if `parent` is not in the tree.
    pub fn append(&mut self, parent: NodeId, fragment: Fragment) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.build(Some(parent), fragment);
        self.nodes[parent].children.push(id);
        Some(id)
    }

    fn build(&mut self, parent: Option<NodeId>, fragment: Fragment) -> NodeId {
        let Fragment {
            tag,
            classes,
            attrs,
            text,
            children,
        } = fragment;
        let id = self.nodes.insert(Node {
            tag,
            classes: classes.into_iter().collect(),
            attrs: attrs.into_iter().collect(),
            text,
            children: Vec::new(),
            parent,
        });
        for child in children {
            let child_id = self.build(Some(id), child);
            self.nodes[id].children.push(child_id);
        }
        id
    }

    /// Remove every child subtree of `parent`, returning the removed ids.
    pub fn clear_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get_mut(parent) else {
            return Vec::new();
        };
        let mut stack = std::mem::take(&mut node.children);
        let mut removed = Vec::new();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
                removed.push(id);
            }
        }
        removed
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.nodes.contains_key(id) {
            Some(NodeMut { tree: self, id })
        } else {
            None
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.has_class(class))
    }

    /// The most recently appended direct child of `parent` carrying `class`.
    pub fn last_child_with_class(&self, parent: NodeId, class: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .rev()
            .copied()
            .find(|&id| self.has_class(id, class))
    }

    /// First descendant of `root` (depth-first, document order) with `class`.
    pub fn find_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        None
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.nodes.get(id).map(|n| n.text.as_str()).unwrap_or("")
    }

    /// CSS-like path from the root down to `id`, e.g.
    /// `main.countries > section.countries-list`. Empty for a removed node.
    pub fn selector(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(node) = cursor.and_then(|id| self.nodes.get(id)) {
            let mut part = node.tag.clone();
            for class in &node.classes {
                part.push('.');
                part.push_str(class);
            }
            parts.push(part);
            cursor = node.parent;
        }
        parts.reverse();
        parts.join(" > ")
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Mutable cursor over a single node, handed to render and mount callbacks.
pub struct NodeMut<'a> {
    tree: &'a mut Tree,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&mut self) -> &mut Node {
        &mut self.tree.nodes[self.id]
    }

    pub fn get(&self) -> &Node {
        &self.tree.nodes[self.id]
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get().has_class(class)
    }

    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.node().classes.insert(class.to_string());
        self
    }

    pub fn remove_class(&mut self, class: &str) -> &mut Self {
        self.node().classes.remove(class);
        self
    }

    /// Remove every class in `group`, then add `class`.
    pub fn swap_class(&mut self, group: &[&str], class: &str) -> &mut Self {
        let classes = &mut self.node().classes;
        for c in group {
            classes.remove(*c);
        }
        classes.insert(class.to_string());
        self
    }

    pub fn toggle_class(&mut self, class: &str) -> bool {
        let classes = &mut self.node().classes;
        if classes.remove(class) {
            false
        } else {
            classes.insert(class.to_string());
            true
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.node().text = text.into();
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.node().attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn last_child(self) -> Option<NodeMut<'a>> {
        let id = *self.tree.nodes[self.id].children.last()?;
        Some(NodeMut {
            tree: self.tree,
            id,
        })
    }

    pub fn find_class(self, class: &str) -> Option<NodeMut<'a>> {
        let id = self.tree.find_class(self.id, class)?;
        Some(NodeMut {
            tree: self.tree,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> Fragment {
        Fragment::new("card")
            .child(Fragment::new("h2").class("title").text(name))
            .child(Fragment::new("span").class("star"))
    }

    #[test]
    fn test_append_preserves_existing_children() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("list"));
        let a = tree.append(root, card("a")).unwrap();
        let b = tree.append(root, card("b")).unwrap();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.node(a).unwrap().parent, Some(root));
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_selector_walks_to_root() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("main").class("countries"));
        let list = tree
            .append(root, Fragment::new("section").class("countries-list"))
            .unwrap();
        let item = tree.append(list, card("a").class("country-info")).unwrap();
        assert_eq!(
            tree.selector(item),
            "main.countries > section.countries-list > card.country-info"
        );
        assert_eq!(tree.selector(root), "main.countries");

        tree.clear_children(root);
        assert_eq!(tree.selector(item), "");
    }

    #[test]
    fn test_node_mut_last_child() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("list"));
        tree.append(root, card("a")).unwrap();
        let b = tree.append(root, card("b")).unwrap();
        let star = tree
            .node_mut(root)
            .and_then(NodeMut::last_child)
            .and_then(NodeMut::last_child)
            .map(|n| n.id());
        assert_eq!(star, tree.find_class(b, "star"));
        let leaf = tree.find_class(b, "star").unwrap();
        assert!(tree.node_mut(leaf).unwrap().last_child().is_none());
    }

    #[test]
    fn test_clear_children_removes_subtrees() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("list"));
        let a = tree.append(root, card("a")).unwrap();
        let removed = tree.clear_children(root);
        assert_eq!(removed.len(), 3);
        assert!(!tree.contains(a));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_last_child_with_class_picks_latest() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("list"));
        tree.append(root, card("a").class("item")).unwrap();
        tree.append(root, Fragment::new("hr")).unwrap();
        let b = tree.append(root, card("b").class("item")).unwrap();
        tree.append(root, Fragment::new("hr")).unwrap();
        assert_eq!(tree.last_child_with_class(root, "item"), Some(b));
    }

    #[test]
    fn test_node_mut_classes() {
        let mut tree = Tree::new();
        let root = tree.create(card("x"));
        let mut star = tree.node_mut(root).unwrap().find_class("star").unwrap();
        star.swap_class(&["fas", "far"], "far");
        assert!(star.has_class("far"));
        star.swap_class(&["fas", "far"], "fas");
        assert!(star.has_class("fas"));
        assert!(!star.has_class("far"));
        assert!(!star.toggle_class("fas"));
        assert!(star.get().classes.len() == 1);
    }

    #[test]
    fn test_append_to_missing_parent() {
        let mut tree = Tree::new();
        let root = tree.create(Fragment::new("list"));
        let child = tree.append(root, Fragment::new("x")).unwrap();
        tree.clear_children(root);
        assert!(tree.append(child, Fragment::new("y")).is_none());
        assert!(tree.node_mut(child).is_none());
    }
}
