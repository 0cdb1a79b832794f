//! State-bound views.
//!
//! A [`Binding`] pairs one state value with one node and a render callback.
//! The callback runs once when the binding is created and once per state
//! assignment, never on read.
//!
//! Lookup from a node back to its binding goes through a [`BindingRegistry`]
//! owned by the rendering layer rather than through the node itself. The
//! registry also serialises transitions: callbacks only ever see `&S` and a
//! [`NodeMut`], so they cannot re-enter the registry, and transitions queued
//! with [`BindingRegistry::request`] are applied one at a time by
//! [`BindingRegistry::flush`].

use super::tree::{NodeId, NodeMut, Tree};
use super::ViewError;
use slotmap::SecondaryMap;
use std::collections::VecDeque;
use std::rc::Rc;

/// Render callback shared by every binding of the same kind.
pub type RenderFn<S> = Rc<dyn Fn(&S, NodeMut<'_>)>;

pub struct Binding<S> {
    node: NodeId,
    state: S,
    render: RenderFn<S>,
}

impl<S> Binding<S> {
    pub fn new(
        tree: &mut Tree,
        node: NodeId,
        initial: S,
        render: RenderFn<S>,
    ) -> Result<Self, ViewError> {
        let binding = Self {
            node,
            state: initial,
            render,
        };
        binding.report(tree)?;
        Ok(binding)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn set_state(&mut self, tree: &mut Tree, state: S) -> Result<(), ViewError> {
        self.state = state;
        self.report(tree)
    }

    fn report(&self, tree: &mut Tree) -> Result<(), ViewError> {
        let node = tree
            .node_mut(self.node)
            .ok_or(ViewError::MissingNode(self.node))?;
        (self.render)(&self.state, node);
        Ok(())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("node", &self.node)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

pub struct BindingRegistry<S> {
    bindings: SecondaryMap<NodeId, Binding<S>>,
    pending: VecDeque<(NodeId, S)>,
}

impl<S> Default for BindingRegistry<S> {
    fn default() -> Self {
        Self {
            bindings: SecondaryMap::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<S> BindingRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `node`, rendering `initial` immediately. Rebinding a node replaces
    /// its previous binding.
    pub fn bind(
        &mut self,
        tree: &mut Tree,
        node: NodeId,
        initial: S,
        render: RenderFn<S>,
    ) -> Result<&Binding<S>, ViewError> {
        let binding = Binding::new(tree, node, initial, render)?;
        self.bindings.insert(node, binding);
        self.bindings.get(node).ok_or(ViewError::MissingNode(node))
    }

    pub fn state(&self, node: NodeId) -> Option<&S> {
        self.bindings.get(node).map(Binding::state)
    }

    /// Queue a transition without applying it.
    pub fn request(&mut self, node: NodeId, state: S) {
        self.pending.push_back((node, state));
    }

    /// Queue a transition and drain the queue.
    pub fn set_state(&mut self, tree: &mut Tree, node: NodeId, state: S) -> Result<(), ViewError> {
        self.request(node, state);
        self.flush(tree).map(|_| ())
    }

    /// Apply queued transitions in FIFO order. Stops at the first transition
    /// whose node has no binding and leaves the rest queued.
    pub fn flush(&mut self, tree: &mut Tree) -> Result<usize, ViewError> {
        let mut applied = 0;
        while let Some((node, state)) = self.pending.pop_front() {
            let binding = self
                .bindings
                .get_mut(node)
                .ok_or(ViewError::Unbound(node))?;
            binding.set_state(tree, state)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Drop bindings whose nodes are no longer in the tree.
    pub fn prune(&mut self, tree: &Tree) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|node, _| tree.contains(node));
        self.pending.retain(|(node, _)| tree.contains(*node));
        before - self.bindings.len()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
