//! State-driven view layer: a retained node tree, state bindings over its
//! nodes, a list renderer built on those bindings, and pagination.

pub mod binding;
pub mod list;
pub mod pager;
pub mod tree;

use thiserror::Error;
use tree::NodeId;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("node {0:?} is not attached to the view tree")]
    MissingNode(NodeId),
    #[error("node {0:?} has no state binding")]
    Unbound(NodeId),
    #[error("inserted fragment could not be located by group class '{0}'")]
    Untagged(String),
}
