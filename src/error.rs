//! Errors returned by [`Tree`][crate::Tree] operations.

use thiserror::Error;

use crate::node::NodeId;
use crate::util::Side;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when operating on a [`Tree`][crate::Tree].
///
/// None of these are transient. A failed call never mutates the tree, so the
/// caller can either fix its input or pre-validate (e.g. with
/// [`Tree::contains`][crate::Tree::contains]) before trying again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The handle was issued by a different tree.
    #[error("node {0:?} does not belong to this tree")]
    ForeignNode(NodeId),

    /// The handle refers to a node that has since been removed from the tree.
    #[error("node {0:?} is not in the tree")]
    NodeNotFound(NodeId),

    /// No node carries the requested key.
    #[error("no node was found with the requested key")]
    KeyNotFound,

    /// A rotation needs a child on `side` but the node has none there.
    #[error("cannot rotate node {node:?}: it has no {side} child")]
    MissingChild {
        /// The node that was asked to rotate.
        node: NodeId,
        /// The side the missing child should have been on.
        side: Side,
    },

    /// A relationship query that only makes sense for non-root nodes was made
    /// on a node without a parent.
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),

    /// The link structure is inconsistent. Seeing this means there is a bug in
    /// this crate.
    #[error("structural invariant violated: {0}")]
    Corrupted(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument can never be valid for this tree.
    InvalidArgument,
    /// A key or node could not be resolved.
    LookupFailure,
    /// The operation is not defined for the node's current shape.
    PreconditionViolation,
    /// The tree's links are inconsistent.
    StructuralInvariantViolation,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ForeignNode(_) => ErrorKind::InvalidArgument,
            Self::NodeNotFound(_) | Self::KeyNotFound => ErrorKind::LookupFailure,
            Self::MissingChild { .. } | Self::NoParent(_) => ErrorKind::PreconditionViolation,
            Self::Corrupted(_) => ErrorKind::StructuralInvariantViolation,
        }
    }
}
