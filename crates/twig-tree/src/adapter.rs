//! The capability interface a caller implements to describe its tree.
//!
//! The engine never inspects nodes directly. Everything it learns about a
//! node (its id, its children, whether its properties changed) comes
//! through a [`TreeAdapter`].

use std::fmt::Debug;
use std::hash::Hash;

/// Access to a caller-owned tree of `N` nodes.
///
/// Implementations must be pure: the same arguments always give the same
/// answer, and neither tree is mutated while a diff is running.
pub trait TreeAdapter<N> {
    /// Node identity. Must be unique within each tree. The same id in both
    /// trees means "the same node".
    type Id: Clone + Eq + Hash + Debug;

    /// Caller-defined description of a property change.
    type Detail;

    /// Ordered children of `node`. Leaves return an empty vector.
    fn children<'n>(&self, node: &'n N) -> Vec<&'n N>;

    /// The id of `node`, or `None` if it has none. Empty ids must be
    /// reported as `None`.
    fn node_id(&self, node: &N) -> Option<Self::Id>;

    /// What changed between two versions of the same node, or `None` if
    /// nothing did.
    fn property_modify_detail(&self, old: &N, new: &N) -> Option<Self::Detail>;

    /// Whether the properties of `old` and `new` differ.
    ///
    /// Defaults to asking for a detail and checking it is present.
    fn is_property_changed(&self, old: &N, new: &N) -> bool {
        self.property_modify_detail(old, new).is_some()
    }

    /// Whether `old` and `new` are the same node for child-list matching.
    ///
    /// Defaults to id equality.
    fn same_identity(&self, old: &N, new: &N) -> bool {
        match (self.node_id(old), self.node_id(new)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<N, A> TreeAdapter<N> for &A
where
    A: TreeAdapter<N> + ?Sized,
{
    type Id = A::Id;
    type Detail = A::Detail;

    fn children<'n>(&self, node: &'n N) -> Vec<&'n N> {
        (**self).children(node)
    }

    fn node_id(&self, node: &N) -> Option<Self::Id> {
        (**self).node_id(node)
    }

    fn property_modify_detail(&self, old: &N, new: &N) -> Option<Self::Detail> {
        (**self).property_modify_detail(old, new)
    }

    fn is_property_changed(&self, old: &N, new: &N) -> bool {
        (**self).is_property_changed(old, new)
    }

    fn same_identity(&self, old: &N, new: &N) -> bool {
        (**self).same_identity(old, new)
    }
}
