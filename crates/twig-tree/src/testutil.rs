//! Small in-memory tree used by the unit tests.

use crate::adapter::TreeAdapter;
use crate::builder::EditTreeBuilder;
use crate::edit_tree::EditTree;
use crate::error::TreeSide;
use crate::flags::propagate;
use crate::index::NodeIndex;
use crate::materialize::materialize;
use crate::moves::{detect_moves, resolve};

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: &'static str,
    pub label: &'static str,
    pub children: Vec<Node>,
}

impl Node {
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

pub fn node(id: &'static str, children: Vec<Node>) -> Node {
    Node { id, label: "", children }
}

pub fn leaf(id: &'static str) -> Node {
    node(id, Vec::new())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelChange {
    pub id: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub struct TestAdapter;

impl TreeAdapter<Node> for TestAdapter {
    type Id = &'static str;
    type Detail = LabelChange;

    fn children<'n>(&self, node: &'n Node) -> Vec<&'n Node> {
        node.children.iter().collect()
    }

    fn node_id(&self, node: &Node) -> Option<&'static str> {
        (!node.id.is_empty()).then_some(node.id)
    }

    fn property_modify_detail(&self, old: &Node, new: &Node) -> Option<LabelChange> {
        (old.label != new.label).then(|| LabelChange {
            id: new.id,
            from: old.label,
            to: new.label,
        })
    }
}

/// Both indices plus the finished edit tree, before emission.
pub struct Stages<'n> {
    pub old: NodeIndex<'n, Node, &'static str>,
    pub new: NodeIndex<'n, Node, &'static str>,
    pub tree: EditTree<&'static str>,
}

pub fn stages<'n>(old: &'n Node, new: &'n Node) -> Stages<'n> {
    let old = NodeIndex::build(old, &TestAdapter, TreeSide::Old).unwrap();
    let new = NodeIndex::build(new, &TestAdapter, TreeSide::New).unwrap();
    let mut draft = EditTreeBuilder::new(&TestAdapter, &old, &new).build().unwrap();
    materialize(&mut draft, &TestAdapter, &old, &new).unwrap();
    let moved = detect_moves(&draft);
    let mut tree = resolve(draft, moved);
    propagate(&mut tree, &TestAdapter, &old, &new).unwrap();
    Stages { old, new, tree }
}
