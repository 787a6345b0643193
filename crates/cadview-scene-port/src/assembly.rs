// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Assembly tree handed to the tessellator.

/// Root group name of every published assembly.
pub const ROOT_NAME: &str = "Objects";

/// Leaf of the assembly: one tessellatable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Part<S> {
    /// Display name.
    pub name: String,
    /// Collaborator-specific shape handle.
    pub shape: S,
    /// RGB color.
    pub color: [u8; 3],
    /// Alpha as transmitted.
    pub alpha: f64,
}

/// Node of the assembly tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PartNode<S> {
    /// Single shape.
    Part(Part<S>),
    /// Nested group.
    Group(PartGroup<S>),
}

impl<S> PartNode<S> {
    /// Leaf count below (and including) this node.
    pub fn count_shapes(&self) -> usize {
        match self {
            Self::Part(_) => 1,
            Self::Group(group) => group.count_shapes(),
        }
    }
}

/// Named group of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGroup<S> {
    /// Group name.
    pub name: String,
    /// Children in display order.
    pub children: Vec<PartNode<S>>,
}

impl<S> PartGroup<S> {
    /// Empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a child.
    pub fn push(&mut self, node: PartNode<S>) {
        self.children.push(node);
    }

    /// Total number of leaf shapes.
    pub fn count_shapes(&self) -> usize {
        self.children.iter().map(PartNode::count_shapes).sum()
    }

    /// If this group wraps exactly one group, return that inner group.
    pub fn collapse_single_group(mut self) -> Self {
        if self.children.len() == 1 && matches!(self.children[0], PartNode::Group(_)) {
            if let Some(PartNode::Group(inner)) = self.children.pop() {
                return inner;
            }
        }
        self
    }

    /// Visit every leaf depth-first, in display order.
    pub fn for_each_part<'a>(&'a self, f: &mut impl FnMut(&'a Part<S>)) {
        for child in &self.children {
            match child {
                PartNode::Part(part) => f(part),
                PartNode::Group(group) => group.for_each_part(f),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str) -> PartNode<u32> {
        PartNode::Part(Part {
            name: name.into(),
            shape: 0,
            color: [0, 0, 0],
            alpha: 0.99,
        })
    }

    #[test]
    fn counts_nested_leaves() {
        let mut inner = PartGroup::new("inner");
        inner.push(part("a"));
        inner.push(part("b"));
        let mut root = PartGroup::new(ROOT_NAME);
        root.push(PartNode::Group(inner));
        root.push(part("c"));
        assert_eq!(root.count_shapes(), 3);
    }

    #[test]
    fn single_wrapping_group_collapses() {
        let mut inner = PartGroup::new("inner");
        inner.push(part("a"));
        let mut root = PartGroup::new(ROOT_NAME);
        root.push(PartNode::Group(inner));
        let collapsed = root.collapse_single_group();
        assert_eq!(collapsed.name, "inner");
        assert_eq!(collapsed.count_shapes(), 1);
    }

    #[test]
    fn single_part_does_not_collapse() {
        let mut root = PartGroup::new(ROOT_NAME);
        root.push(part("a"));
        assert_eq!(root.collapse_single_group().name, ROOT_NAME);
    }

    #[test]
    fn leaves_are_visited_in_order() {
        let mut inner = PartGroup::new("inner");
        inner.push(part("b"));
        let mut root = PartGroup::new(ROOT_NAME);
        root.push(part("a"));
        root.push(PartNode::Group(inner));
        root.push(part("c"));
        let mut names = Vec::new();
        root.for_each_part(&mut |p| names.push(p.name.as_str()));
        assert_eq!(names, ["a", "b", "c"]);
    }
}
