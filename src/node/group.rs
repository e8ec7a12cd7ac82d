use crate::node::{BoxModel, LayoutCx, Node, NodeBase};

/// Free layout: children keep the positions the caller gives them.
///
/// Without a requested size, each axis grows to cover every child's far edge.
#[derive(Clone, Debug, Default)]
pub struct Group {
    base: NodeBase,
    children: Vec<Node>,
}

impl Group {
    /// Group over `children`; insertion order is paint order.
    pub fn new<N: Into<Node>>(children: impl IntoIterator<Item = N>) -> Self {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Empty group.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a child on top of the existing ones.
    pub fn add(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a child in place.
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Insert a child at `index` in paint order. Indices past the end append on top.
    pub fn insert(&mut self, index: usize, child: impl Into<Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child.into());
    }

    /// Remove and return the child at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Children in paint order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable children in paint order.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Take the children out, dropping the group's own box.
    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub(crate) fn layout(&mut self, cx: &mut LayoutCx<'_>, max_width: Option<f64>) {
        let mut max_x = 0.0f64;
        let mut max_y = 0.0f64;
        for child in &mut self.children {
            child.layout(cx, max_width);
            let (x, y) = child.position();
            let s = child.computed_size();
            max_x = max_x.max(x + s.width);
            max_y = max_y.max(y + s.height);
        }
        self.base.resolve_size(max_x, max_y);
    }
}

impl BoxModel for Group {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/group.rs"]
mod tests;
