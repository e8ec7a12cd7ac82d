use serde::{Deserialize, Serialize};

use crate::node::{BoxModel, LayoutCx, Node, NodeBase};

/// Cross-axis placement of column children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignItems {
    /// Flush with the left padding edge.
    #[default]
    Start,
    /// Centered on the column's full width.
    Center,
    /// Flush with the right padding edge.
    End,
}

/// Stacks children top to bottom with a fixed gap.
#[derive(Clone, Debug, Default)]
pub struct Column {
    base: NodeBase,
    children: Vec<Node>,
    gap: f64,
    align_items: AlignItems,
}

impl Column {
    /// Column over `children`, in order.
    pub fn new<N: Into<Node>>(children: impl IntoIterator<Item = N>) -> Self {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the vertical gap between consecutive children.
    pub fn gap(mut self, value: f64) -> Self {
        self.gap = value;
        self
    }

    /// Set the cross-axis alignment.
    pub fn align_items(mut self, value: AlignItems) -> Self {
        self.align_items = value;
        self
    }

    /// Append a child at the bottom.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Children top to bottom.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable children top to bottom.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub(crate) fn layout(&mut self, cx: &mut LayoutCx<'_>, max_width: Option<f64>) {
        let p = self.base.style.padding;
        let mut total_h = 0.0f64;
        let mut max_child_w = 0.0f64;
        for child in &mut self.children {
            child.layout(cx, max_width);
            let s = child.computed_size();
            total_h += s.height;
            max_child_w = max_child_w.max(s.width);
        }
        total_h += self.children.len().saturating_sub(1) as f64 * self.gap;

        self.base.resolve_size(max_child_w + 2.0 * p, total_h + 2.0 * p);

        let w = self.base.computed_width;
        let mut cursor_y = p;
        for child in &mut self.children {
            let s = child.computed_size();
            let x = match self.align_items {
                AlignItems::Start => p,
                AlignItems::Center => (w - s.width) / 2.0,
                AlignItems::End => w - s.width - p,
            };
            child.set_position(x, cursor_y);
            cursor_y += s.height + self.gap;
        }
    }
}

impl BoxModel for Column {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/column.rs"]
mod tests;
