//! Immutable paint primitives consumed by nodes while painting.

pub(crate) mod gradient;
pub(crate) mod shadow;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use gradient::LinearGradient;

/// Box background fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Fill {
    /// Uniform color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Linear gradient over the node's computed box.
    LinearGradient(LinearGradient),
}

impl Fill {
    /// `None` for fills that paint nothing by definition (a gradient with no colors).
    pub(crate) fn normalized(self) -> Option<Self> {
        match &self {
            Self::LinearGradient(g) if g.colors.is_empty() => None,
            _ => Some(self),
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::Solid { color }
    }
}

impl From<&str> for Fill {
    fn from(s: &str) -> Self {
        Self::Solid { color: s.into() }
    }
}

impl From<LinearGradient> for Fill {
    fn from(g: LinearGradient) -> Self {
        Self::LinearGradient(g)
    }
}
