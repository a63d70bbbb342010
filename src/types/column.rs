//! Column definitions supplied by the host.

use serde::Deserialize;

/// Which pane a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    #[default]
    None,
    Left,
    Right,
}

impl FixedSide {
    #[must_use]
    pub fn is_fixed(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One column as declared by the host. An explicit `width` wins outright;
/// otherwise `min_width` seeds flex distribution of the leftover container
/// width.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    #[serde(default)]
    pub fixed: FixedSide,
}

impl ColumnSpec {
    /// Flexible column with a minimum width.
    #[must_use]
    pub fn flex(key: impl Into<String>, min_width: f64) -> Self {
        Self {
            key: key.into(),
            width: None,
            min_width,
            fixed: FixedSide::None,
        }
    }

    /// Column with a concrete pixel width.
    #[must_use]
    pub fn fixed_width(key: impl Into<String>, width: f64) -> Self {
        Self {
            key: key.into(),
            width: Some(width),
            min_width: default_min_width(),
            fixed: FixedSide::None,
        }
    }

    #[must_use]
    pub fn pinned(mut self, side: FixedSide) -> Self {
        self.fixed = side;
        self
    }
}

fn default_min_width() -> f64 {
    80.0
}
