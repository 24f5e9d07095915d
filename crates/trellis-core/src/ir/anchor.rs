//! Anchors: where an edge attaches to a node.

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// One of the eight compass directions of a node's anchor table.
///
/// The declaration order of the variants is the enumeration order used to
/// break ties between equally close anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    /// All directions in enumeration order.
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// Returns true for the diagonal directions.
    pub fn is_corner(self) -> bool {
        matches!(self, Compass::NE | Compass::SE | Compass::SW | Compass::NW)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compass::N => "n",
            Compass::NE => "ne",
            Compass::E => "e",
            Compass::SE => "se",
            Compass::S => "s",
            Compass::SW => "sw",
            Compass::W => "w",
            Compass::NW => "nw",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compass::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid compass direction `{s}`"))
    }
}

/// Which anchor table entries a closest-anchor search may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosestKind {
    /// Only NE, SE, SW and NW.
    Corners,
    /// Every entry of the table.
    Any,
}

/// How an endpoint selects its point on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// The center of the node's bounding box.
    #[default]
    NoAnchor,
    /// A fixed entry of the shape's anchor table.
    Specific(Compass),
    /// The table entry closest to the other endpoint.
    Closest(ClosestKind),
}

impl Anchor {
    pub fn is_closest(self) -> bool {
        matches!(self, Anchor::Closest(_))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::NoAnchor => f.write_str("center"),
            Anchor::Specific(compass) => write!(f, "{compass}"),
            Anchor::Closest(ClosestKind::Corners) => f.write_str("closest corner"),
            Anchor::Closest(ClosestKind::Any) => f.write_str("closest"),
        }
    }
}
