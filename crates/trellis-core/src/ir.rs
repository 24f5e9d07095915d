//! The intermediate representation produced by evaluation.
//!
//! The IR is a tree: the root [`Region`] holds [`Node`]s and [`Edge`]s in
//! declaration order, every node owns exactly one nested region, and edges
//! refer to nodes by [`NodeId`]. All attributes are already merged into a
//! [`Config`]; composition never looks at classes or names again.

mod anchor;
mod config;
mod region;

pub use anchor::{Anchor, ClosestKind, Compass};
pub use config::{Alignment, AxisAlign, Config, Gutter, TrackSize};
pub use region::{ArrowDirection, Edge, EdgeId, Endpoint, Entity, Node, NodeId, Region};
