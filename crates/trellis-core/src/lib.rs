//! Trellis core types.
//!
//! This crate provides the data model shared by the evaluator and the
//! composer:
//!
//! - **Geometry**: points, sizes, bounds and borders ([`geometry`])
//! - **Spans**: source locations and names ([`span`])
//! - **Diagnostics**: errors, warnings and the collector ([`error`])
//! - **IR**: regions, nodes, edges and resolved configuration ([`ir`])
//! - **Draw**: shapes, anchor tables, text measurement and the output
//!   [`draw::Diagram`] ([`draw`])

pub mod color;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod span;
