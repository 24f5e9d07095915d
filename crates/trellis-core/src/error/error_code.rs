//! Error codes for the Trellis diagnostic system.
//!
//! Codes are organized by concern:
//! - `E1xx` - Name and class resolution
//! - `E2xx` - Structural problems in the declaration tree or IR
//! - `E3xx` - Composition (sizing and anchors)
//! - `E4xx` / `W4xx` - Attribute values and merging

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Resolution (E1xx)
    // =========================================================================
    /// Unresolved endpoint name.
    ///
    /// A line refers to a node that is not visible from the line's scope.
    E100,

    /// Unresolved class reference.
    E101,

    /// Ambiguous endpoint name.
    ///
    /// Several anonymous nodes at the same depth expose the same name.
    E102,

    // =========================================================================
    // Structure (E2xx)
    // =========================================================================
    /// Cyclic class hierarchy.
    ///
    /// A class lists itself as a parent, directly or through other classes.
    E200,

    /// Recursive class instantiation.
    ///
    /// A class body instantiates the class that is being expanded.
    E201,

    /// Edge endpoint refers to a node that is not part of the tree.
    E202,

    /// A name is declared more than once in the same scope.
    E203,

    /// A class name is declared more than once in the same scope.
    E204,

    // =========================================================================
    // Composition (E3xx)
    // =========================================================================
    /// A region cannot be sized from the values it carries.
    E300,

    /// The requested anchor does not exist on the node's shape.
    E301,

    // =========================================================================
    // Attributes (E4xx / W4xx)
    // =========================================================================
    /// Invalid attribute value.
    E400,

    /// Inline attribute overrides a value provided by a class.
    W400,

    /// Attribute has no effect on this kind of declaration.
    W401,

    /// Two nodes occupy the same grid cell.
    W402,
}

impl ErrorCode {
    /// Returns the code as written in diagnostics, for example `"E100"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E100 => "E100",
            Self::E101 => "E101",
            Self::E102 => "E102",
            Self::E200 => "E200",
            Self::E201 => "E201",
            Self::E202 => "E202",
            Self::E203 => "E203",
            Self::E204 => "E204",
            Self::E300 => "E300",
            Self::E301 => "E301",
            Self::E400 => "E400",
            Self::W400 => "W400",
            Self::W401 => "W401",
            Self::W402 => "W402",
        }
    }

    /// A short description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E100 => "unresolved endpoint name",
            Self::E101 => "unresolved class reference",
            Self::E102 => "ambiguous endpoint name",
            Self::E200 => "cyclic class hierarchy",
            Self::E201 => "recursive class instantiation",
            Self::E202 => "edge endpoint outside the tree",
            Self::E203 => "duplicate name",
            Self::E204 => "duplicate class",
            Self::E300 => "region cannot be sized",
            Self::E301 => "anchor not available on shape",
            Self::E400 => "invalid attribute value",
            Self::W400 => "attribute overrides class value",
            Self::W401 => "attribute has no effect",
            Self::W402 => "grid cell already occupied",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
