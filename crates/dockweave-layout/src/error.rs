//! Error types returned at the engine's API boundary.
//!
//! Broken graph invariants are not represented here. Those are bugs and
//! panic at the point of discovery.

use std::fmt;

use dockweave_core::Side;

use crate::context::PaneId;

/// Recoverable failures of panel, view and persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// The handle does not name a live pane in this panel.
    UnknownPane { pane: PaneId },
    /// The pane has no physical neighbors to operate against.
    PaneNotLinked { pane: PaneId },
    /// A derived view cannot be mutated directly.
    Unsupported { operation: &'static str },
    /// A persisted layout was written by an incompatible format version.
    IncompatibleVersion {
        found_major: u32,
        found_minor: u32,
        expected_major: u32,
        expected_minor: u32,
    },
    /// A persisted peer list references a collection id that was not saved.
    UnknownPeer { collection: u32, peer: u32, side: Side },
    /// A persisted peer list names the collection itself, or a peer that
    /// does not list the collection back on the facing side.
    InconsistentPeer { collection: u32, peer: u32, side: Side },
    /// Two persisted collections share an id.
    DuplicateCollection { collection: u32 },
    /// Restore requires an empty panel.
    PanelNotEmpty { panes: usize },
    /// A pane cannot be placed relative to itself.
    SelfReference { pane: PaneId },
    /// No floating dock at this index.
    UnknownFloatingDock { index: usize },
}

impl fmt::Display for DockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPane { pane } => write!(f, "unknown pane {pane}"),
            Self::PaneNotLinked { pane } => {
                write!(f, "pane {pane} is not linked into the layout graph")
            }
            Self::Unsupported { operation } => {
                write!(f, "operation '{operation}' is not supported on a derived view")
            }
            Self::IncompatibleVersion {
                found_major,
                found_minor,
                expected_major,
                expected_minor,
            } => write!(
                f,
                "layout version {found_major}.{found_minor} is incompatible with {expected_major}.{expected_minor}"
            ),
            Self::UnknownPeer {
                collection,
                peer,
                side,
            } => write!(
                f,
                "collection {collection} references unknown {side} peer {peer}"
            ),
            Self::InconsistentPeer {
                collection,
                peer,
                side,
            } => write!(
                f,
                "collection {collection} lists {peer} as {side} peer without a matching back link"
            ),
            Self::DuplicateCollection { collection } => {
                write!(f, "collection id {collection} appears more than once")
            }
            Self::PanelNotEmpty { panes } => {
                write!(f, "cannot restore into a panel that already holds {panes} panes")
            }
            Self::SelfReference { pane } => {
                write!(f, "pane {pane} cannot be placed relative to itself")
            }
            Self::UnknownFloatingDock { index } => write!(f, "no floating dock at index {index}"),
        }
    }
}

impl std::error::Error for DockError {}

/// Failure to load a [`DockConfig`](crate::config::DockConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The document parsed but holds unusable values.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

/// A bounds check that failed after an arrange pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutValidationError {
    pub pane: PaneId,
    pub issue: ValidationIssue,
}

/// What the post-arrange check found wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// A visible pane was left without coordinates or size.
    Unpositioned,
    /// The rectangle reaches outside the arranged area.
    OutOfBounds { edge: Side, coordinate: f64, limit: f64 },
    /// The pane does not touch a logical neighbor on `side`.
    Gap {
        side: Side,
        neighbor: PaneId,
        distance: f64,
    },
}

impl fmt::Display for LayoutValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            ValidationIssue::Unpositioned => write!(f, "pane {} was not positioned", self.pane),
            ValidationIssue::OutOfBounds {
                edge,
                coordinate,
                limit,
            } => write!(
                f,
                "pane {} {edge} edge at {coordinate} exceeds bound {limit}",
                self.pane
            ),
            ValidationIssue::Gap {
                side,
                neighbor,
                distance,
            } => write!(
                f,
                "pane {} leaves a {distance} gap to {side} neighbor {neighbor}",
                self.pane
            ),
        }
    }
}

impl std::error::Error for LayoutValidationError {}
