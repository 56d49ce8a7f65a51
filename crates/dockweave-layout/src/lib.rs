#![forbid(unsafe_code)]

//! Dockweave Layout
//!
//! A layout engine for docking panels: resizable, collapsible, tabbed panes
//! that tile a rectangular area.
//!
//! # Key Components
//!
//! - [`DockingPanel`] - Owns the panes of one area and runs measure/arrange
//! - [`LayoutGraph`] - Arena of [`LayoutContext`]s and their physical adjacency
//! - [`PaneEdge`] - Per-side neighbor lists with lazily derived logical views
//! - [`Silo`] - Panes positioned together along one axis
//! - [`AutoPositioner`] - State machine distributing one axis among a silo
//! - [`DockSnapshot`] - Versioned save/restore shape
//! - [`DockSite`] - A root panel plus its floating panels
//!
//! # Role in dockweave
//! `dockweave-layout` is the engine. The host supplies each pane's declared
//! and measured size, per-axis stretch flags and collapse state, and gets
//! back a rectangle per visible pane. Rendering, input and window chrome
//! stay with the host.
//!
//! # Example
//!
//! ```
//! use dockweave_layout::{DockingPanel, PaneProps, Rect, Size};
//!
//! let mut panel = DockingPanel::new();
//! let a = panel.add_pane(PaneProps::new("explorer"));
//! let b = panel.add_pane(PaneProps::new("editor"));
//! let c = panel.add_pane(PaneProps::new("outline"));
//! panel.insert_to_right_of(b, a).unwrap();
//! panel.insert_to_right_of(c, b).unwrap();
//!
//! panel.arrange(Size::new(300.0, 200.0));
//! assert_eq!(panel.rect(b), Some(Rect::new(100.0, 0.0, 100.0, 200.0)));
//! ```

pub mod config;
pub mod context;
pub mod dimension;
pub mod edge;
pub mod error;
pub mod graph;
pub mod idle;
pub mod panel;
pub mod persist;
pub mod positioner;
pub mod silo;
pub mod site;
pub mod validate;
pub mod views;

mod collapse;

pub use config::DockConfig;
pub use context::{
    LayoutContext, PaneContent, PaneId, PaneProps, PaneState, PositionClasses, Rgba,
};
pub use dimension::{Dimension, DimensionState, Dimensions};
pub use dockweave_core::{Axis, Point, Rect, Side, Size};
pub use edge::{PaneEdge, RelationshipLevel};
pub use error::{ConfigError, DockError, LayoutValidationError, ValidationIssue};
pub use graph::LayoutGraph;
pub use idle::{DeferredAction, IdleQueue};
pub use panel::{DockingPanel, MeasurePane};
pub use persist::{
    CollectionRecord, ContentFactory, ContentRecord, DockSnapshot, FromRecords,
    FORMAT_MAJOR_VERSION, FORMAT_MINOR_VERSION,
};
pub use positioner::{
    AutoPositioner, HorizontalClient, PositionerClient, PositionerState, PositionerStats,
    VerticalClient,
};
pub use silo::Silo;
pub use site::{DockSite, FloatingDock};
pub use views::{FilteredView, ViewFilter};
