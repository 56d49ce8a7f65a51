#![forbid(unsafe_code)]

//! Per-pane layout state.
//!
//! A [`LayoutContext`] is attached to every pane the panel manages. It holds
//! the pane's host-supplied properties, its four [`PaneEdge`]s and the
//! coordinates the positioning pass assigns.

use std::fmt;

use bitflags::bitflags;
use dockweave_core::{Axis, Rect, Side, Size};
use serde::{Deserialize, Serialize};

use crate::dimension::Dimensions;
use crate::edge::PaneEdge;

/// Stable handle of a pane inside one [`LayoutGraph`](crate::graph::LayoutGraph).
///
/// Handles are never reused within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(u32);

impl PaneId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

bitflags! {
    /// What an invalidation should reset.
    ///
    /// Every class except [`EVERY_COLLECTION`](Self::EVERY_COLLECTION)
    /// implies [`INTERNAL`](Self::INTERNAL), which marks the pane for a
    /// fresh measure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PositionClasses: u8 {
        const INTERNAL         = 0b00_0001;
        const HORIZONTAL       = 0b00_0011;
        const VERTICAL         = 0b00_0101;
        const COLLAPSE         = 0b00_1001;
        const RESIZE           = 0b01_0001;
        const EVERY_COLLECTION = 0b10_0000;
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl PositionClasses {
    /// The resize class for a change along `side`.
    pub const fn for_side(side: Side) -> Self {
        match side.axis() {
            Axis::Horizontal => Self::HORIZONTAL.union(Self::RESIZE),
            Axis::Vertical => Self::VERTICAL.union(Self::RESIZE),
        }
    }
}

/// Lifecycle state of a pane, as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaneState {
    #[default]
    Constructed,
    Loaded,
    Pinned,
    PinnedAndEmpty,
    UnPinnedAndCollapsed,
    UnPinnedAndEmpty,
    UnPinnedAndVisible,
}

impl PaneState {
    /// Collapsed panes take no space; their area goes to logical replacements.
    pub const fn is_collapsed(self) -> bool {
        matches!(
            self,
            PaneState::UnPinnedAndCollapsed | PaneState::PinnedAndEmpty | PaneState::UnPinnedAndEmpty
        )
    }
}

/// An 8-bit RGBA colour carried by tab content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// One tab of a pane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneContent {
    pub id: u64,
    pub tab_text: String,
    pub background: Option<Rgba>,
    pub foreground: Option<Rgba>,
    /// Host type tag used to recreate the content on restore.
    pub type_name: String,
    pub description: String,
}

/// Host-owned properties of a pane.
///
/// Declared sizes are not stored here; they live in the pane's
/// [`Dimensions`] as user values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneProps {
    pub description: String,
    pub horizontal_stretch: bool,
    pub vertical_stretch: bool,
    pub state: PaneState,
    /// Side of the panel the pane was docked to, if any.
    pub dock_position: Option<Side>,
    /// Side the tab strip moves to when collapsed. Derived from the dock
    /// position when unset.
    pub collapsed_side: Option<Side>,
    pub tab_position: Side,
    pub contents: Vec<PaneContent>,
    pub current_tab: usize,
}

impl Default for PaneProps {
    fn default() -> Self {
        Self {
            description: String::new(),
            horizontal_stretch: true,
            vertical_stretch: true,
            state: PaneState::Constructed,
            dock_position: None,
            collapsed_side: None,
            tab_position: Side::Bottom,
            contents: Vec::new(),
            current_tab: 0,
        }
    }
}

impl PaneProps {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the stretch flag on both axes.
    #[must_use]
    pub fn stretch(mut self, horizontal: bool, vertical: bool) -> Self {
        self.horizontal_stretch = horizontal;
        self.vertical_stretch = vertical;
        self
    }

    #[must_use]
    pub fn docked(mut self, side: Side) -> Self {
        self.dock_position = Some(side);
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: PaneState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: PaneContent) -> Self {
        self.contents.push(content);
        self
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.state.is_collapsed()
    }

    pub fn stretches(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal_stretch,
            Axis::Vertical => self.vertical_stretch,
        }
    }

    /// Side the collapsed tab strip is shown on. Panes docked at the top
    /// collapse to the bottom.
    pub fn collapse_side(&self) -> Side {
        self.collapsed_side.unwrap_or(match self.dock_position {
            Some(Side::Top) | None => Side::Bottom,
            Some(side) => side,
        })
    }
}

/// Layout state attached to one pane.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    id: PaneId,
    pub(crate) props: PaneProps,
    pub(crate) left: Option<f64>,
    pub(crate) top: Option<f64>,
    saved_left: Option<f64>,
    saved_top: Option<f64>,
    pub(crate) size: Dimensions,
    pub(crate) desired: Size,
    pub(crate) edges: [PaneEdge; 4],
    pub(crate) cycle: u64,
    pub(crate) measure_dirty: bool,
    pub(crate) arranged: Option<Rect>,
}

impl LayoutContext {
    pub(crate) fn new(id: PaneId, props: PaneProps) -> Self {
        Self {
            id,
            props,
            left: None,
            top: None,
            saved_left: None,
            saved_top: None,
            size: Dimensions::default(),
            desired: Size::ZERO,
            edges: Side::ALL.map(PaneEdge::new),
            cycle: 0,
            measure_dirty: true,
            arranged: None,
        }
    }

    #[inline]
    pub fn id(&self) -> PaneId {
        self.id
    }

    #[inline]
    pub fn props(&self) -> &PaneProps {
        &self.props
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.props.is_collapsed()
    }

    #[inline]
    pub fn size(&self) -> &Dimensions {
        &self.size
    }

    /// Size reported by the last measure pass.
    #[inline]
    pub fn desired_size(&self) -> Size {
        self.desired
    }

    /// Rectangle assigned by the last arrange, `None` while collapsed.
    #[inline]
    pub fn arranged_rect(&self) -> Option<Rect> {
        self.arranged
    }

    #[inline]
    pub fn needs_measure(&self) -> bool {
        self.measure_dirty
    }

    #[inline]
    pub fn edge(&self, side: Side) -> &PaneEdge {
        &self.edges[side.index()]
    }

    #[inline]
    pub(crate) fn edge_mut(&mut self, side: Side) -> &mut PaneEdge {
        &mut self.edges[side.index()]
    }

    pub fn left(&self) -> Option<f64> {
        self.left
    }

    pub fn top(&self) -> Option<f64> {
        self.top
    }

    pub fn right(&self) -> Option<f64> {
        Some(self.left? + self.size.width.internal_value()?)
    }

    pub fn bottom(&self) -> Option<f64> {
        Some(self.top? + self.size.height.internal_value()?)
    }

    /// Coordinate of `side`, if positioned.
    pub fn coordinate(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left(),
            Side::Top => self.top(),
            Side::Right => self.right(),
            Side::Bottom => self.bottom(),
        }
    }

    /// Leading coordinate along `axis`.
    pub fn origin(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        Some(Rect::new(
            self.left?,
            self.top?,
            self.size.width.internal_value()?,
            self.size.height.internal_value()?,
        ))
    }

    /// Positioned on both axes with at least `minimum` extent.
    pub fn is_fully_positioned(&self, minimum: Size) -> bool {
        match self.bounds() {
            Some(r) => r.width >= minimum.width && r.height >= minimum.height,
            None => false,
        }
    }

    /// Assign origin and extent along one axis.
    pub(crate) fn set_position(&mut self, axis: Axis, coordinate: f64, extent: f64) {
        match axis {
            Axis::Horizontal => self.left = Some(coordinate),
            Axis::Vertical => self.top = Some(coordinate),
        }
        self.size.along_mut(axis).set_internal_value(Some(extent));
    }

    /// Forget coordinates and computed extents. Splitter pins survive.
    pub(crate) fn reset_position(&mut self) {
        self.left = None;
        self.top = None;
        self.size.width.clear_internal_value();
        self.size.height.clear_internal_value();
    }

    /// Stash the current position and start from a clean slate.
    pub(crate) fn pre_arrange(&mut self) {
        self.saved_left = self.left.take();
        self.saved_top = self.top.take();
        self.size.pre_arrange();
    }

    /// Reinstate the position stashed by [`pre_arrange`](Self::pre_arrange).
    pub(crate) fn restore(&mut self) {
        self.left = self.saved_left;
        self.top = self.saved_top;
        self.size.restore();
    }
}
