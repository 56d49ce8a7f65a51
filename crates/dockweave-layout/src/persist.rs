#![forbid(unsafe_code)]

//! Saving and restoring a panel's layout.
//!
//! A [`DockSnapshot`] captures what is needed to rebuild a panel: one
//! [`CollectionRecord`] per pane with its properties, last computed
//! rectangle and the ids of its physical neighbors on each side, plus one
//! [`ContentRecord`] per tab. Floating docks nest as child snapshots.
//!
//! Saved coordinates are advisory. When the panel is restored at a different
//! size every pane is fully re-positioned on the next arrange.
//!
//! # Versioning
//!
//! Snapshots carry a `major.minor` pair. A reader accepts any snapshot with
//! its own major version and a minor version no newer than its own. Bump the
//! minor version for additive changes and the major version otherwise.

use dockweave_core::{Point, Side, Size};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::{PaneContent, PaneId, PaneProps, PaneState, Rgba};
use crate::dimension::Dimension;
use crate::error::DockError;
use crate::panel::DockingPanel;

/// Major format version written by this build.
pub const FORMAT_MAJOR_VERSION: u32 = 1;
/// Minor format version written by this build.
pub const FORMAT_MINOR_VERSION: u32 = 1;

/// Saved state of one panel and its floating docks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockSnapshot {
    pub major_version: u32,
    pub minor_version: u32,
    /// Size the panel was last arranged at.
    pub dock_size: Size,
    /// Screen position of the panel's top-left corner.
    pub position: Point,
    pub collections: Vec<CollectionRecord>,
    #[serde(default)]
    pub floating: Vec<DockSnapshot>,
}

/// Saved state of one pane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionRecord {
    /// Id unique within the enclosing snapshot. Peer lists refer to it.
    pub id: u32,
    pub description: String,
    pub dock_position: Option<Side>,
    pub state: PaneState,
    pub tab_position: Side,
    pub collapsed_side: Option<Side>,
    pub horizontal_stretch: bool,
    pub vertical_stretch: bool,
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Extents computed by the last arrange.
    pub layout_width: Option<f64>,
    pub layout_height: Option<f64>,
    /// Extents the host declared, or the splitter position when the
    /// matching `*_splitter` flag is set.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub width_splitter: bool,
    pub height_splitter: bool,
    pub bottom_peers: Vec<u32>,
    pub left_peers: Vec<u32>,
    pub right_peers: Vec<u32>,
    pub top_peers: Vec<u32>,
    pub content: Vec<ContentRecord>,
    /// Id of the visible content record, `0` for none.
    pub current_tab: u32,
}

impl CollectionRecord {
    pub fn peers(&self, side: Side) -> &[u32] {
        match side {
            Side::Left => &self.left_peers,
            Side::Top => &self.top_peers,
            Side::Right => &self.right_peers,
            Side::Bottom => &self.bottom_peers,
        }
    }

    fn peers_mut(&mut self, side: Side) -> &mut Vec<u32> {
        match side {
            Side::Left => &mut self.left_peers,
            Side::Top => &mut self.top_peers,
            Side::Right => &mut self.right_peers,
            Side::Bottom => &mut self.bottom_peers,
        }
    }

    fn props(&self) -> PaneProps {
        PaneProps {
            description: self.description.clone(),
            horizontal_stretch: self.horizontal_stretch,
            vertical_stretch: self.vertical_stretch,
            state: self.state,
            dock_position: self.dock_position,
            collapsed_side: self.collapsed_side,
            tab_position: self.tab_position,
            contents: Vec::new(),
            current_tab: 0,
        }
    }
}

/// Saved state of one tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRecord {
    /// Id unique within the enclosing collection, starting at 1.
    pub id: u32,
    pub tab_text: String,
    pub background: Option<Rgba>,
    pub foreground: Option<Rgba>,
    pub type_name: String,
    pub description: String,
}

impl ContentRecord {
    fn capture(content: &PaneContent, id: u32) -> Self {
        Self {
            id,
            tab_text: content.tab_text.clone(),
            background: content.background,
            foreground: content.foreground,
            type_name: content.type_name.clone(),
            description: content.description.clone(),
        }
    }

    /// Content built from the record alone.
    pub fn to_content(&self) -> PaneContent {
        PaneContent {
            id: u64::from(self.id),
            tab_text: self.tab_text.clone(),
            background: self.background,
            foreground: self.foreground,
            type_name: self.type_name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Host hook that recreates tab content during restore.
///
/// Returning `None` drops the tab. Whatever the hook returns, the saved tab
/// text, description and any saved colours are applied on top.
pub trait ContentFactory {
    fn create(&mut self, record: &ContentRecord) -> Option<PaneContent>;
}

impl<F> ContentFactory for F
where
    F: FnMut(&ContentRecord) -> Option<PaneContent>,
{
    fn create(&mut self, record: &ContentRecord) -> Option<PaneContent> {
        self(record)
    }
}

/// Factory that rebuilds every tab from its record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromRecords;

impl ContentFactory for FromRecords {
    fn create(&mut self, record: &ContentRecord) -> Option<PaneContent> {
        Some(record.to_content())
    }
}

impl DockSnapshot {
    /// Capture `panel` as positioned at `position`. Floating docks are left
    /// to the caller.
    pub fn capture(panel: &DockingPanel, position: Point) -> Self {
        let record_ids: FxHashMap<PaneId, u32> = panel.ids().iter().zip(1u32..).map(|(&pane, id)| (pane, id)).collect();

        let mut collections = Vec::with_capacity(panel.len());
        for ctx in panel.panes() {
            let props = ctx.props();
            let mut record = CollectionRecord {
                id: record_ids.get(&ctx.id()).copied().unwrap_or_default(),
                description: props.description.clone(),
                dock_position: props.dock_position,
                state: props.state,
                tab_position: props.tab_position,
                collapsed_side: props.collapsed_side,
                horizontal_stretch: props.horizontal_stretch,
                vertical_stretch: props.vertical_stretch,
                ..CollectionRecord::default()
            };
            (record.width, record.width_splitter) = pinned_extent(&ctx.size().width);
            (record.height, record.height_splitter) = pinned_extent(&ctx.size().height);
            if !ctx.is_collapsed() {
                record.left = ctx.left();
                record.top = ctx.top();
                record.layout_width = ctx.size().width.internal_value();
                record.layout_height = ctx.size().height.internal_value();
            }
            for side in Side::ALL {
                let peers = record.peers_mut(side);
                peers.extend(
                    ctx.edge(side)
                        .physical()
                        .iter()
                        .filter_map(|peer| record_ids.get(peer).copied()),
                );
            }
            for (content, id) in props.contents.iter().zip(1u32..) {
                record.content.push(ContentRecord::capture(content, id));
                if props.current_tab + 1 == id as usize {
                    record.current_tab = id;
                }
            }
            collections.push(record);
        }

        debug!(collections = collections.len(), "layout captured");
        Self {
            major_version: FORMAT_MAJOR_VERSION,
            minor_version: FORMAT_MINOR_VERSION,
            dock_size: panel.arranged_size(),
            position,
            collections,
            floating: Vec::new(),
        }
    }

    /// Reject snapshots this build cannot read.
    pub fn check_version(&self) -> Result<(), DockError> {
        if self.major_version != FORMAT_MAJOR_VERSION || self.minor_version > FORMAT_MINOR_VERSION {
            return Err(DockError::IncompatibleVersion {
                found_major: self.major_version,
                found_minor: self.minor_version,
                expected_major: FORMAT_MAJOR_VERSION,
                expected_minor: FORMAT_MINOR_VERSION,
            });
        }
        Ok(())
    }

    fn check_references(&self) -> Result<(), DockError> {
        let mut seen = FxHashSet::default();
        for record in &self.collections {
            if !seen.insert(record.id) {
                return Err(DockError::DuplicateCollection { collection: record.id });
            }
        }
        let by_id: FxHashMap<u32, &CollectionRecord> = self.collections.iter().map(|r| (r.id, r)).collect();
        for record in &self.collections {
            for side in Side::ALL {
                for &peer in record.peers(side) {
                    let Some(other) = by_id.get(&peer) else {
                        return Err(DockError::UnknownPeer {
                            collection: record.id,
                            peer,
                            side,
                        });
                    };
                    if peer == record.id || !other.peers(side.opposite()).contains(&record.id) {
                        return Err(DockError::InconsistentPeer {
                            collection: record.id,
                            peer,
                            side,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Rebuild the saved panes into an empty `panel`.
    ///
    /// Nothing is added unless the whole snapshot checks out. Floating docks
    /// are not restored here; see [`DockSite`](crate::site::DockSite).
    /// Saved splitter positions are pinned again. If the first arrange
    /// after the restore gets an area other than `dock_size`, every pane
    /// is re-positioned and those pins are dropped.
    /// Returns the new pane for each record id.
    pub fn restore_into<F: ContentFactory + ?Sized>(
        &self,
        panel: &mut DockingPanel,
        factory: &mut F,
    ) -> Result<FxHashMap<u32, PaneId>, DockError> {
        self.check_version()?;
        if !panel.is_empty() {
            return Err(DockError::PanelNotEmpty { panes: panel.len() });
        }
        self.check_references()?;

        let mut panes = FxHashMap::default();
        for record in &self.collections {
            let mut props = record.props();
            for content_record in &record.content {
                let Some(mut content) = factory.create(content_record) else {
                    warn!(collection = record.id, content = content_record.id, type_name = %content_record.type_name, "content dropped on restore");
                    continue;
                };
                content.tab_text = content_record.tab_text.clone();
                content.description = content_record.description.clone();
                if content_record.background.is_some() {
                    content.background = content_record.background;
                }
                if content_record.foreground.is_some() {
                    content.foreground = content_record.foreground;
                }
                if content_record.id == record.current_tab {
                    props.current_tab = props.contents.len();
                }
                props.contents.push(content);
            }

            let id = panel.graph_mut().add(props);
            let ctx = panel.graph_mut().ctx_mut(id);
            if !ctx.is_collapsed() {
                ctx.left = record.left;
                ctx.top = record.top;
                ctx.size.width.set_internal_value(record.layout_width);
                ctx.size.height.set_internal_value(record.layout_height);
            }
            restore_pin(&mut ctx.size.width, record.width, record.width_splitter);
            restore_pin(&mut ctx.size.height, record.height, record.height_splitter);
            panes.insert(record.id, id);
        }

        let graph = panel.graph_mut();
        for record in &self.collections {
            let Some(&id) = panes.get(&record.id) else {
                continue;
            };
            for side in Side::ALL {
                for peer in record.peers(side) {
                    if let Some(&peer) = panes.get(peer) {
                        graph.link(id, side, peer);
                    }
                }
            }
        }
        graph.invalidate_physical();
        panel.expect_restored_size(self.dock_size);
        debug!(collections = panes.len(), "layout restored");
        Ok(panes)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// The pinned value of one extent: a splitter position wins over a
/// declared value.
fn pinned_extent(dimension: &Dimension) -> (Option<f64>, bool) {
    if dimension.is_splitter_active() {
        (dimension.internal_value(), true)
    } else {
        (dimension.user_value(), false)
    }
}

fn restore_pin(dimension: &mut Dimension, value: Option<f64>, splitter: bool) {
    match value {
        Some(v) if splitter => dimension.set_splitter(v),
        value => dimension.set_user_value(value),
    }
}
