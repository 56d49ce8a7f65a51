#![forbid(unsafe_code)]

//! Per-axis size state.
//!
//! A [`Dimension`] tracks three sources for one extent of a pane:
//!
//! - the **user value** the host declared (for example a saved width),
//! - the **internal value** the last positioning pass computed, and
//! - a **splitter** pin, set while the user drags a splitter. It freezes the
//!   internal value until the splitter context is explicitly released.
//!
//! Before each arrange the internal value is stashed and cleared so the pass
//! starts clean. A failed speculative pass can [`restore`](Dimension::restore)
//! the stash.

use bitflags::bitflags;
use dockweave_core::{Axis, Size};

bitflags! {
    /// Which parts of a [`Dimension`] currently hold a value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DimensionState: u8 {
        const USER_VALUE_SET     = 0b001;
        const INTERNAL_VALUE_SET = 0b010;
        const SPLITTER_ACTIVE    = 0b100;
    }
}

/// One axis of a pane's size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimension {
    state: DimensionState,
    internal: f64,
    user: f64,
    saved: Option<f64>,
}

impl Dimension {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dimension with a host-declared value.
    pub fn with_user_value(value: f64) -> Self {
        let mut dimension = Self::default();
        dimension.set_user_value(Some(value));
        dimension
    }

    #[inline]
    pub fn state(&self) -> DimensionState {
        self.state
    }

    #[inline]
    pub fn has_internal_value(&self) -> bool {
        self.state.contains(DimensionState::INTERNAL_VALUE_SET)
    }

    /// True when the host declared a real number.
    #[inline]
    pub fn has_user_value(&self) -> bool {
        self.state.contains(DimensionState::USER_VALUE_SET) && !self.user.is_nan()
    }

    #[inline]
    pub fn is_splitter_active(&self) -> bool {
        self.state.contains(DimensionState::SPLITTER_ACTIVE)
    }

    /// Pinned by the user, either declared or dragged.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.has_user_value() || self.is_splitter_active()
    }

    pub fn internal_value(&self) -> Option<f64> {
        self.has_internal_value().then_some(self.internal)
    }

    pub fn user_value(&self) -> Option<f64> {
        self.has_user_value().then_some(self.user)
    }

    /// The extent a measure pass should constrain the pane to, if any.
    ///
    /// A splitter pin wins over the declared value.
    pub fn measure_override(&self) -> Option<f64> {
        if self.is_splitter_active() {
            Some(self.internal)
        } else {
            self.user_value()
        }
    }

    /// Record a host-declared value. `None` or NaN clears it.
    pub fn set_user_value(&mut self, value: Option<f64>) {
        match value {
            Some(v) if !v.is_nan() => {
                self.user = v;
                self.state.insert(DimensionState::USER_VALUE_SET);
            }
            _ => {
                self.user = f64::NAN;
                self.state.remove(DimensionState::USER_VALUE_SET);
            }
        }
    }

    pub fn set_internal_value(&mut self, value: Option<f64>) {
        match value {
            Some(v) => {
                self.internal = v;
                self.state.insert(DimensionState::INTERNAL_VALUE_SET);
            }
            None => self.clear_internal_value(),
        }
    }

    /// No-op while a splitter is active.
    pub fn clear_internal_value(&mut self) {
        if !self.is_splitter_active() {
            self.state.remove(DimensionState::INTERNAL_VALUE_SET);
        }
    }

    /// Pin the internal value as the result of a splitter drag.
    pub fn set_splitter(&mut self, value: f64) {
        self.internal = value;
        self.state
            .insert(DimensionState::INTERNAL_VALUE_SET | DimensionState::SPLITTER_ACTIVE);
    }

    pub fn clear_splitter(&mut self) {
        self.state.remove(DimensionState::SPLITTER_ACTIVE);
    }

    /// Drop every user pin: the splitter and the declared value.
    pub fn release(&mut self) {
        self.clear_splitter();
        self.set_user_value(None);
    }

    /// Forget the computed value and any splitter pin.
    pub fn reset(&mut self) {
        self.clear_splitter();
        self.clear_internal_value();
    }

    /// Stash the internal value, then clear it for a fresh pass.
    pub fn pre_arrange(&mut self) {
        self.saved = self.internal_value();
        self.clear_internal_value();
    }

    /// Reinstate the value stashed by [`pre_arrange`](Self::pre_arrange).
    pub fn restore(&mut self) {
        match self.saved {
            Some(v) => {
                self.internal = v;
                self.state.insert(DimensionState::INTERNAL_VALUE_SET);
            }
            None => self.clear_internal_value(),
        }
    }
}

/// Width and height [`Dimension`]s of one pane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: Dimension,
    pub height: Dimension,
}

impl Dimensions {
    pub fn along(&self, axis: Axis) -> &Dimension {
        match axis {
            Axis::Horizontal => &self.width,
            Axis::Vertical => &self.height,
        }
    }

    pub fn along_mut(&mut self, axis: Axis) -> &mut Dimension {
        match axis {
            Axis::Horizontal => &mut self.width,
            Axis::Vertical => &mut self.height,
        }
    }

    /// Computed size when both axes hold an internal value.
    pub fn internal_size(&self) -> Option<Size> {
        Some(Size::new(
            self.width.internal_value()?,
            self.height.internal_value()?,
        ))
    }

    pub fn pre_arrange(&mut self) {
        self.width.pre_arrange();
        self.height.pre_arrange();
    }

    pub fn restore(&mut self) {
        self.width.restore();
        self.height.restore();
    }
}
