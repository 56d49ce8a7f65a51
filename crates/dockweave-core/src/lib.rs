#![forbid(unsafe_code)]

//! Core: geometry shared by the docking layout engine.
//!
//! # Role in dockweave
//! `dockweave-core` is the vocabulary layer. It defines the floating point
//! [`Rect`](geometry::Rect), [`Size`](geometry::Size) and
//! [`Point`](geometry::Point) types the layout engine produces, plus the
//! [`Side`](geometry::Side) enum and its rotation tables that every
//! adjacency walk in `dockweave-layout` leans on.

pub mod geometry;

pub use geometry::{Axis, Point, Rect, Side, Size};
