//! # Seatkit Core
//!
//! Shared kernel for the seatkit seating chart editor: immutable 2D
//! geometry value types, the identity allocator that hands out stable
//! object ids and uuids, error types and editor-wide constants.
//!
//! Everything in this crate is pure: no rendering, no I/O, no ambient
//! state. The designer crate builds the scene model and interaction
//! machinery on top of these types.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod identity;

pub use error::{ChartError, Result};
pub use geometry::{
    point_segment_distance, snap_angle, Bbox, CurvePath, Point, Ray, Vector,
};
pub use identity::IdentityAllocator;
