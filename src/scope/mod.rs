//! Bounded sample storage and geometry construction for the scope.
//!
//! The buffer is the sliding window of everything currently on screen;
//! the path module turns a window snapshot into the immutable polyline a
//! rendering surface consumes.

/// Fixed-capacity sliding-window buffer of plotted points.
pub mod buffer;
/// Viewport-space polyline construction.
pub mod path;

pub use buffer::{DataPoint, SampleBuffer};
pub use path::Geometry;
