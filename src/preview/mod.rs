//! Sliding-window preview loop and its display/input seams.

/// Frame renderer and control loop.
pub mod driver;
/// Display sink and key source traits with headless implementations.
pub mod sink;
