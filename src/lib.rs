//! dispmap is a per-pixel displacement map filter.
//!
//! A BGR "map" image drives the resampling of a smaller BGRA "target": each target
//! pixel is pulled from an offset derived from one colour channel of the map. The
//! remapped target is then alpha-composited back over the map, and sliding the crop
//! window across the map animates the effect.
//!
//! # Pipeline overview
//!
//! 1. **Crop**: take a target-sized [`ImageView`] window of the map (no copy)
//! 2. **Displace**: [`displace`] the target through the window's channel values
//! 3. **Composite**: [`overlay`] the remapped BGRA image onto the window
//! 4. **Show**: hand the BGR frame to a [`FrameSink`], then poll a [`KeySource`]
//!
//! Steps 1-4 are driven by [`Preview`]. All transforms are synchronous and allocate
//! their output; inputs are never mutated.
#![forbid(unsafe_code)]

mod assets;
mod effects;
mod foundation;

/// Sliding-window preview loop.
pub mod preview;

pub use assets::decode::{decode_image, load_image, load_image_unchanged};
pub use effects::channel::{Channel, component_at};
pub use effects::composite::{blend_px, overlay};
pub use effects::displace::{DisplaceParams, displace, displace_indexed, displace_into};
pub use foundation::core::{Image, ImageView, PixelFormat, Point, Rect};
pub use foundation::error::{DispError, DispResult};
pub use preview::driver::{Preview, PreviewConfig, PreviewOutcome, PreviewReport};
pub use preview::sink::{FrameSink, InMemorySink, Key, KeySource, LogSink, PacedKeys};
