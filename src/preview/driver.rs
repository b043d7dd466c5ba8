use std::time::Duration;

use crate::{
    effects::{
        composite::overlay,
        displace::{DisplaceParams, displace},
    },
    foundation::{
        core::{Image, ImageView, Point, Rect},
        error::{DispError, DispResult},
    },
    preview::sink::{FrameSink, Key, KeySource},
};

/// Settings for the sliding-window preview.
///
/// Defaults reproduce the classic demo: red channel on both axes, strength 20,
/// a 3 pixel step per frame, ~30 fps pacing and ESC to quit.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub displace: DisplaceParams,
    /// Horizontal advance of the crop window per frame, in pixels.
    pub step: u32,
    pub frame_interval_ms: u64,
    pub quit_key: Key,
    /// Placement of the remapped target over the cropped map.
    pub location: Point,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            displace: DisplaceParams::default(),
            step: 3,
            frame_interval_ms: 33,
            quit_key: Key::ESCAPE,
            location: Point::ORIGIN,
        }
    }
}

impl PreviewConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Parse a JSON preset; absent fields keep their defaults.
    pub fn from_json(json: &str) -> DispResult<Self> {
        serde_json::from_str(json).map_err(|e| DispError::serde(format!("preview preset: {e}")))
    }
}

/// Why [`Preview::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// The crop window reached the right edge of the map.
    Finished,
    /// The key source reported the quit key.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewReport {
    pub outcome: PreviewOutcome,
    pub frames_shown: u64,
    /// Crop offset of the last frame shown.
    pub last_offset: u32,
}

/// Animated preview: slides a target-sized window across the map, remaps the
/// target through each window and composites the result over it.
#[derive(Clone, Debug)]
pub struct Preview<'a> {
    map: ImageView<'a>,
    target: ImageView<'a>,
    config: PreviewConfig,
}

impl<'a> Preview<'a> {
    /// Validate inputs once up front.
    ///
    /// The map must be BGR, the target BGRA, and the target no larger than the map on
    /// either axis.
    pub fn new(
        map: ImageView<'a>,
        target: ImageView<'a>,
        config: PreviewConfig,
    ) -> DispResult<Self> {
        if !target.format().has_alpha() {
            return Err(DispError::format(
                "target must carry a transparency channel (BGRA)",
            ));
        }
        if map.format().has_alpha() {
            return Err(DispError::format("map must be opaque BGR"));
        }
        if target.width() > map.width() || target.height() > map.height() {
            return Err(DispError::format(format!(
                "target ({}x{}) must not be larger than map ({}x{})",
                target.width(),
                target.height(),
                map.width(),
                map.height()
            )));
        }
        if config.step == 0 {
            return Err(DispError::parameter("preview step must be > 0"));
        }

        Ok(Self {
            map,
            target,
            config,
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Crop offsets visited by [`Preview::run`], in order.
    ///
    /// The first frame is always at offset 0; the window then advances by `step`
    /// while it stays strictly left of `map.width - target.width`.
    pub fn frame_offsets(&self) -> impl Iterator<Item = u32> + use<> {
        let span = self.map.width() - self.target.width();
        let step = self.config.step;
        std::iter::successors(Some(0u32), move |&offset| {
            offset.checked_add(step).filter(|&next| next < span)
        })
    }

    /// Produce the composited frame for a crop window starting at `offset_x`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render_frame(&self, offset_x: u32) -> DispResult<Image> {
        let window = self.map.crop(Rect::new(
            offset_x,
            0,
            self.target.width(),
            self.target.height(),
        ))?;
        let remapped = displace(window, self.target, self.config.displace)?;
        overlay(window, remapped.view(), self.config.location)
    }

    /// Run the preview loop until the window reaches the end of the map or the
    /// quit key is pressed.
    pub fn run<S, K>(&self, sink: &mut S, keys: &mut K) -> DispResult<PreviewReport>
    where
        S: FrameSink + ?Sized,
        K: KeySource + ?Sized,
    {
        let interval = self.config.frame_interval();
        let mut report = PreviewReport {
            outcome: PreviewOutcome::Finished,
            frames_shown: 0,
            last_offset: 0,
        };

        for offset in self.frame_offsets() {
            let frame = self.render_frame(offset)?;
            sink.show(report.frames_shown, &frame)?;
            report.frames_shown += 1;
            report.last_offset = offset;

            if keys.wait_key(interval) == Some(self.config.quit_key) {
                tracing::info!(frames = report.frames_shown, "preview: quit requested");
                report.outcome = PreviewOutcome::Quit;
                return Ok(report);
            }
        }

        tracing::info!(frames = report.frames_shown, "preview: reached end of map");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/driver.rs"]
mod tests;
