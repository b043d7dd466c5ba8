use std::time::Duration;

use crate::foundation::{core::Image, error::DispResult};

/// Key code reported by a [`KeySource`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Key(pub i32);

impl Key {
    pub const ESCAPE: Key = Key(27);
}

/// Display side of the preview loop.
///
/// `show` is called once per frame, in order, with `index` counting from zero.
pub trait FrameSink {
    fn show(&mut self, index: u64, frame: &Image) -> DispResult<()>;
}

/// Input side of the preview loop.
///
/// `wait_key` blocks for at most `timeout` and doubles as frame pacing.
pub trait KeySource {
    fn wait_key(&mut self, timeout: Duration) -> Option<Key>;
}

impl<F> KeySource for F
where
    F: FnMut(Duration) -> Option<Key>,
{
    fn wait_key(&mut self, timeout: Duration) -> Option<Key> {
        self(timeout)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<Image>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in display order.
    pub fn frames(&self) -> &[Image] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn show(&mut self, _index: u64, frame: &Image) -> DispResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Headless sink: logs a one-line summary of every frame.
#[derive(Debug, Default)]
pub struct LogSink {
    shown: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }
}

impl FrameSink for LogSink {
    fn show(&mut self, index: u64, frame: &Image) -> DispResult<()> {
        self.shown += 1;
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return Ok(());
        }

        let (width, height) = frame.dimensions();
        let mean = if frame.data().is_empty() {
            0
        } else {
            frame.data().iter().map(|&v| u64::from(v)).sum::<u64>() / frame.data().len() as u64
        };
        tracing::debug!(index, width, height, mean, "frame");
        Ok(())
    }
}

/// Headless key source: sleeps for the full timeout and never sees a key press,
/// except that it reports `quit_key` on the `quit_after`-th poll when set.
#[derive(Debug, Clone)]
pub struct PacedKeys {
    quit_after: Option<u64>,
    quit_key: Key,
    polls: u64,
    sleep: bool,
}

impl PacedKeys {
    pub fn new(quit_after: Option<u64>, quit_key: Key) -> Self {
        Self {
            quit_after,
            quit_key,
            polls: 0,
            sleep: true,
        }
    }

    /// Skip the pacing sleep.
    pub fn without_sleep(mut self) -> Self {
        self.sleep = false;
        self
    }
}

impl KeySource for PacedKeys {
    fn wait_key(&mut self, timeout: Duration) -> Option<Key> {
        self.polls += 1;
        if self.quit_after.is_some_and(|n| self.polls >= n) {
            return Some(self.quit_key);
        }
        if self.sleep && !timeout.is_zero() {
            std::thread::sleep(timeout);
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/sink.rs"]
mod tests;
