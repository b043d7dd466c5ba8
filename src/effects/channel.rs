use crate::foundation::error::{DispError, DispResult};

/// Colour component of an opaque BGR pixel that drives one displacement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Blue = 0,
    Green = 1,
    Red = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Blue, Channel::Green, Channel::Red];

    /// Byte index of this component within a BGR(A) pixel.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pick this component out of a BGR pixel.
    #[inline]
    pub fn component(self, px: [u8; 3]) -> u8 {
        px[self.index()]
    }
}

impl TryFrom<i32> for Channel {
    type Error = DispError;

    fn try_from(value: i32) -> DispResult<Self> {
        match value {
            0 => Ok(Self::Blue),
            1 => Ok(Self::Green),
            2 => Ok(Self::Red),
            other => Err(DispError::parameter(format!(
                "{other} is not a valid component (expected 0=blue, 1=green, 2=red)"
            ))),
        }
    }
}

/// Numeric component lookup. An index outside 0..=2 is logged and yields 0.
pub fn component_at(px: [u8; 3], index: i32) -> u8 {
    match Channel::try_from(index) {
        Ok(channel) => channel.component(px),
        Err(err) => {
            tracing::error!(index, "component_at: {err}");
            0
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/channel.rs"]
mod tests;
