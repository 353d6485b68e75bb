use crate::CHANNEL_COUNT;

/// Channel list for MCP3208.
///
/// Discriminants are the chip's 0-based selector. The public index used by
/// [`Channel::from_index`] and [`Channel::index`] is 1-based, so index 1 is `CH0`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    CH0 = 0,
    CH1 = 1,
    CH2 = 2,
    CH3 = 3,
    CH4 = 4,
    CH5 = 5,
    CH6 = 6,
    CH7 = 7,
}

impl Channel {
    const ALL: [Self; CHANNEL_COUNT as usize] = [
        Self::CH0,
        Self::CH1,
        Self::CH2,
        Self::CH3,
        Self::CH4,
        Self::CH5,
        Self::CH6,
        Self::CH7,
    ];

    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Looks up a channel by its 1-based index. Returns `None` outside `1..=8`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=CHANNEL_COUNT => Some(Self::ALL[usize::from(index - 1)]),
            _ => None,
        }
    }

    /// 1-based index of this channel.
    pub fn index(self) -> u8 {
        self as u8 + 1
    }

    /// 3-bit selector sent to the chip.
    pub fn selector(self) -> u8 {
        self as u8
    }
}
