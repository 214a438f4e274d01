use serde::{Deserialize, Serialize};

/// What changed since the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawTopic {
    /// Visible index/price range or scale mode.
    Viewport,
    /// Candle series contents.
    Series,
    /// Live price indicator.
    LastPrice,
}

impl RedrawTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Viewport => 1 << 0,
            Self::Series => 1 << 1,
            Self::LastPrice => 1 << 2,
        }
    }
}

/// Bitmask of redraw topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedrawTopics {
    bits: u8,
}

impl RedrawTopics {
    const ALL_BITS: u8 =
        RedrawTopic::Viewport.bit() | RedrawTopic::Series.bit() | RedrawTopic::LastPrice.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: RedrawTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: RedrawTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains(self, topic: RedrawTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalescing redraw request queue.
///
/// Any number of requests between two frames collapse into one pending
/// entry; the host's frame callback drains it with [`RedrawQueue::take`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawQueue {
    pending: RedrawTopics,
    coalesced: u64,
}

impl RedrawQueue {
    pub fn request(&mut self, topic: RedrawTopic) {
        if !self.pending.is_none() {
            self.coalesced += 1;
        }
        self.pending = self.pending.with_topic(topic);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_none()
    }

    #[must_use]
    pub fn pending(&self) -> RedrawTopics {
        self.pending
    }

    /// Requests folded into an already-pending redraw since the queue was created.
    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    pub fn take(&mut self) -> Option<RedrawTopics> {
        if self.pending.is_none() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}
