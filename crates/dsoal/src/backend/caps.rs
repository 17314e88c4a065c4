//! Per-device extension probing (§3 "capability bitset").

use std::ops::{BitOr, BitOrAssign};

/// The fixed enum of backend extensions a [`crate::share::DeviceShare`]
/// probes for at construction and never re-probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extensions(u16);

impl Extensions {
    pub const FLOAT32: Extensions = Extensions(1 << 0);
    pub const MULTI_CHANNEL: Extensions = Extensions(1 << 1);
    pub const DEFERRED_UPDATES: Extensions = Extensions(1 << 2);
    pub const BUFFER_SUB_DATA: Extensions = Extensions(1 << 3);
    pub const BUFFER_SAMPLES: Extensions = Extensions(1 << 4);
    pub const STATIC_BUFFER: Extensions = Extensions(1 << 5);
    pub const EFX: Extensions = Extensions(1 << 6);
    pub const THREAD_LOCAL_CONTEXT: Extensions = Extensions(1 << 7);
    pub const MAP_BUFFER: Extensions = Extensions(1 << 8);
    pub const SOURCE_SPATIALIZE: Extensions = Extensions(1 << 9);
    pub const BYTE_RW_OFFSETS: Extensions = Extensions(1 << 10);

    pub const fn empty() -> Self {
        Extensions(0)
    }

    pub const fn contains(self, other: Extensions) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) const fn insert(&mut self, other: Extensions) {
        self.0 |= other.0;
    }
}

impl BitOr for Extensions {
    type Output = Extensions;
    fn bitor(self, rhs: Extensions) -> Extensions {
        Extensions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Extensions {
    fn bitor_assign(&mut self, rhs: Extensions) {
        self.0 |= rhs.0;
    }
}

/// The chosen data-upload path for a [`crate::sampledata::SampleData`],
/// derived once from [`Extensions`] at construction (§9 "Extensions as
/// capabilities" design note) rather than re-checked on every `Unlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    /// The backend owns the buffer storage outright
    /// (`AL_EXT_STATIC_BUFFER`); `Unlock` is a no-op.
    Static,
    /// `AL_SOFT_buffer_sub_data`: partial re-upload of only the locked span.
    SubData,
    /// `AL_SOFT_buffer_samples`/`AL_SOFT_buffer_sub_data` sample-addressed
    /// variant.
    SubSamples,
    /// No partial-update extension: `Unlock` re-uploads the whole buffer via
    /// `alBufferData`.
    FullReupload,
    /// No sub-data-capable extension at all: payload is split into queued
    /// segments refilled by the worker thread.
    Streaming,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_precise() {
        let caps = Extensions::FLOAT32 | Extensions::EFX;
        assert!(caps.contains(Extensions::FLOAT32));
        assert!(caps.contains(Extensions::EFX));
        assert!(!caps.contains(Extensions::MULTI_CHANNEL));
        assert!(caps.contains(Extensions::FLOAT32 | Extensions::EFX));
        assert!(!caps.contains(Extensions::FLOAT32 | Extensions::MULTI_CHANNEL));
    }

    #[test]
    fn empty_contains_nothing_but_itself() {
        assert!(Extensions::empty().contains(Extensions::empty()));
        assert!(!Extensions::empty().contains(Extensions::EFX));
    }
}
