//! `IDirectSoundFullDuplex` composition (§1: "just pairs a playback and
//! capture object"): a thin pairing of a [`Device`] and a [`CaptureDevice`],
//! forwarding construction to both. No behavior of its own beyond that.

use std::sync::Arc;

use crate::{
    capture::CaptureDevice,
    common::WaveFormat,
    device::Device,
    share::DeviceId,
    Result,
};

/// `IDirectSoundFullDuplex`: owns one playback [`Device`] and one
/// [`CaptureDevice`], initialized together.
pub struct FullDuplex {
    playback: Device,
    capture: Arc<CaptureDevice>,
}

impl FullDuplex {
    /// `DirectSoundFullDuplexCreate`-style joint initialization: resolve and
    /// open both halves. Either side failing fails the whole call — there is
    /// no such thing as a half-open duplex object.
    pub fn initialize(
        playback_id: DeviceId,
        playback_name: Option<&str>,
        capture_name: Option<&str>,
        capture_format: WaveFormat,
        capture_ring_frames: u32,
    ) -> Result<FullDuplex> {
        let playback = Device::initialize(playback_id, playback_name)?;
        let capture = CaptureDevice::initialize(capture_name, capture_format, capture_ring_frames)?;
        Ok(FullDuplex { playback, capture })
    }

    pub fn playback(&self) -> &Device {
        &self.playback
    }

    pub fn capture(&self) -> &Arc<CaptureDevice> {
        &self.capture
    }
}
