//! Device object (C8): the top-level `IDirectSound(8)` handle (§4.8).
//!
//! `Device` wraps one device-share reference and lazily attaches the
//! share's [`Primary`] singleton the first time it's needed (by
//! `SetCooperativeLevel`, `CreateSoundBuffer` of the primary, or
//! `GetSpeakerConfig`). COM interface identity, reference counting, and
//! GUID-to-device-name resolution are a platform shim's job — by the time
//! [`Device::initialize`] is called, the device id has already been
//! resolved to a [`DeviceId`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    buffer::{Caps, Secondary},
    common::WaveFormat,
    primary::{CooperativeLevel, Primary},
    sampledata::{CreateFlags, SampleData},
    share::{self, DeviceId, DeviceShare},
    Error, Result,
};

/// The validated subset of `DSBUFFERDESC` that `CreateSoundBuffer` needs for
/// a secondary buffer (the primary has no such descriptor — see
/// [`Device::create_primary_buffer`]).
#[derive(Debug, Clone, Copy)]
pub struct SoundBufferDesc {
    pub caps: Caps,
    pub buffer_bytes: u32,
    pub format: WaveFormat,
    pub extensible: Option<(u16, u32)>,
    /// Whether the caller's descriptor carried a non-null `guid3DAlgorithm`.
    pub has_3d_algorithm: bool,
}

/// `GetCaps`' fixed capability bits plus free-voice counts derived from the
/// share's source pool (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    pub total_voices: u32,
    pub free_voices: u32,
    pub primary_channels: u32,
}

pub struct Device {
    share: DeviceShare,
    primary: Mutex<Option<Arc<Primary>>>,
}

impl Device {
    /// `Initialize(guid)`: acquire (or join) the C2 share for the already-
    /// resolved device id.
    pub fn initialize(id: DeviceId, device_name: Option<&str>) -> Result<Device> {
        crate::init_logging();
        let share = share::acquire(id, device_name)?;
        Ok(Device { share, primary: Mutex::new(None) })
    }

    pub(crate) fn share(&self) -> &DeviceShare {
        &self.share
    }

    /// Attach (constructing on first use) and return the share's primary
    /// singleton, bumping the share's live-primary-reference count so a
    /// secondary device handle closing cannot tear the share down out from
    /// under it (§3 "a list of live primary references").
    pub fn create_primary_buffer(&self) -> Result<Arc<Primary>> {
        let mut slot = self.primary.lock();
        if let Some(primary) = &*slot {
            return Ok(Arc::clone(primary));
        }
        let primary = Arc::new(Primary::new(&self.share)?);
        self.share.acquire_primary();
        self.share.register_primary(&primary);
        *slot = Some(Arc::clone(&primary));
        Ok(primary)
    }

    fn attached_primary(&self) -> Option<Arc<Primary>> {
        self.primary.lock().clone()
    }

    pub fn cooperative_level(&self) -> CooperativeLevel {
        self.attached_primary().map_or(CooperativeLevel::Normal, |p| p.cooperative_level())
    }

    /// `SetCooperativeLevel(level)`: attaches the primary on first call, so
    /// a level change before any `CreateSoundBuffer(DSBCAPS_PRIMARYBUFFER)`
    /// still takes effect.
    pub fn set_cooperative_level(&self, level: CooperativeLevel) -> Result {
        self.create_primary_buffer()?.set_cooperative_level(level)
    }

    /// `CreateSoundBuffer`'s secondary path: reject the invalid
    /// `CTRL3D|CTRLPAN` combination and a non-null `guid3DAlgorithm` on a
    /// non-3D buffer (§4.8), then build sample-data and borrow a source.
    pub fn create_sound_buffer(&self, desc: SoundBufferDesc) -> Result<Arc<Secondary>> {
        if desc.caps.contains(Caps::CTRL_3D) && desc.caps.contains(Caps::CTRL_PAN) {
            return Err(Error::InvalidParam);
        }
        if desc.has_3d_algorithm && !desc.caps.contains(Caps::CTRL_3D) {
            return Err(Error::InvalidParam);
        }

        let flags = CreateFlags { static_buffer: desc.caps.contains(Caps::STATIC) };
        let sample =
            SampleData::new(&self.share, desc.buffer_bytes, desc.format, desc.extensible, flags)?;
        Secondary::new(&self.share, sample, desc.caps)
    }

    /// `DuplicateSoundBuffer`: see §4.4.
    pub fn duplicate_sound_buffer(&self, buffer: &Secondary) -> Result<Arc<Secondary>> {
        buffer.duplicate()
    }

    /// `GetCaps`.
    pub fn get_caps(&self) -> DeviceCaps {
        DeviceCaps {
            total_voices: self.share.pool_size() as u32,
            free_voices: self.share.free_source_count() as u32,
            primary_channels: self.attached_primary().map_or(2, |p| u32::from(p.format().channels)),
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if self.primary.get_mut().take().is_some() {
            self.share.release_primary();
        }
    }
}
