//! `SetVolume`/`SetFrequency`/`SetPan` (§4.4 "3D parameters" pan formula;
//! §9 "Panning math").

use log::debug;

use crate::{backend, common::Vector3, utils::mb_to_gain, Error, Result};

use super::Secondary;

/// `DSBVOLUME_MIN`/`DSBVOLUME_MAX`, in millibels.
pub const DSBVOLUME_MIN: i32 = -10000;
pub const DSBVOLUME_MAX: i32 = 0;
/// `DSBPAN_LEFT`/`DSBPAN_RIGHT`.
pub const DSBPAN_LEFT: i32 = -10000;
pub const DSBPAN_RIGHT: i32 = 10000;
/// `DSBFREQUENCY_MIN`/`DSBFREQUENCY_MAX`/`DSBFREQUENCY_ORIGINAL`.
pub const DSBFREQUENCY_MIN: u32 = 100;
pub const DSBFREQUENCY_MAX: u32 = 200_000;
pub const DSBFREQUENCY_ORIGINAL: u32 = 0;

impl Secondary {
    /// `SetVolume(mb)`.
    pub fn set_volume(&self, mb: i32) -> Result {
        if !(DSBVOLUME_MIN..=DSBVOLUME_MAX).contains(&mb) {
            return Err(Error::InvalidParam);
        }
        let Some(source) = self.state.lock().source else { return Ok(()) };
        let _guard = self.share().lock_context()?;
        backend::source::set_gain(source, mb_to_gain(mb as f32))
    }

    /// `SetFrequency(freq)`: `freq == DSBFREQUENCY_ORIGINAL` resets to unity
    /// pitch; otherwise `pitch = freq / original_rate`.
    pub fn set_frequency(&self, freq: u32) -> Result {
        if freq != DSBFREQUENCY_ORIGINAL && !(DSBFREQUENCY_MIN..=DSBFREQUENCY_MAX).contains(&freq) {
            return Err(Error::InvalidParam);
        }
        let original_rate = self.sample().format().samples_per_sec;
        let pitch = if freq == DSBFREQUENCY_ORIGINAL { 1.0 } else { freq as f32 / original_rate as f32 };

        self.frequency_ratio.store(pitch.to_bits(), std::sync::atomic::Ordering::SeqCst);

        let Some(source) = self.state.lock().source else { return Ok(()) };
        let _guard = self.share().lock_context()?;
        backend::source::set_pitch(source, pitch)
    }

    /// `SetPan(pan)` (§4.4, §9 "Panning math"). Only meaningful for
    /// single-channel sources; multi-channel sources no-op (Open Question
    /// #3).
    pub fn set_pan(&self, pan: i32) -> Result {
        if !(DSBPAN_LEFT..=DSBPAN_RIGHT).contains(&pan) {
            return Err(Error::InvalidParam);
        }
        if self.sample().format().channels != 1 {
            debug!("SetPan on a multi-channel buffer is a no-op");
            return Ok(());
        }

        self.pan.store(pan, std::sync::atomic::Ordering::SeqCst);

        let Some(source) = self.state.lock().source else { return Ok(()) };
        let _guard = self.share().lock_context()?;
        self.apply_pan_to_source(source)
    }

    /// Re-apply the last `SetPan` value to `source`, for `DuplicateSoundBuffer`
    /// and for re-binding after a buffer restore.
    pub(crate) fn apply_pan_to_source(&self, source: backend::source::SourceId) -> Result {
        let pan = self.pan.load(std::sync::atomic::Ordering::SeqCst);
        let x = pan as f32 / DSBPAN_RIGHT as f32;
        let y = (1.0 - x * x).max(0.0).sqrt();
        backend::source::set_relative(source, true)?;
        backend::source::set_position(source, Vector3::new(x, y, 0.0))
    }
}
