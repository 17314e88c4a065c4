//! Capture device + capture buffer (§1: "the capture buffer ... its
//! interface is specified, its internals are not").
//!
//! This is a thin ring buffer over the backend's capture-device API
//! (`al-sys`'s `alcCaptureOpenDevice` family): the backend owns the actual
//! hardware ring, we pull whatever it currently holds into a host-side ring
//! sized to the caller's requested buffer bytes, and track a read cursor the
//! app advances via `Unlock`. No attempt is made to reproduce the original
//! implementation's internal resampling.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{
    backend::capture::{self, RawCaptureDevice},
    common::WaveFormat,
    macros::whoops,
    Error, Result,
};

/// Capture devices only ever expose plain PCM mono/stereo formats (no
/// multi-channel, no float) — there is no extension-capability bitset to
/// probe for capture the way [`crate::backend::caps::Extensions`] does for
/// playback, so this is a fixed table rather than a runtime check.
fn format_name(fmt: &WaveFormat) -> Result<&'static str> {
    match (fmt.channels, fmt.bits_per_sample) {
        (1, 8) => Ok("AL_FORMAT_MONO8"),
        (1, 16) => Ok("AL_FORMAT_MONO16"),
        (2, 8) => Ok("AL_FORMAT_STEREO8"),
        (2, 16) => Ok("AL_FORMAT_STEREO16"),
        _ => Err(Error::BadFormat),
    }
}

/// `IDirectSoundCapture(8)`: owns one backend capture device. Held by
/// [`CaptureBuffer`]s so the device outlives every buffer created on it.
pub struct CaptureDevice {
    device: RawCaptureDevice,
    format: WaveFormat,
}

impl CaptureDevice {
    /// `Initialize(guid)`. GUID-to-device-name resolution happens above
    /// this crate, same as [`crate::device::Device::initialize`].
    /// `ring_frames` sizes the backend's own capture ring, independent of
    /// any later `CreateCaptureBuffer`'s host-side ring size.
    pub fn initialize(
        name: Option<&str>,
        format: WaveFormat,
        ring_frames: u32,
    ) -> Result<Arc<CaptureDevice>> {
        crate::init_logging();
        let format_enum = crate::backend::buffer::resolve_format(format_name(&format)?)?;
        let device = capture::open(name, format.samples_per_sec, format_enum, ring_frames.max(1))?;
        Ok(Arc::new(CaptureDevice { device, format }))
    }

    pub fn format(&self) -> WaveFormat {
        self.format
    }
}

impl Drop for CaptureDevice {
    fn drop(&mut self) {
        unsafe { capture::close(self.device) };
    }
}

struct State {
    ring: Vec<u8>,
    write_cursor: u32,
    read_cursor: u32,
}

/// Two (read-only) spans covering a locked capture region; the second is
/// empty unless the lock wrapped past the end of the ring.
pub struct CaptureLockedSpans {
    pub span1: Vec<u8>,
    pub span2: Vec<u8>,
}

/// `IDirectSoundCaptureBuffer(8)`.
pub struct CaptureBuffer {
    device: Arc<CaptureDevice>,
    state: Mutex<State>,
    started: AtomicBool,
    locked: AtomicBool,
}

impl CaptureBuffer {
    /// `CreateCaptureBuffer`.
    pub fn new(device: &Arc<CaptureDevice>, buffer_bytes: u32) -> Result<CaptureBuffer> {
        if buffer_bytes == 0 {
            return Err(Error::InvalidParam);
        }
        Ok(CaptureBuffer {
            device: Arc::clone(device),
            state: Mutex::new(State { ring: vec![0; buffer_bytes as usize], write_cursor: 0, read_cursor: 0 }),
            started: AtomicBool::new(false),
            locked: AtomicBool::new(false),
        })
    }

    /// `Start(flags)`: `DSCBSTART_LOOPING` is the only legal flag and
    /// capture always loops its ring, so any flags are accepted and ignored.
    pub fn start(&self) -> Result {
        capture::start(&self.device.device)?;
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// `Stop`.
    pub fn stop(&self) -> Result {
        capture::stop(&self.device.device)?;
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// `GetStatus`: capturing iff `Start` was called and not yet `Stop`ped.
    pub fn is_capturing(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Drain whatever the backend ring currently holds into the host ring.
    /// If the caller has fallen behind enough that this would overwrite
    /// unread bytes, the oldest unread bytes are dropped and the read
    /// cursor is advanced past them, matching the real hardware ring's
    /// overwrite-on-overrun behavior.
    fn pull(&self) -> Result {
        let frames = capture::available_frames(&self.device.device)?;
        if frames == 0 {
            return Ok(());
        }
        let block_align = u32::from(self.device.format.block_align).max(1);
        let mut chunk = vec![0u8; (frames * block_align) as usize];
        capture::capture_samples(&self.device.device, &mut chunk, frames)?;

        let mut state = self.state.lock();
        let ring_len = state.ring.len() as u32;
        if ring_len == 0 {
            return Ok(());
        }
        for byte in chunk {
            let at = (state.write_cursor % ring_len) as usize;
            state.ring[at] = byte;
            state.write_cursor = state.write_cursor.wrapping_add(1);
            if state.write_cursor.wrapping_sub(state.read_cursor) > ring_len {
                whoops!("capture buffer overrun, dropping unread audio");
                state.read_cursor = state.write_cursor.wrapping_sub(ring_len);
            }
        }
        Ok(())
    }

    /// `GetCurrentPosition(capture, read)`.
    pub fn current_position(&self) -> Result<(u32, u32)> {
        self.pull()?;
        let state = self.state.lock();
        let ring_len = state.ring.len() as u32;
        Ok((state.write_cursor % ring_len.max(1), state.read_cursor % ring_len.max(1)))
    }

    /// `Lock(offset, len, flags)`: up to `len` unread bytes starting at
    /// `offset` in the ring, as two spans if the range wraps.
    pub fn lock(&self, offset: u32, len: u32) -> Result<CaptureLockedSpans> {
        if self.locked.swap(true, Ordering::SeqCst) {
            return Err(Error::InvalidParam);
        }
        if let Err(e) = self.pull() {
            self.locked.store(false, Ordering::SeqCst);
            return Err(e);
        }

        let state = self.state.lock();
        let ring_len = state.ring.len() as u32;
        if ring_len == 0 || offset >= ring_len {
            drop(state);
            self.locked.store(false, Ordering::SeqCst);
            return Err(Error::InvalidParam);
        }

        let end = u64::from(offset) + u64::from(len);
        let (len1, len2) = if end > u64::from(ring_len) {
            (ring_len - offset, (end - u64::from(ring_len)) as u32)
        } else {
            (len, 0)
        };
        let span1 = state.ring[offset as usize..(offset + len1) as usize].to_vec();
        let span2 = if len2 > 0 { state.ring[0..len2 as usize].to_vec() } else { Vec::new() };
        Ok(CaptureLockedSpans { span1, span2 })
    }

    /// `Unlock(len1, len2)`: advance the read cursor past the bytes the
    /// caller consumed.
    pub fn unlock(&self, len1: u32, len2: u32) -> Result {
        let mut state = self.state.lock();
        state.read_cursor = state.read_cursor.wrapping_add(len1).wrapping_add(len2);
        drop(state);
        self.locked.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_name_rejects_multichannel() {
        let fmt = WaveFormat::new_pcm(6, 44100, 16);
        assert_eq!(format_name(&fmt), Err(Error::BadFormat));
    }

    #[test]
    fn format_name_accepts_stereo16() {
        let fmt = WaveFormat::new_pcm(2, 44100, 16);
        assert_eq!(format_name(&fmt), Ok("AL_FORMAT_STEREO16"));
    }
}
