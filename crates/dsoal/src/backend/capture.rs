//! ALC capture-device open/close/start/stop and sample pulls, backing the
//! capture side of the core (§1 "DirectSound Capture").

use std::{ffi::CString, ptr::NonNull};

use crate::{
    macros::{alc, raw},
    Error, Result,
};

raw! {
    /// A raw, non-null capture `ALCdevice*`.
    #[derive(Clone, Copy)]
    pub struct RawCaptureDevice(NonNull<al_sys::ALCdevice>);
}

unsafe impl Send for RawCaptureDevice {}
unsafe impl Sync for RawCaptureDevice {}

impl RawCaptureDevice {
    pub(crate) fn as_ptr(&self) -> *mut al_sys::ALCdevice {
        self.0.as_ptr()
    }
}

/// Open the default capture device, or the named one, with a ring buffer
/// `buffer_frames` frames deep at `(rate, format)`.
pub(crate) fn open(
    name: Option<&str>,
    rate: u32,
    format: al_sys::ALenum,
    buffer_frames: u32,
) -> Result<RawCaptureDevice> {
    let cname = name.map(|n| CString::new(n).map_err(|_| Error::InvalidParam)).transpose()?;
    let ptr = cname.as_deref().map_or(std::ptr::null(), |c| c.as_ptr());
    // alcCaptureOpenDevice reports failure by returning null, not via
    // alcGetError (there is no device yet to query).
    let device =
        unsafe { al_sys::alcCaptureOpenDevice(ptr, rate, format, buffer_frames as al_sys::ALCsizei) };
    NonNull::new(device).map(RawCaptureDevice).ok_or(Error::NoDriver)
}

/// # Safety
/// `device` must not be used after this call.
pub(crate) unsafe fn close(device: RawCaptureDevice) {
    let _ = al_sys::alcCaptureCloseDevice(device.as_ptr());
}

pub(crate) fn start(device: &RawCaptureDevice) -> Result {
    alc!(device.as_ptr(), al_sys::alcCaptureStart(device.as_ptr()))
}

pub(crate) fn stop(device: &RawCaptureDevice) -> Result {
    alc!(device.as_ptr(), al_sys::alcCaptureStop(device.as_ptr()))
}

/// Number of frames currently buffered and ready to pull (`ALC_CAPTURE_SAMPLES`).
pub(crate) fn available_frames(device: &RawCaptureDevice) -> Result<u32> {
    let mut count: al_sys::ALCint = 0;
    alc!(
        device.as_ptr(),
        al_sys::alcGetIntegerv(device.as_ptr(), al_sys::ALC_CAPTURE_SAMPLES as al_sys::ALCenum, 1, &mut count)
    )?;
    Ok(count.max(0) as u32)
}

/// Pull `frames` frames into `out`. `out` must be at least
/// `frames * block_align` bytes.
pub(crate) fn capture_samples(device: &RawCaptureDevice, out: &mut [u8], frames: u32) -> Result {
    alc!(
        device.as_ptr(),
        al_sys::alcCaptureSamples(device.as_ptr(), out.as_mut_ptr().cast(), frames as al_sys::ALCsizei)
    )
}
