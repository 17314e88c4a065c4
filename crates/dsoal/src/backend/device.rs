//! ALC device open/close and extension probing.

use std::{ffi::CString, ptr::NonNull};

use crate::{
    backend::caps::Extensions,
    macros::{alc, raw},
    Error, Result,
};

raw! {
    /// A raw, non-null `ALCdevice*`.
    #[derive(Clone, Copy)]
    pub struct RawDevice(NonNull<al_sys::ALCdevice>);
}

unsafe impl Send for RawDevice {}
unsafe impl Sync for RawDevice {}

impl RawDevice {
    pub(crate) fn as_ptr(&self) -> *mut al_sys::ALCdevice {
        self.0.as_ptr()
    }
}

/// Open the default playback device, or the named device when `name` is
/// `Some` (mirrors `IDirectSound8::Initialize`'s `GUID` → device-name
/// resolution, which happens above this layer; by the time we're called the
/// name has already been resolved to an ALC device string).
pub(crate) fn open(name: Option<&str>) -> Result<RawDevice> {
    let cname = name.map(|n| CString::new(n).map_err(|_| Error::InvalidParam)).transpose()?;
    let ptr = cname.as_deref().map_or(std::ptr::null(), |c| c.as_ptr());
    // alcOpenDevice reports failure by returning null, not via alcGetError
    // (there is no device yet to query).
    let device = unsafe { al_sys::alcOpenDevice(ptr) };
    NonNull::new(device).map(RawDevice).ok_or(Error::NoDriver)
}

/// Close a device opened by [`open`]. The caller must have already
/// destroyed every context created against it.
///
/// # Safety
/// `device` must not be used after this call.
pub(crate) unsafe fn close(device: RawDevice) {
    let _ = al_sys::alcCloseDevice(device.0.as_ptr());
}

fn alc_has(device: *mut al_sys::ALCdevice, name: &'static [u8]) -> bool {
    let cname = CString::new(name).expect("static extension name");
    unsafe { al_sys::alcIsExtensionPresent(device, cname.as_ptr()) == al_sys::ALC_TRUE }
}

fn al_has(name: &'static [u8]) -> bool {
    let cname = CString::new(name).expect("static extension name");
    unsafe { al_sys::alIsExtensionPresent(cname.as_ptr()) == al_sys::AL_TRUE }
}

/// Probe every extension DSOAL cares about, once, at share construction
/// (§9 "Extensions as capabilities"). Must be called with a context from
/// `device` current.
pub(crate) fn probe_extensions(device: &RawDevice) -> Extensions {
    let dp = device.as_ptr();
    let mut caps = Extensions::empty();

    let mut want = |flag: Extensions, cond: bool| {
        if cond {
            caps.insert(flag);
        }
    };

    want(Extensions::FLOAT32, al_has(b"AL_EXT_FLOAT32"));
    want(Extensions::MULTI_CHANNEL, al_has(b"AL_EXT_MCFORMATS"));
    want(Extensions::DEFERRED_UPDATES, al_has(b"AL_SOFT_deferred_updates"));
    want(Extensions::BUFFER_SUB_DATA, al_has(b"AL_SOFT_buffer_sub_data"));
    want(Extensions::BUFFER_SAMPLES, al_has(b"AL_SOFT_buffer_samples"));
    want(Extensions::STATIC_BUFFER, al_has(b"AL_EXT_STATIC_BUFFER"));
    want(Extensions::EFX, alc_has(dp, b"ALC_EXT_EFX"));
    want(Extensions::THREAD_LOCAL_CONTEXT, al_has(b"AL_SOFT_thread_local_context"));
    want(Extensions::MAP_BUFFER, al_has(b"AL_SOFT_map_buffer"));
    want(Extensions::SOURCE_SPATIALIZE, al_has(b"AL_SOFT_source_spatialize"));
    want(Extensions::BYTE_RW_OFFSETS, al_has(b"AL_SOFT_byte_length_query"));

    caps
}
