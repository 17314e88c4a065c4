//! ALC context lifecycle and the backend-wide serialization lock.
//!
//! OpenAL's `alc*`/`al*` entry points are not reentrant across contexts on
//! every implementation; DSOAL historically serialized all backend calls
//! behind one process-wide critical section (`dsound_private.h`'s `crst`).
//! We keep that discipline: [`BackendLock`] is acquired for the duration of
//! any sequence of raw calls that must observe a consistent context.

use std::ptr::NonNull;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::{
    backend::error::from_alc_error,
    macros::{alc, raw},
    Error, Result,
};

raw! {
    /// A raw, non-null `ALCcontext*`.
    #[derive(Clone, Copy)]
    pub struct RawContext(NonNull<al_sys::ALCcontext>);
}

unsafe impl Send for RawContext {}
unsafe impl Sync for RawContext {}

/// Global serialization lock for backend calls, mirroring the original
/// implementation's `DeviceShare::crst`. Each [`crate::share::DeviceShare`]
/// takes this lock rather than keep its own, since `alcMakeContextCurrent`
/// mutates *process-wide* state on implementations lacking
/// `AL_EXT_thread_local_context`.
///
/// Reentrant because call chains legitimately re-enter it on one thread:
/// the worker tick holds it for the whole tick body (§4.7) while calling
/// `Secondary` methods that each bracket their own backend calls with
/// [`lock`]. A plain mutex would deadlock the worker against itself.
pub(crate) static BACKEND_LOCK: ReentrantMutex<()> = ReentrantMutex::new(());

/// An RAII guard for the backend-wide lock, returned by [`lock`].
pub(crate) type BackendGuard = ReentrantMutexGuard<'static, ()>;

/// Acquire the backend-wide serialization lock.
pub(crate) fn lock() -> BackendGuard {
    BACKEND_LOCK.lock()
}

/// Create a context on `device` with no attribute list.
///
/// # Safety
/// `device` must be a valid, open `ALCdevice*` outliving the returned
/// context.
pub(crate) unsafe fn create(device: *mut al_sys::ALCdevice) -> Result<RawContext> {
    let ctx = alc!(device, al_sys::alcCreateContext(device, std::ptr::null()))?;
    NonNull::new(ctx).map(RawContext).ok_or(Error::OutOfMemory)
}

/// Make `ctx` current on the calling thread (or process, without
/// `AL_SOFT_thread_local_context`). Must be called with [`BACKEND_LOCK`]
/// held.
///
/// # Safety
/// `ctx` must be a context returned by [`create`] and not yet destroyed.
pub(crate) unsafe fn make_current(ctx: &RawContext, device: *mut al_sys::ALCdevice) -> Result {
    let ok = alc!(device, al_sys::alcMakeContextCurrent(ctx.0.as_ptr()))?;
    if ok == al_sys::ALC_TRUE {
        Ok(())
    } else {
        Err(from_alc_error(al_sys::ALC_INVALID_CONTEXT))
    }
}

/// Destroy a context created by [`create`].
///
/// # Safety
/// `ctx` must not be current on any thread and must not be used after this
/// call.
pub(crate) unsafe fn destroy(ctx: RawContext, device: *mut al_sys::ALCdevice) {
    let _ = alc!(device, al_sys::alcDestroyContext(ctx.0.as_ptr()));
}
