//! Device share (C2): a ref-counted singleton per opened backend device.
//!
//! All DirectSound device handles that resolve to the same physical output
//! share one [`DeviceShare`] — one backend device, one backend context, one
//! free-source pool, one worker thread. The process-wide registry is the
//! only global state besides the backend lock itself (§9 "Global state").

use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
        Arc, Weak,
    },
    thread::JoinHandle,
};

use parking_lot::Mutex;

use crate::{
    backend::{
        context::{self, BackendGuard},
        device::{self, RawDevice},
        source::SourceId,
        Extensions,
    },
    buffer::Secondary,
    handle::{Handle, Resource},
    macros::whoops,
    Error, Result,
};

/// An opaque device identity. Resolving a DirectSound device GUID (or the
/// well-known `DSDEVID_DefaultPlayback`-style aliases) down to one of these
/// is a platform-enumeration concern that sits above this crate; by the
/// time [`acquire`] is called the id has already been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub [u8; 16]);

/// Number of streaming queue segments kept in flight (§4.3, §4.7).
pub(crate) const QBUFFERS: usize = 4;

struct Inner {
    id: DeviceId,
    device: RawDevice,
    context: context::RawContext,
    caps: Extensions,
    refresh_hz: u32,
    state: Mutex<State>,
    primary_refs: AtomicUsize,
    quit: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
    vm_manager_mode: AtomicU32,
    primary: Mutex<Weak<crate::primary::Primary>>,
}

struct State {
    free_sources: Vec<SourceId>,
    pool_size: usize,
    secondaries: Vec<Weak<Secondary>>,
    notify: Vec<Weak<Secondary>>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceShare").field("id", &self.id).field("caps", &self.caps).finish()
    }
}

impl Resource for Inner {
    fn release(&self) {
        self.quit.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                whoops!("worker thread for device share panicked");
            }
        }
        let _guard = context::lock();
        let device = self.device;
        let context = self.context;
        unsafe {
            context::destroy(context, device.as_ptr());
            device::close(device);
        }
        registry_remove(&self.id);
    }
}

/// The device share itself. Cheap to clone; clones are ref-counted handles
/// sharing one [`Inner`].
#[derive(Clone, Debug)]
pub struct DeviceShare(Handle<Inner>);

static REGISTRY: Mutex<Option<HashMap<DeviceId, Weak<Inner>>>> = Mutex::new(None);

fn with_registry<R>(f: impl FnOnce(&mut HashMap<DeviceId, Weak<Inner>>) -> R) -> R {
    let mut guard = REGISTRY.lock();
    f(guard.get_or_insert_with(HashMap::new))
}

fn registry_remove(id: &DeviceId) {
    with_registry(|r| {
        r.remove(id);
    });
}

/// Probe how many hardware sources the backend will actually grant, by
/// allocating until `alGenSources` fails, per §4.2.
fn probe_source_pool() -> Vec<SourceId> {
    let mut ids = Vec::new();
    while ids.len() < 256 {
        match crate::backend::source::gen() {
            Ok(id) => ids.push(id),
            Err(_) => break,
        }
    }
    ids
}

/// Acquire the share for `id`, opening a backend device and context if this
/// is the first reference (§4.2 `acquire`).
pub fn acquire(id: DeviceId, device_name: Option<&str>) -> Result<DeviceShare> {
    if let Some(inner) = with_registry(|r| r.get(&id).and_then(Weak::upgrade)) {
        return Ok(DeviceShare(Handle::from_arc(inner)));
    }

    let raw_device = device::open(device_name)?;
    let _guard = context::lock();
    let raw_context = unsafe { context::create(raw_device.as_ptr())? };
    unsafe { context::make_current(&raw_context, raw_device.as_ptr())? };

    let caps = device::probe_extensions(&raw_device);
    let free_sources = probe_source_pool();
    if free_sources.is_empty() {
        unsafe {
            context::destroy(raw_context, raw_device.as_ptr());
            device::close(raw_device);
        }
        return Err(Error::NoDriver);
    }
    let pool_size = free_sources.len();

    let inner = Inner {
        id,
        device: raw_device,
        context: raw_context,
        caps,
        refresh_hz: 50,
        state: Mutex::new(State {
            free_sources,
            pool_size,
            secondaries: Vec::new(),
            notify: Vec::new(),
        }),
        primary_refs: AtomicUsize::new(0),
        quit: AtomicBool::new(false),
        worker: Mutex::new(None),
        vm_manager_mode: AtomicU32::new(0),
        primary: Mutex::new(Weak::new()),
    };
    let handle = Handle::new(inner);
    with_registry(|r| {
        r.insert(id, Handle::downgrade(&handle));
    });

    let share = DeviceShare(handle);
    let worker_handle = crate::worker::spawn(share.clone());
    *share.0.worker.lock() = Some(worker_handle);

    Ok(share)
}

impl DeviceShare {
    pub fn id(&self) -> DeviceId {
        self.0.id
    }

    pub fn caps(&self) -> Extensions {
        self.0.caps
    }

    pub fn refresh_hz(&self) -> u32 {
        self.0.refresh_hz
    }

    pub(crate) fn device_ptr(&self) -> *mut al_sys::ALCdevice {
        self.0.device.as_ptr()
    }

    pub(crate) fn context(&self) -> context::RawContext {
        self.0.context
    }

    /// Acquire the backend lock and make this share's context current.
    /// Every raw backend call made on this share's objects must happen
    /// while the returned guard is alive.
    pub(crate) fn lock_context(&self) -> Result<BackendGuard> {
        let guard = context::lock();
        unsafe { context::make_current(&self.0.context, self.0.device.as_ptr())? };
        Ok(guard)
    }

    pub(crate) fn pool_size(&self) -> usize {
        self.0.state.lock().pool_size
    }

    pub(crate) fn free_source_count(&self) -> usize {
        self.0.state.lock().free_sources.len()
    }

    pub(crate) fn checkout_source(&self) -> Option<SourceId> {
        self.0.state.lock().free_sources.pop()
    }

    pub(crate) fn return_source(&self, id: SourceId) {
        self.0.state.lock().free_sources.push(id);
    }

    pub(crate) fn register_secondary(&self, buf: &Arc<Secondary>) {
        self.0.state.lock().secondaries.push(Arc::downgrade(buf));
    }

    pub(crate) fn unregister_secondary(&self, buf: &Secondary) {
        let mut state = self.0.state.lock();
        state.secondaries.retain(|w| w.upgrade().is_some_and(|s| !std::ptr::eq(&*s, buf)));
    }

    /// Add `buf` to the notify list (§4.4 "Notifications"), if not already
    /// present.
    pub(crate) fn mark_notify(&self, buf: &Arc<Secondary>) {
        let mut state = self.0.state.lock();
        let already =
            state.notify.iter().filter_map(Weak::upgrade).any(|s| Arc::ptr_eq(&s, buf));
        if !already {
            state.notify.push(Arc::downgrade(buf));
        }
    }

    pub(crate) fn unmark_notify(&self, buf: &Secondary) {
        let mut state = self.0.state.lock();
        state.notify.retain(|w| w.upgrade().is_some_and(|s| !std::ptr::eq(&*s, buf)));
    }

    pub(crate) fn live_secondaries(&self) -> Vec<Arc<Secondary>> {
        let mut state = self.0.state.lock();
        state.secondaries.retain(|w| w.strong_count() > 0);
        state.secondaries.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn notify_targets(&self) -> Vec<Arc<Secondary>> {
        let mut state = self.0.state.lock();
        state.notify.retain(|w| w.strong_count() > 0);
        state.notify.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.0.quit.load(Ordering::SeqCst)
    }

    /// Register that a primary-buffer handle now references this share, so
    /// a secondary device handle closing does not tear the share down out
    /// from under the primary (§3 "a list of live primary references").
    pub(crate) fn acquire_primary(&self) {
        self.0.primary_refs.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn release_primary(&self) {
        self.0.primary_refs.fetch_sub(1, Ordering::SeqCst);
    }

    /// Voice manager mode is shared process-wide by every buffer on this
    /// device (§8.3 "voice manager" — storage is per-share, not per-buffer).
    pub(crate) fn voice_manager_mode(&self) -> u32 {
        self.0.vm_manager_mode.load(Ordering::SeqCst)
    }

    pub(crate) fn set_voice_manager_mode(&self, mode: u32) {
        self.0.vm_manager_mode.store(mode, Ordering::SeqCst);
    }

    /// Record the share's attached primary singleton, so secondary buffers
    /// can look up the listener's rolloff factor without holding their own
    /// reference to it (§4.4 "3D parameters" — `AL_ROLLOFF_FACTOR` tracks
    /// the primary's configured rolloff, not a fixed `1.0`).
    pub(crate) fn register_primary(&self, primary: &Arc<crate::primary::Primary>) {
        *self.0.primary.lock() = Arc::downgrade(primary);
    }

    /// The primary listener's rolloff factor, or `1.0` if no primary has
    /// been attached yet.
    pub(crate) fn rolloff_factor(&self) -> f32 {
        self.0.primary.lock().upgrade().map_or(1.0, |p| p.get_listener_params().rolloff_factor)
    }
}
