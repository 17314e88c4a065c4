//! Secondary buffer (C4): a playable sound object with its own volume, pan,
//! frequency, 3D, and filter state, borrowing one backend source.

mod duplicate;
mod eax_filter;
mod lock;
mod notify;
mod playback;
mod position;
mod spatialization;
mod volume;

pub use notify::NotifyPosition;
pub use spatialization::{Ds3dMode, Params3d};

use std::sync::{
    atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{
    backend::{
        effect::{self, FilterId},
        source::SourceId,
    },
    eax::source_filter::SourceFilter,
    sampledata::SampleData,
    share::DeviceShare,
    Error, Result,
};

macro_rules! bitflags_like {
    ($(#[$meta:meta])* pub struct $name:ident: $ty:ty { $(const $variant:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($ty);
        impl $name {
            $(pub const $variant: $name = $name($value);)*
            pub const fn empty() -> Self { $name(0) }
            pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }
            pub const fn union(self, other: Self) -> Self { $name(self.0 | other.0) }
        }
        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self { self.union(rhs) }
        }
    };
}

bitflags_like! {
    /// Snapshot of `DSBUFFERDESC::dwFlags` capability bits taken at
    /// `CreateSoundBuffer` time; immutable for the buffer's lifetime.
    pub struct Caps: u32 {
        const CTRL_3D = 1 << 0;
        const CTRL_VOLUME = 1 << 1;
        const CTRL_PAN = 1 << 2;
        const CTRL_FREQUENCY = 1 << 3;
        const CTRL_POSITIONNOTIFY = 1 << 4;
        const STATIC = 1 << 5;
        const LOC_DEFER = 1 << 6;
        const LOC_SOFTWARE = 1 << 7;
        const LOC_HARDWARE = 1 << 8;
        const CTRL_FX = 1 << 9;
    }
}

/// `Uninitialized → Stopped ⇄ Playing → Lost (→ Restored → Stopped)` (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayState {
    Stopped,
    Playing,
    Lost,
}

/// Reported value of the voice-manager `STATE` property: DirectSound's real
/// hardware-voice manager had several of these; this backend only ever
/// reports the two extremes a software voice can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceManagerState {
    Playing3dHardware,
    Silent,
}

impl VoiceManagerState {
    pub(crate) fn from_play_state(play: PlayState) -> Self {
        match play {
            PlayState::Playing => VoiceManagerState::Playing3dHardware,
            PlayState::Stopped | PlayState::Lost => VoiceManagerState::Silent,
        }
    }
}

struct State {
    source: Option<SourceId>,
    play: PlayState,
    is_looping: bool,
    cur_segment: u32,
    filter: SourceFilter,
    direct_filter: Option<FilterId>,
    send_filter: Option<FilterId>,
    params: Params3d,
    deferred: Params3d,
    dirty: spatialization::Dirty,
    notify_positions: Vec<NotifyPosition>,
    last_pos: u32,
    vm_priority: u32,
}

/// A secondary buffer. Shared by value (`Arc`) with the share's non-owning
/// notify/secondaries lists and with any duplicates created by
/// `DuplicateSoundBuffer` that alias the same [`SampleData`].
pub struct Secondary {
    share: DeviceShare,
    sample: Arc<SampleData>,
    caps: Caps,
    state: Mutex<State>,
    buffer_lost: AtomicBool,
    frequency_ratio: AtomicU32,
    pan: AtomicI32,
    self_weak: std::sync::Weak<Secondary>,
    fired_events: Mutex<Vec<usize>>,
}

impl Secondary {
    /// `Initialize` (§4.4): create sample-data, borrow a source, set
    /// defaults, and land in `Stopped`.
    pub fn new(share: &DeviceShare, sample: Arc<SampleData>, caps: Caps) -> Result<Arc<Secondary>> {
        if caps.contains(Caps::CTRL_3D) && caps.contains(Caps::CTRL_PAN) {
            return Err(Error::InvalidParam);
        }
        let source = share.checkout_source();

        let (direct_filter, send_filter) = if caps.contains(Caps::CTRL_FX) && effect::is_available() {
            let _guard = share.lock_context()?;
            (effect::gen_filter().ok(), effect::gen_filter().ok())
        } else {
            (None, None)
        };

        let secondary = Arc::new_cyclic(|weak| Secondary {
            share: share.clone(),
            sample,
            caps,
            state: Mutex::new(State {
                source,
                play: PlayState::Stopped,
                is_looping: false,
                cur_segment: 0,
                filter: SourceFilter::default(),
                direct_filter,
                send_filter,
                params: Params3d::default(),
                deferred: Params3d::default(),
                dirty: spatialization::Dirty::empty(),
                notify_positions: Vec::new(),
                last_pos: 0,
                vm_priority: 0,
            }),
            buffer_lost: AtomicBool::new(false),
            frequency_ratio: AtomicU32::new(1.0f32.to_bits()),
            pan: AtomicI32::new(0),
            self_weak: weak.clone(),
            fired_events: Mutex::new(Vec::new()),
        });
        share.register_secondary(&secondary);
        Ok(secondary)
    }

    pub fn caps(&self) -> Caps {
        self.caps
    }

    pub(crate) fn share(&self) -> &DeviceShare {
        &self.share
    }

    /// Re-derive the `Arc` this buffer is held by, for registering itself
    /// on share-owned weak lists from a `&self` method.
    pub(crate) fn arc(&self) -> Arc<Secondary> {
        self.self_weak.upgrade().expect("Secondary always holds a strong ref to itself while alive")
    }

    pub(crate) fn sample(&self) -> &Arc<SampleData> {
        &self.sample
    }

    pub(crate) fn source(&self) -> Option<SourceId> {
        self.state.lock().source
    }

    pub fn is_lost(&self) -> bool {
        self.buffer_lost.load(Ordering::SeqCst)
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.state.lock().play == PlayState::Playing
    }

    pub(crate) fn mark_lost(&self, lost: bool) {
        self.buffer_lost.store(lost, Ordering::SeqCst);
    }

    fn check_not_lost(&self) -> Result {
        if self.is_lost() {
            return Err(Error::BufferLost);
        }
        Ok(())
    }

    /// Queue event handles for firing; drained by the platform layer that
    /// owns the actual Win32 event objects (§4.4 "Notifications" — signaling
    /// the handle is outside this crate's boundary).
    pub(crate) fn queue_fired_events(&self, events: impl IntoIterator<Item = usize>) {
        let mut fired = self.fired_events.lock();
        fired.extend(events);
    }

    /// Drain and return event handles that fired since the last call.
    pub fn take_fired_events(&self) -> Vec<usize> {
        std::mem::take(&mut self.fired_events.lock())
    }

    /// `DSPROPERTY_VMANAGER_MODE` get: stored per-share, shared by every
    /// buffer on the device.
    pub fn voice_manager_mode(&self) -> u32 {
        self.share.voice_manager_mode()
    }

    /// `DSPROPERTY_VMANAGER_MODE` set: accepted and stored, no effect on
    /// playback (§8.3).
    pub fn set_voice_manager_mode(&self, mode: u32) {
        self.share.set_voice_manager_mode(mode);
    }

    /// `DSPROPERTY_VMANAGER_PRIORITY` get.
    pub fn voice_manager_priority(&self) -> u32 {
        self.state.lock().vm_priority
    }

    /// `DSPROPERTY_VMANAGER_PRIORITY` set: accepted and stored, no effect on
    /// playback (§8.3).
    pub fn set_voice_manager_priority(&self, priority: u32) {
        self.state.lock().vm_priority = priority;
    }

    /// `DSPROPERTY_VMANAGER_STATE` get: derived from current play state, not
    /// independently stored.
    pub fn voice_manager_state(&self) -> VoiceManagerState {
        VoiceManagerState::from_play_state(self.state.lock().play)
    }
}

impl Drop for Secondary {
    fn drop(&mut self) {
        self.share.unregister_secondary(self);
        self.share.unmark_notify(self);
        let mut state = self.state.lock();
        let direct_filter = state.direct_filter.take();
        let send_filter = state.send_filter.take();
        let source = state.source.take();
        if source.is_some() || direct_filter.is_some() || send_filter.is_some() {
            if let Ok(_guard) = self.share.lock_context() {
                if let Some(source) = source {
                    let _ = crate::backend::source::stop(source);
                    let _ = crate::backend::source::set_buffer(source, 0);
                }
                if let Some(id) = direct_filter {
                    let _ = effect::delete_filter(id);
                }
                if let Some(id) = send_filter {
                    let _ = effect::delete_filter(id);
                }
            }
        }
        if let Some(source) = source {
            self.share.return_source(source);
        }
    }
}
