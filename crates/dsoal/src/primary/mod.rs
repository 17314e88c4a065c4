//! Primary buffer / listener (C5): the per-share mixing sink singleton.
//!
//! One [`Primary`] exists per live [`DeviceShare`], owned by whichever
//! [`crate::device::Device`] handles resolve to that share. It holds the
//! current format descriptor, the write-emulation secondary backing
//! `DSSCL_WRITEPRIMARY`, the 3D listener's deferred-commit state, the EAX
//! reverb/chorus bridge, and the persisted speaker-configuration DWORD.

mod eax_state;
mod format;
mod listener;

pub use eax_state::EaxListenerView;
pub use format::CooperativeLevel;
pub use listener::{Apply, ListenerParams};

use std::sync::{atomic::AtomicBool, Arc};

use parking_lot::Mutex;

use crate::{
    buffer::Secondary,
    common::SpeakerConfig,
    config::{FileSpeakerConfigStore, SpeakerConfigStore},
    eax::{legacy::Chorus, FxSlot},
    share::DeviceShare,
    Result,
};

pub(crate) struct EaxState {
    pub(crate) version: crate::eax::Version,
    pub(crate) reverb: crate::eax::reverb::Reverb,
    pub(crate) effect_dirty: bool,
    pub(crate) eax1: crate::eax::legacy::Eax1Listener,
    pub(crate) chorus: Chorus,
    pub(crate) chorus_dirty: bool,
    /// Four generic slots when EFX is available; empty otherwise. EAX2/3
    /// address `slots[0]` exclusively; EAX4 addresses all four.
    pub(crate) slots: Vec<FxSlot>,
}

/// A primary buffer/listener singleton, one per [`DeviceShare`].
pub struct Primary {
    share: DeviceShare,
    format: Mutex<format::FormatState>,
    write_emu: Mutex<Option<Arc<Secondary>>>,
    stopped: AtomicBool,
    listener: Mutex<listener::ListenerState>,
    speaker_config: Mutex<SpeakerConfig>,
    config_store: Box<dyn SpeakerConfigStore>,
    eax: Mutex<EaxState>,
}

impl Primary {
    /// Construct the singleton for `share`: probe EFX and allocate its
    /// reverb/chorus effect objects and auxiliary slot(s) up front so later
    /// EAX property-set calls never have to fail on allocation (§4.5, §4.6).
    pub fn new(share: &DeviceShare) -> Result<Primary> {
        let slots = eax_state::alloc_slots(share)?;
        let config_store: Box<dyn SpeakerConfigStore> = Box::new(FileSpeakerConfigStore::new());
        let speaker_config = config_store.load().unwrap_or_default();

        let primary = Primary {
            share: share.clone(),
            format: Mutex::new(format::FormatState::default()),
            write_emu: Mutex::new(None),
            stopped: AtomicBool::new(true),
            listener: Mutex::new(listener::ListenerState::default()),
            speaker_config: Mutex::new(speaker_config),
            config_store,
            eax: Mutex::new(EaxState {
                version: crate::eax::Version::Eax2,
                reverb: crate::eax::presets::PRESETS[0],
                effect_dirty: true,
                eax1: crate::eax::legacy::Eax1Listener::default(),
                chorus: Chorus::default(),
                chorus_dirty: true,
                slots,
            }),
        };

        if !primary.eax.lock().slots.is_empty() {
            primary.commit_eax_effects()?;
        }
        Ok(primary)
    }

    pub(crate) fn share(&self) -> &DeviceShare {
        &self.share
    }

    /// `GetSpeakerConfig`.
    pub fn speaker_config(&self) -> SpeakerConfig {
        *self.speaker_config.lock()
    }

    /// `SetSpeakerConfig`: accepted unconditionally (it describes the
    /// physical output, not anything this crate enforces) and persisted
    /// immediately so the next process start sees it (§4.5).
    pub fn set_speaker_config(&self, config: SpeakerConfig) {
        *self.speaker_config.lock() = config;
        self.config_store.store(config);
    }

    /// `Play`/`Stop` on the primary: a coarse mute/unmute by zeroing (and
    /// restoring) listener gain, since the primary has no mixer position of
    /// its own to start or stop (§3 "a 'stopped' flag").
    pub fn play(&self) -> Result {
        self.stopped.store(false, std::sync::atomic::Ordering::SeqCst);
        self.apply_listener_gain()
    }

    pub fn stop(&self) -> Result {
        self.stopped.store(true, std::sync::atomic::Ordering::SeqCst);
        self.apply_listener_gain()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn apply_listener_gain(&self) -> Result {
        let gain = if self.is_stopped() { 0.0 } else { self.listener.lock().params.gain };
        let _guard = self.share.lock_context()?;
        crate::backend::listener::set_gain(gain)
    }
}

impl Drop for Primary {
    fn drop(&mut self) {
        let slots = std::mem::take(&mut self.eax.lock().slots);
        if slots.is_empty() {
            return;
        }
        let Ok(_guard) = self.share.lock_context() else { return };
        for slot in &slots {
            let _ = crate::backend::effect::delete_effect(slot.reverb_effect);
            let _ = crate::backend::effect::delete_effect(slot.chorus_effect);
            let _ = crate::backend::effect::delete_aux_slot(slot.aux_slot());
        }
    }
}
