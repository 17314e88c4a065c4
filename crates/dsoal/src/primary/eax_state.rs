//! EAX listener bridge (C6, listener half): environment/reverb record,
//! chorus, and the generic FX slots, plus their commit to EFX effect
//! objects (§4.6).

use crate::{
    backend::effect::{self, AuxSlotId},
    eax::{
        legacy::{Chorus, Eax1Listener},
        presets::PRESETS,
        reverb::Reverb,
        FxSlot, SlotEffect, Version,
    },
    share::DeviceShare,
    utils::clampf,
    Result,
};

use super::Primary;

/// Number of generic FX slots EAX4 exposes; EAX2/3 only ever touch `[0]`.
const NUM_SLOTS: usize = 4;

/// Allocate the share's FX slots, or an empty set if EFX isn't available —
/// every EAX call then becomes a harmless no-op rather than failing at
/// construction (§4.6 is purely additive on top of plain DirectSound3D).
pub(super) fn alloc_slots(share: &DeviceShare) -> Result<Vec<FxSlot>> {
    if !effect::is_available() {
        return Ok(Vec::new());
    }

    let _guard = share.lock_context()?;
    let mut slots = Vec::with_capacity(NUM_SLOTS);
    for _ in 0..NUM_SLOTS {
        let aux_slot = effect::gen_aux_slot()?;
        let reverb_effect = effect::gen_effect()?;
        let chorus_effect = effect::gen_effect()?;
        slots.push(FxSlot::new(aux_slot, reverb_effect, chorus_effect));
    }
    // EAX2/3 behave as if slot 0 is permanently loaded with reverb.
    slots[0].effect_type = SlotEffect::Reverb;
    Ok(slots)
}

/// A read-only snapshot of the listener-side EAX state, for `Get`-style
/// property-set calls that want everything at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaxListenerView {
    pub version: Version,
    pub reverb: Reverb,
    pub eax1: Eax1Listener,
}

impl Primary {
    pub fn eax_version(&self) -> Version {
        self.eax.lock().version
    }

    pub fn set_eax_version(&self, version: Version) {
        self.eax.lock().version = version;
    }

    pub fn listener_view(&self) -> EaxListenerView {
        let state = self.eax.lock();
        EaxListenerView { version: state.version, reverb: state.reverb, eax1: state.eax1 }
    }

    pub fn reverb(&self) -> Reverb {
        self.eax.lock().reverb
    }

    /// `EAXLISTENER_ALLPARAMETERS`/`EAX30LISTENERPROPERTIES`-style full
    /// overwrite.
    pub fn set_reverb(&self, reverb: Reverb) -> Result {
        let mut state = self.eax.lock();
        state.reverb = reverb;
        state.effect_dirty = true;
        drop(state);
        self.commit_eax_effects()
    }

    /// `EAXLISTENER_ENVIRONMENT = k`: load preset `k` verbatim (§4.6
    /// "Environment preset table").
    pub fn set_environment(&self, environment: u32) -> Result {
        let preset = PRESETS[(environment as usize).min(PRESETS.len() - 1)];
        let mut state = self.eax.lock();
        state.reverb = preset;
        state.effect_dirty = true;
        drop(state);
        self.commit_eax_effects()
    }

    /// `EAXLISTENER_ENVIRONMENTSIZE = new` (§4.6 "Environment-size
    /// rescaling").
    pub fn set_environment_size(&self, size: f32) -> Result {
        let mut state = self.eax.lock();
        state.reverb.set_environment_size(clampf(size, 1.0, 100.0));
        state.effect_dirty = true;
        drop(state);
        self.commit_eax_effects()
    }

    /// EAX1's single-record listener property set (§4.6 "EAX 1
    /// translation"): stored verbatim and projected to a full reverb record
    /// on every change.
    pub fn set_eax1(&self, eax1: Eax1Listener) -> Result {
        let mut state = self.eax.lock();
        state.eax1 = eax1;
        state.reverb = eax1.to_reverb();
        state.effect_dirty = true;
        drop(state);
        self.commit_eax_effects()
    }

    pub fn eax1(&self) -> Eax1Listener {
        self.eax.lock().eax1
    }

    pub fn chorus(&self) -> Chorus {
        self.eax.lock().chorus
    }

    pub fn set_chorus(&self, chorus: Chorus) -> Result {
        let mut state = self.eax.lock();
        state.chorus = chorus;
        state.chorus_dirty = true;
        drop(state);
        self.commit_eax_effects()
    }

    /// Read one of the four generic FX slots' public state (`EAXFXSLOT_*`
    /// properties), if EFX is available.
    pub fn fx_slot(&self, index: usize) -> Option<(SlotEffect, i32, bool, bool)> {
        let state = self.eax.lock();
        state.slots.get(index).map(|s| (s.effect_type, s.volume_mb, s.lock, s.environment_follows_listener))
    }

    /// `EAXFXSLOT_LOADEFFECT`.
    pub fn set_fx_slot_effect(&self, index: usize, effect_type: SlotEffect) -> Result {
        let mut state = self.eax.lock();
        if let Some(slot) = state.slots.get_mut(index) {
            slot.effect_type = effect_type;
        }
        drop(state);
        self.commit_eax_effects()
    }

    /// `EAXFXSLOT_VOLUME`.
    pub fn set_fx_slot_volume(&self, index: usize, volume_mb: i32) -> Result {
        let mut state = self.eax.lock();
        if let Some(slot) = state.slots.get_mut(index) {
            slot.volume_mb = volume_mb;
        }
        drop(state);
        self.commit_eax_effects()
    }

    /// The `(slot, send)` pair a per-source filter should target for
    /// EAX2/3 routing — always slot 0, send 0 — for
    /// [`crate::buffer::Secondary::set_eax_filter`] to wire its wet-path
    /// send into.
    pub fn primary_aux_send(&self) -> Option<(AuxSlotId, i32)> {
        self.eax.lock().slots.first().map(|slot| (slot.aux_slot(), 0))
    }

    /// Push every dirty EAX record down to its backing EFX objects and
    /// (re)bind each slot's effect (§4.6 "EFX reverb parameter map").
    pub(crate) fn commit_eax_effects(&self) -> Result {
        let mut state = self.eax.lock();
        if state.slots.is_empty() {
            return Ok(());
        }

        let _guard = self.share().lock_context()?;
        if state.effect_dirty {
            let reverb = state.reverb;
            for slot in &state.slots {
                reverb.apply_to_effect(slot.reverb_effect)?;
            }
            state.effect_dirty = false;
        }
        if state.chorus_dirty {
            let chorus = state.chorus;
            for slot in &state.slots {
                chorus.apply_to_effect(slot.chorus_effect)?;
            }
            state.chorus_dirty = false;
        }
        for slot in &state.slots {
            slot.commit()?;
        }
        Ok(())
    }
}
