//! The EAX property-set bridge (C6): stateless translation between
//! EAX 1/2/3/4 listener and buffer properties and EFX effect-slot
//! parameters (§4.6).
//!
//! Resolving a `IKsPropertySet::Set/Get` call's `GUID`/property-ID pair down
//! to a [`Version`] plus a typed value is a COM-marshalling concern that
//! sits above this crate; by the time [`primary::Primary`](crate::primary::Primary)
//! and [`buffer::Secondary`](crate::buffer::Secondary) methods in this module
//! tree are called, that resolution has already happened.

pub mod legacy;
pub mod presets;
pub mod reverb;
pub mod source_filter;

use crate::{
    backend::effect::{AuxSlotId, EffectId},
    Result,
};

/// Which EAX property-set version is in use. EAX2 and EAX3 share the same
/// reverb/filter math and differ only in which fields are exposed (masked
/// via [`legacy::Eax2Listener`]/[`legacy::Eax2Buffer`]); EAX1 and EAX4 are
/// distinct enough to need their own translation ([`legacy::Eax1Listener`]
/// and [`FxSlot`] respectively).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Eax1,
    Eax2,
    Eax3,
    Eax4,
}

/// Which effect, if any, a generic EAX4 FX slot is currently loaded with
/// (`EAXFXSLOT_LOADEFFECT`). EAX2/3's single implicit reverb slot behaves as
/// if it were permanently `Reverb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotEffect {
    #[default]
    Null,
    Reverb,
    Chorus,
}

/// One of the four generic auxiliary effect slots EAX4 exposes
/// (`original_source/eax4.c`'s `EAXFXSLOT_*` properties; supplemented per
/// the expanded spec). EAX2/3 route everything through `slots[0]`.
#[derive(Debug)]
pub struct FxSlot {
    pub effect_type: SlotEffect,
    pub volume_mb: i32,
    pub lock: bool,
    /// `EAXFXSLOTFLAGS_ENVIRONMENT`: whether this slot's reverb tracks the
    /// listener's active environment automatically.
    pub environment_follows_listener: bool,
    pub(crate) aux_slot: AuxSlotId,
    pub(crate) reverb_effect: EffectId,
    pub(crate) chorus_effect: EffectId,
}

impl FxSlot {
    pub(crate) fn new(aux_slot: AuxSlotId, reverb_effect: EffectId, chorus_effect: EffectId) -> Self {
        FxSlot {
            effect_type: SlotEffect::Null,
            volume_mb: 0,
            lock: false,
            environment_follows_listener: true,
            aux_slot,
            reverb_effect,
            chorus_effect,
        }
    }

    pub(crate) fn aux_slot(&self) -> AuxSlotId {
        self.aux_slot
    }

    /// Bind whichever effect object matches `self.effect_type` (or nothing,
    /// for `Null`) and push the slot gain, per `EAXFXSLOT_*`'s
    /// `LOADEFFECT`/`VOLUME` properties.
    pub(crate) fn commit(&self) -> Result {
        match self.effect_type {
            SlotEffect::Null => {},
            SlotEffect::Reverb => crate::backend::effect::bind_effect(self.aux_slot, self.reverb_effect)?,
            SlotEffect::Chorus => crate::backend::effect::bind_effect(self.aux_slot, self.chorus_effect)?,
        }
        crate::backend::effect::set_aux_slot_gain(self.aux_slot, crate::utils::mb_to_gain(self.volume_mb as f32))
    }
}
