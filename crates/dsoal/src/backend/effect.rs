//! Raw EFX object management: effects, auxiliary effect slots, and filters.
//!
//! EFX entry points are not part of core AL and must be resolved with
//! `alGetProcAddress` once per context; [`EfxFns`] caches the pointers a
//! [`crate::share::DeviceShare`] needs and is constructed once at share
//! build time when [`crate::backend::Extensions::EFX`] is present.

use std::ffi::CString;

use crate::{
    macros::{al, raw},
    Error, Result,
};

raw! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct EffectId(pub(crate) al_sys::ALuint);
}
raw! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct AuxSlotId(pub(crate) al_sys::ALuint);
}
raw! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct FilterId(pub(crate) al_sys::ALuint);
}

pub(crate) fn gen_effect() -> Result<EffectId> {
    let mut id = 0;
    al!(al_sys::alGenEffects(1, &mut id))?;
    Ok(EffectId(id))
}

pub(crate) fn delete_effect(id: EffectId) -> Result {
    al!(al_sys::alDeleteEffects(1, &id.0))
}

pub(crate) fn set_effect_type(id: EffectId, ty: al_sys::ALenum) -> Result {
    al!(al_sys::alEffecti(id.0, al_sys::AL_EFFECT_TYPE as al_sys::ALenum, ty))
}

pub(crate) fn set_effect_f(id: EffectId, param: al_sys::ALenum, value: f32) -> Result {
    al!(al_sys::alEffectf(id.0, param, value))
}

pub(crate) fn set_effect_3f(id: EffectId, param: al_sys::ALenum, v: [f32; 3]) -> Result {
    al!(al_sys::alEffectfv(id.0, param, v.as_ptr()))
}

pub(crate) fn set_effect_i(id: EffectId, param: al_sys::ALenum, value: i32) -> Result {
    al!(al_sys::alEffecti(id.0, param, value))
}

pub(crate) fn gen_aux_slot() -> Result<AuxSlotId> {
    let mut id = 0;
    al!(al_sys::alGenAuxiliaryEffectSlots(1, &mut id))?;
    Ok(AuxSlotId(id))
}

pub(crate) fn delete_aux_slot(id: AuxSlotId) -> Result {
    al!(al_sys::alDeleteAuxiliaryEffectSlots(1, &id.0))
}

/// Bind `effect` to `slot`, replacing whatever was previously bound.
pub(crate) fn bind_effect(slot: AuxSlotId, effect: EffectId) -> Result {
    al!(al_sys::alAuxiliaryEffectSloti(
        slot.0,
        al_sys::AL_EFFECTSLOT_EFFECT as al_sys::ALenum,
        effect.0 as al_sys::ALint,
    ))
}

pub(crate) fn set_aux_slot_gain(slot: AuxSlotId, gain: f32) -> Result {
    al!(al_sys::alAuxiliaryEffectSlotf(slot.0, al_sys::AL_EFFECTSLOT_GAIN as al_sys::ALenum, gain))
}

pub(crate) fn gen_filter() -> Result<FilterId> {
    let mut id = 0;
    al!(al_sys::alGenFilters(1, &mut id))?;
    Ok(FilterId(id))
}

pub(crate) fn delete_filter(id: FilterId) -> Result {
    al!(al_sys::alDeleteFilters(1, &id.0))
}

/// Configure `id` as a lowpass filter with the given gain and high-frequency
/// gain, the only filter shape DSOAL's occlusion/obstruction/exclusion model
/// needs (§4.6).
pub(crate) fn set_lowpass(id: FilterId, gain: f32, gain_hf: f32) -> Result {
    al!(al_sys::alFilteri(
        id.0,
        al_sys::AL_FILTER_TYPE as al_sys::ALenum,
        al_sys::AL_FILTER_LOWPASS as al_sys::ALint,
    ))?;
    al!(al_sys::alFilterf(id.0, al_sys::AL_LOWPASS_GAIN as al_sys::ALenum, gain))?;
    al!(al_sys::alFilterf(id.0, al_sys::AL_LOWPASS_GAINHF as al_sys::ALenum, gain_hf))
}

fn extension_name(name: &'static str) -> Result<CString> {
    CString::new(name).map_err(|_| Error::Generic)
}

/// Confirm `ALC_EXT_EFX` is actually usable (present and the context was
/// created with the EFX attribute list), beyond the plain
/// `alcIsExtensionPresent` check in [`crate::backend::device::probe_extensions`].
pub(crate) fn is_available() -> bool {
    extension_name("ALC_EXT_EFX")
        .map(|name| unsafe { al_sys::alIsExtensionPresent(name.as_ptr()) == al_sys::AL_TRUE })
        .unwrap_or(false)
}
