//! The EAX reverb record and its translation to `AL_EFFECT_EAXREVERB`
//! parameters (§4.6 "Listener reverb (EAX 2/3)").

use crate::{
    backend::effect::EffectId,
    macros::al,
    utils::{clampf, gain_to_mb, mb_to_gain},
    Result,
};

/// Which fields [`Reverb::set_environment_size`] rescales, taken from
/// `dwFlags`' low eight bits (`eax.h`'s `EAXREVERBFLAGS_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RescaleFlags(u32);

impl RescaleFlags {
    pub const DECAY_TIME_SCALE: RescaleFlags = RescaleFlags(1 << 0);
    pub const REFLECTIONS_SCALE: RescaleFlags = RescaleFlags(1 << 1);
    pub const REFLECTIONS_DELAY_SCALE: RescaleFlags = RescaleFlags(1 << 2);
    pub const REVERB_SCALE: RescaleFlags = RescaleFlags(1 << 3);
    pub const REVERB_DELAY_SCALE: RescaleFlags = RescaleFlags(1 << 4);
    pub const DECAY_HF_LIMIT: RescaleFlags = RescaleFlags(1 << 5);
    pub const ECHO_TIME_SCALE: RescaleFlags = RescaleFlags(1 << 6);
    pub const MOD_TIME_SCALE: RescaleFlags = RescaleFlags(1 << 7);

    pub const fn from_bits(bits: u32) -> Self {
        RescaleFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// `EAX30LISTENERPROPERTIES`, kept in the units the original uses (millibels
/// for gain fields, seconds for time fields) so the preset table below can
/// be transcribed directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reverb {
    pub environment: u32,
    pub environment_size: f32,
    pub environment_diffusion: f32,
    pub room: i32,
    pub room_hf: i32,
    pub room_lf: i32,
    pub decay_time: f32,
    pub decay_hf_ratio: f32,
    pub decay_lf_ratio: f32,
    pub reflections: i32,
    pub reflections_delay: f32,
    pub reflections_pan: [f32; 3],
    pub reverb: i32,
    pub reverb_delay: f32,
    pub reverb_pan: [f32; 3],
    pub echo_time: f32,
    pub echo_depth: f32,
    pub modulation_time: f32,
    pub modulation_depth: f32,
    pub air_absorption_hf: f32,
    pub hf_reference: f32,
    pub lf_reference: f32,
    pub room_rolloff_factor: f32,
    pub flags: RescaleFlags,
}

const MIN_DECAY_TIME: f32 = 0.1;
const MAX_DECAY_TIME: f32 = 20.0;
const MIN_REVERB_DELAY: f32 = 0.0;
const MAX_REVERB_DELAY: f32 = 0.1;
const MIN_REFLECTIONS_DELAY: f32 = 0.0;
const MAX_REFLECTIONS_DELAY: f32 = 0.3;

impl Reverb {
    /// `EAXLISTENER_ENVIRONMENTSIZE`: rescale every flagged field to track a
    /// new room size, following `RescaleEnvSize` (`eax.c`): fields whose
    /// scale flag is set move proportionally to `new_size / environment_size`
    /// (clamped to the field's legal range), a few specific fields use
    /// `sqrt` of that ratio instead of a linear one, and `environment_size`
    /// itself is simply replaced.
    pub fn set_environment_size(&mut self, new_size: f32) {
        let new_size = clampf(new_size, 1.0, 100.0);
        if new_size == self.environment_size {
            return;
        }
        let ratio = new_size / self.environment_size;

        if self.flags.contains(RescaleFlags::REFLECTIONS_SCALE) {
            self.reflections -= gain_to_mb(ratio).round() as i32;
            self.reflections = self.reflections.clamp(-10000, 1000);
        }
        if self.flags.contains(RescaleFlags::REFLECTIONS_DELAY_SCALE) {
            self.reflections_delay =
                clampf(self.reflections_delay * ratio, MIN_REFLECTIONS_DELAY, MAX_REFLECTIONS_DELAY);
        }
        if self.flags.contains(RescaleFlags::REVERB_SCALE) {
            // Compensate for the initial decay staying put when its own scale flag is off.
            let compensation = if self.flags.contains(RescaleFlags::DECAY_TIME_SCALE) { 1.0 } else { 1.5 };
            self.reverb -= (gain_to_mb(ratio) * compensation).round() as i32;
            self.reverb = self.reverb.clamp(-10000, 2000);
        }
        if self.flags.contains(RescaleFlags::REVERB_DELAY_SCALE) {
            self.reverb_delay = clampf(self.reverb_delay * ratio, MIN_REVERB_DELAY, MAX_REVERB_DELAY);
        }
        if self.flags.contains(RescaleFlags::DECAY_TIME_SCALE) {
            self.decay_time = clampf(self.decay_time * ratio, MIN_DECAY_TIME, MAX_DECAY_TIME);
        }
        if self.flags.contains(RescaleFlags::ECHO_TIME_SCALE) {
            self.echo_time = clampf(self.echo_time * ratio, 0.075, 0.25);
        }
        if self.flags.contains(RescaleFlags::MOD_TIME_SCALE) {
            self.modulation_time = clampf(self.modulation_time * ratio, 0.04, 4.0);
        }
        self.environment_size = new_size;
    }

    /// Write every `AL_EAXREVERB_*` parameter to `effect`, applying the
    /// clamps the original imposes at the EFX boundary (§4.6 "EFX parameter
    /// map").
    pub fn apply_to_effect(&self, effect: EffectId) -> Result {
        use al_sys::*;
        let density = clampf((self.environment_size.powi(3)) / 16.0, 0.0, 1.0);

        al!(alEffecti(effect.0, AL_EFFECT_TYPE as ALenum, AL_EFFECT_EAXREVERB as ALint))?;
        crate::backend::effect::set_effect_f(effect, AL_EAXREVERB_DENSITY as ALenum, density)?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_DIFFUSION as ALenum,
            clampf(self.environment_diffusion, 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_GAIN as ALenum,
            clampf(mb_to_gain(self.room as f32), 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_GAINHF as ALenum,
            clampf(mb_to_gain(self.room_hf as f32), 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_GAINLF as ALenum,
            clampf(mb_to_gain(self.room_lf as f32), 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_DECAY_TIME as ALenum,
            clampf(self.decay_time, MIN_DECAY_TIME, MAX_DECAY_TIME),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_DECAY_HFRATIO as ALenum,
            clampf(self.decay_hf_ratio, 0.1, 2.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_DECAY_LFRATIO as ALenum,
            clampf(self.decay_lf_ratio, 0.1, 2.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_REFLECTIONS_GAIN as ALenum,
            clampf(mb_to_gain(self.reflections as f32), 0.0, 3.16),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_REFLECTIONS_DELAY as ALenum,
            clampf(self.reflections_delay, MIN_REFLECTIONS_DELAY, MAX_REFLECTIONS_DELAY),
        )?;
        crate::backend::effect::set_effect_3f(
            effect,
            AL_EAXREVERB_REFLECTIONS_PAN as ALenum,
            self.reflections_pan,
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_LATE_REVERB_GAIN as ALenum,
            clampf(mb_to_gain(self.reverb as f32), 0.0, 10.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_LATE_REVERB_DELAY as ALenum,
            clampf(self.reverb_delay, MIN_REVERB_DELAY, MAX_REVERB_DELAY),
        )?;
        crate::backend::effect::set_effect_3f(
            effect,
            AL_EAXREVERB_LATE_REVERB_PAN as ALenum,
            self.reverb_pan,
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_ECHO_TIME as ALenum,
            clampf(self.echo_time, 0.075, 0.25),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_ECHO_DEPTH as ALenum,
            clampf(self.echo_depth, 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_MODULATION_TIME as ALenum,
            clampf(self.modulation_time, 0.04, 4.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_MODULATION_DEPTH as ALenum,
            clampf(self.modulation_depth, 0.0, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_AIR_ABSORPTION_GAINHF as ALenum,
            clampf(mb_to_gain(self.air_absorption_hf), 0.892, 1.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_HFREFERENCE as ALenum,
            clampf(self.hf_reference, 1000.0, 20000.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_LFREFERENCE as ALenum,
            clampf(self.lf_reference, 20.0, 1000.0),
        )?;
        crate::backend::effect::set_effect_f(
            effect,
            AL_EAXREVERB_ROOM_ROLLOFF_FACTOR as ALenum,
            clampf(self.room_rolloff_factor, 0.0, 10.0),
        )?;
        crate::backend::effect::set_effect_i(
            effect,
            AL_EAXREVERB_DECAY_HFLIMIT as ALenum,
            self.flags.contains(RescaleFlags::DECAY_HF_LIMIT) as ALint,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eax::presets::PRESETS;

    #[test]
    fn rescale_doubling_size_keeps_fields_in_range() {
        let mut r = PRESETS[0];
        r.set_environment_size(r.environment_size * 2.0);
        assert!(r.decay_time >= MIN_DECAY_TIME && r.decay_time <= MAX_DECAY_TIME);
        assert!(r.reverb_delay >= MIN_REVERB_DELAY && r.reverb_delay <= MAX_REVERB_DELAY);
    }

    #[test]
    fn rescale_to_same_size_is_noop() {
        let mut r = PRESETS[3];
        let before = r;
        r.set_environment_size(before.environment_size);
        assert_eq!(r, before);
    }
}
