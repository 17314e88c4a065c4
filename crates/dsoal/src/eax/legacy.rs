//! EAX1 translation and EAX2↔EAX3 field-subset translation (§4.6 "EAX 1
//! translation", "EAX 2→3 and 3→2 translation"), plus the chorus effect
//! properties DSOAL routes alongside reverb (§2 "Supplemented features").

use crate::{
    eax::{
        presets::PRESETS,
        reverb::{RescaleFlags, Reverb},
        source_filter::SourceFilter,
    },
    utils::{clampf, gain_to_mb, mb_to_gain},
};

/// `EAX10LISTENERPROPERTIES`: environment, volume, decay time, damping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eax1Listener {
    pub environment: u32,
    pub volume: f32,
    pub decay_time: f32,
    /// Stored and returned verbatim; never applied to the backend — there
    /// is no EFX parameter it maps to (Open Question #1).
    pub damping: f32,
}

impl Default for Eax1Listener {
    fn default() -> Self {
        Eax1Listener { environment: 0, volume: 1.0, decay_time: 1.49, damping: 0.0 }
    }
}

fn preset_for(environment: u32) -> &'static Reverb {
    &PRESETS[(environment as usize).min(PRESETS.len() - 1)]
}

impl Eax1Listener {
    /// Load `self.environment`'s preset and overlay the two fields EAX1
    /// actually controls: `decay_time` replaces the preset's verbatim, and
    /// `volume` becomes a millibel offset against the preset's own room
    /// gain (§4.6 "EAX 1 translation").
    pub fn to_reverb(&self) -> Reverb {
        let mut reverb = *preset_for(self.environment);
        reverb.decay_time = clampf(self.decay_time, 0.1, 20.0);
        let offset = gain_to_mb(self.volume.max(1e-6));
        reverb.room = (reverb.room + offset as i32).clamp(-10000, 0);
        reverb
    }
}

/// `EAX10BUFFERPROPERTIES`: a single send-path mix level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eax1Buffer {
    pub reverb_mix: f32,
}

impl Default for Eax1Buffer {
    fn default() -> Self {
        Eax1Buffer { reverb_mix: 1.0 }
    }
}

impl Eax1Buffer {
    pub fn apply_to_source_filter(&self, filter: &mut SourceFilter) {
        filter.eax1_reverb_mix = Some(self.reverb_mix);
    }
}

/// `EAX_CHORUS_*` waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChorusWaveform {
    Sine,
    #[default]
    Triangle,
}

/// `EAXCHORUSPROPERTIES`, the effect DSOAL routes to a secondary EFX slot
/// alongside reverb (`original_source/chorus.c`; supplemented per the
/// expanded spec's ambient EAX2/3 surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chorus {
    pub waveform: ChorusWaveform,
    pub phase: i32,
    pub rate: f32,
    pub depth: f32,
    pub feedback: f32,
    pub delay: f32,
}

impl Default for Chorus {
    fn default() -> Self {
        // CHORUS_PRESET_DEFAULT.
        Chorus { waveform: ChorusWaveform::Triangle, phase: 90, rate: 1.1, depth: 0.1, feedback: 0.25, delay: 0.016 }
    }
}

impl Chorus {
    pub fn apply_to_effect(&self, effect: crate::backend::effect::EffectId) -> crate::Result {
        use crate::backend::effect::{set_effect_f, set_effect_i, set_effect_type};
        set_effect_type(effect, al_sys::AL_EFFECT_CHORUS as al_sys::ALenum)?;
        set_effect_i(
            effect,
            al_sys::AL_CHORUS_WAVEFORM as al_sys::ALenum,
            match self.waveform {
                ChorusWaveform::Sine => al_sys::AL_CHORUS_WAVEFORM_SINUSOID as i32,
                ChorusWaveform::Triangle => al_sys::AL_CHORUS_WAVEFORM_TRIANGLE as i32,
            },
        )?;
        set_effect_i(effect, al_sys::AL_CHORUS_PHASE as al_sys::ALenum, self.phase.clamp(-180, 180))?;
        set_effect_f(effect, al_sys::AL_CHORUS_RATE as al_sys::ALenum, clampf(self.rate, 0.0, 10.0))?;
        set_effect_f(effect, al_sys::AL_CHORUS_DEPTH as al_sys::ALenum, clampf(self.depth, 0.0, 1.0))?;
        set_effect_f(effect, al_sys::AL_CHORUS_FEEDBACK as al_sys::ALenum, clampf(self.feedback, -1.0, 1.0))?;
        set_effect_f(effect, al_sys::AL_CHORUS_DELAY as al_sys::ALenum, clampf(self.delay, 0.0, 0.016))?;
        Ok(())
    }
}

/// EAX2 uses only the low six scale/limit bits of `dwFlags`.
pub const EAX2_FLAGS_MASK: u32 = 0x3f;

/// EAX2 listener properties: a strict field subset of EAX3
/// (`EAX20LISTENERPROPERTIES`, §4.6 "EAX 2→3 and 3→2 translation").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eax2Listener {
    pub room: i32,
    pub room_hf: i32,
    pub room_rolloff_factor: f32,
    pub decay_time: f32,
    pub decay_hf_ratio: f32,
    pub reflections: i32,
    pub reflections_delay: f32,
    pub reverb: i32,
    pub reverb_delay: f32,
    pub environment: u32,
    pub environment_size: f32,
    pub environment_diffusion: f32,
    pub air_absorption_hf: f32,
    pub flags: u32,
}

impl Eax2Listener {
    pub fn from_reverb(r: &Reverb) -> Self {
        Eax2Listener {
            room: r.room,
            room_hf: r.room_hf,
            room_rolloff_factor: r.room_rolloff_factor,
            decay_time: r.decay_time,
            decay_hf_ratio: r.decay_hf_ratio,
            reflections: r.reflections,
            reflections_delay: r.reflections_delay,
            reverb: r.reverb,
            reverb_delay: r.reverb_delay,
            environment: r.environment,
            environment_size: r.environment_size,
            environment_diffusion: r.environment_diffusion,
            air_absorption_hf: r.air_absorption_hf,
            flags: r.flags.bits() & EAX2_FLAGS_MASK,
        }
    }

    /// Project this EAX2 record onto `r`, leaving every EAX3-only field
    /// (`room_lf`, `decay_lf_ratio`, pan vectors, echo/modulation, HF/LF
    /// reference, `DECAY_HF_LIMIT`) untouched.
    pub fn apply_to_reverb(&self, r: &mut Reverb) {
        r.room = self.room;
        r.room_hf = self.room_hf;
        r.room_rolloff_factor = self.room_rolloff_factor;
        r.decay_time = self.decay_time;
        r.decay_hf_ratio = self.decay_hf_ratio;
        r.reflections = self.reflections;
        r.reflections_delay = self.reflections_delay;
        r.reverb = self.reverb;
        r.reverb_delay = self.reverb_delay;
        r.environment = self.environment;
        r.environment_size = self.environment_size;
        r.environment_diffusion = self.environment_diffusion;
        r.air_absorption_hf = self.air_absorption_hf;
        r.flags =
            RescaleFlags::from_bits((r.flags.bits() & !EAX2_FLAGS_MASK) | (self.flags & EAX2_FLAGS_MASK));
    }
}

/// EAX2 buffer properties: the pre-EAX3 occlusion/obstruction subset (no
/// `flOcclusionDirectRatio`, no exclusion terms — `EAX20BUFFERPROPERTIES`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eax2Buffer {
    pub direct: i32,
    pub direct_hf: i32,
    pub room: i32,
    pub room_hf: i32,
    pub room_rolloff_factor: f32,
    pub obstruction: i32,
    pub obstruction_lf_ratio: f32,
    pub occlusion: i32,
    pub occlusion_lf_ratio: f32,
    pub occlusion_room_ratio: f32,
    pub outside_volume_hf: i32,
    pub air_absorption_factor: f32,
    pub flags: u32,
}

/// EAX2 buffer flags occupy the low three bits only.
pub const EAX2_BUFFER_FLAGS_MASK: u32 = 0x7;

impl Eax2Buffer {
    pub fn from_source_filter(f: &SourceFilter, flags: u32) -> Self {
        Eax2Buffer {
            direct: f.direct,
            direct_hf: f.direct_hf,
            room: f.room,
            room_hf: f.room_hf,
            room_rolloff_factor: f.room_rolloff_factor,
            obstruction: f.obstruction,
            obstruction_lf_ratio: f.obstruction_lf_ratio,
            occlusion: f.occlusion,
            occlusion_lf_ratio: f.occlusion_lf_ratio,
            occlusion_room_ratio: f.occlusion_room_ratio,
            outside_volume_hf: f.outside_volume_hf,
            air_absorption_factor: f.air_absorption_factor,
            flags: flags & EAX2_BUFFER_FLAGS_MASK,
        }
    }

    /// `EAX3BufferOcclusion`/`EAX3BufferObstruction`-style projection: the
    /// EAX3-only `occlusion_direct_ratio` and exclusion fields are left at
    /// whatever `filter` already had.
    pub fn apply_to_source_filter(&self, filter: &mut SourceFilter) {
        filter.direct = self.direct;
        filter.direct_hf = self.direct_hf;
        filter.room = self.room;
        filter.room_hf = self.room_hf;
        filter.room_rolloff_factor = self.room_rolloff_factor;
        filter.obstruction = self.obstruction;
        filter.obstruction_lf_ratio = self.obstruction_lf_ratio;
        filter.occlusion = self.occlusion;
        filter.occlusion_lf_ratio = self.occlusion_lf_ratio;
        filter.occlusion_room_ratio = self.occlusion_room_ratio;
        filter.outside_volume_hf = self.outside_volume_hf;
        filter.air_absorption_factor = self.air_absorption_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eax1_unity_volume_keeps_preset_room() {
        let listener = Eax1Listener { environment: 0, volume: 1.0, ..Eax1Listener::default() };
        let reverb = listener.to_reverb();
        assert_eq!(reverb.room, PRESETS[0].room);
    }

    #[test]
    fn eax2_round_trip_preserves_shared_fields() {
        let mut reverb = PRESETS[5];
        let original = reverb;
        let eax2 = Eax2Listener::from_reverb(&reverb);
        reverb.room = 0;
        eax2.apply_to_reverb(&mut reverb);
        assert_eq!(reverb.room, original.room);
        assert_eq!(reverb.reflections, original.reflections);
    }

    #[test]
    fn eax2_buffer_round_trip() {
        let mut filter = SourceFilter { occlusion: -500, ..SourceFilter::default() };
        let eax2 = Eax2Buffer::from_source_filter(&filter, 0);
        filter.occlusion = 0;
        eax2.apply_to_source_filter(&mut filter);
        assert_eq!(filter.occlusion, -500);
    }

    #[test]
    fn mb_to_gain_matches_reference_point() {
        assert!((mb_to_gain(0.0) - 1.0).abs() < 1e-6);
    }
}
