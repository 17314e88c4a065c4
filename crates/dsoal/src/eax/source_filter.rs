//! Per-source occlusion/obstruction/exclusion translation to direct- and
//! send-path low-pass filters (§4.6 "Per-source (EAX 2/3)
//! occlusion/obstruction/exclusion"), grounded in `ApplyFilterParams`
//! (original_source/eax.c).

use crate::{
    backend::{
        effect::{AuxSlotId, FilterId},
        source::SourceId,
    },
    utils::{clampf, mb_to_gain},
    Result,
};

pub(crate) const APPLY_DRY: u8 = 1;
pub(crate) const APPLY_WET: u8 = 2;
pub(crate) const APPLY_BOTH: u8 = APPLY_DRY | APPLY_WET;

/// `EAX30BUFFERPROPERTIES`' occlusion/obstruction/exclusion subset, plus the
/// EAX1 `ReverbMix` this struct also carries when EAX1 is the active
/// property-set version (§4.6 "EAX 1 translation").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFilter {
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
    pub occlusion_direct_ratio: f32,
    pub exclusion: i32,
    pub exclusion_lf_ratio: f32,
    pub outside_volume_hf: i32,
    pub air_absorption_factor: f32,
    /// A single linear send-path mix, set only while EAX1 is active; when
    /// present it overrides the EAX2/3 occlusion/exclusion math for the wet
    /// path, since EAX1 has no LF split and no occlusion/exclusion terms.
    pub eax1_reverb_mix: Option<f32>,
}

impl Default for SourceFilter {
    fn default() -> Self {
        SourceFilter {
            direct: 0,
            direct_hf: 0,
            room: 0,
            room_hf: 0,
            room_rolloff_factor: 0.0,
            obstruction: 0,
            obstruction_lf_ratio: 0.0,
            occlusion: 0,
            // EAX3 SDK documented defaults for a freshly created buffer.
            occlusion_lf_ratio: 0.25,
            occlusion_room_ratio: 1.5,
            occlusion_direct_ratio: 1.0,
            exclusion: 0,
            exclusion_lf_ratio: 1.0,
            outside_volume_hf: 0,
            air_absorption_factor: 1.0,
            eax1_reverb_mix: None,
        }
    }
}

impl SourceFilter {
    fn occlusion_components(&self) -> (f32, f32) {
        let occl = self.occlusion as f32 * self.occlusion_lf_ratio;
        let occl_hf = self.occlusion as f32 * (1.0 - self.occlusion_lf_ratio);
        (occl, occl_hf)
    }

    /// Direct-path `(gain, gain_hf)`.
    fn dry_gains(&self) -> (f32, f32) {
        let (occl, occl_hf) = self.occlusion_components();
        let obstr = self.obstruction as f32 * self.obstruction_lf_ratio;
        let obstr_hf = self.obstruction as f32 * (1.0 - self.obstruction_lf_ratio);
        let mb = self.direct as f32 + obstr + self.occlusion_direct_ratio * occl;
        let mb_hf = self.direct_hf as f32 + obstr_hf + self.occlusion_direct_ratio * occl_hf;
        (clampf(mb_to_gain(mb), 0.0, 1.0), mb_to_gain(mb_hf))
    }

    /// Send-path `(gain, gain_hf)`.
    fn wet_gains(&self) -> (f32, f32) {
        if let Some(mix) = self.eax1_reverb_mix {
            return (clampf(mix, 0.0, 1.0), 1.0);
        }
        let (occl, occl_hf) = self.occlusion_components();
        let excl = self.exclusion as f32 * self.exclusion_lf_ratio;
        let excl_hf = self.exclusion as f32 * (1.0 - self.exclusion_lf_ratio);
        let mb = self.room as f32 + excl + self.occlusion_room_ratio * occl;
        let mb_hf = self.room_hf as f32 + excl_hf + self.occlusion_room_ratio * occl_hf;
        (clampf(mb_to_gain(mb), 0.0, 1.0), mb_to_gain(mb_hf))
    }

    /// Recompute and upload this source's direct and/or send filter gains
    /// (§4.6). `aux_slot` is the `(slot, send)` pair to route the wet path
    /// through; `None` when the buffer has no active FX slot.
    pub(crate) fn apply(
        &self,
        source: SourceId,
        direct_filter: FilterId,
        send_filter: FilterId,
        aux_slot: Option<(AuxSlotId, i32)>,
        apply: u8,
    ) -> Result {
        if apply & APPLY_DRY != 0 {
            let (gain, gain_hf) = self.dry_gains();
            crate::backend::effect::set_lowpass(direct_filter, gain, gain_hf)?;
            crate::backend::source::set_direct_filter(source, direct_filter.0)?;
        }
        if apply & APPLY_WET != 0 {
            let (gain, gain_hf) = self.wet_gains();
            crate::backend::effect::set_lowpass(send_filter, gain, gain_hf)?;
            if let Some((slot, send)) = aux_slot {
                crate::backend::source::set_aux_send(source, slot.0, send, send_filter.0)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_open() {
        let f = SourceFilter::default();
        let (gain, gain_hf) = f.dry_gains();
        assert_eq!(gain, 1.0);
        assert_eq!(gain_hf, 1.0);
    }

    #[test]
    fn full_occlusion_attenuates_direct_and_room() {
        let mut f = SourceFilter::default();
        f.occlusion = -10000;
        let (dry_gain, _) = f.dry_gains();
        let (wet_gain, _) = f.wet_gains();
        assert!(dry_gain < 0.5);
        assert!(wet_gain < 0.5);
    }

    #[test]
    fn eax1_reverb_mix_overrides_wet_path_only() {
        let mut f = SourceFilter::default();
        f.eax1_reverb_mix = Some(0.4);
        f.room = -10000;
        let (wet_gain, wet_hf) = f.wet_gains();
        assert!((wet_gain - 0.4).abs() < 1e-6);
        assert_eq!(wet_hf, 1.0);
    }
}
