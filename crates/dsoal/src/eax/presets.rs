//! The 26 built-in `EAXLISTENER_ENVIRONMENT` reverb presets
//! (`eax-presets.h`'s `REVERB_PRESET_*` table), indexed by environment
//! number and looked up by [`super::reverb::Reverb::set_environment_size`]'s
//! callers when a listener or EAX1 record selects a new environment.

use super::reverb::{RescaleFlags, Reverb};

const SCALE_ALL: RescaleFlags = RescaleFlags::from_bits(0x3f);
const SCALE_NO_HF_LIMIT: RescaleFlags = RescaleFlags::from_bits(0x1f);

const fn preset(
    environment: u32,
    size: f32,
    diffusion: f32,
    room: i32,
    room_hf: i32,
    decay_time: f32,
    decay_hf_ratio: f32,
    reflections: i32,
    reflections_delay: f32,
    reverb: i32,
    reverb_delay: f32,
    echo_time: f32,
    echo_depth: f32,
    modulation_time: f32,
    modulation_depth: f32,
    flags: RescaleFlags,
) -> Reverb {
    Reverb {
        environment,
        environment_size: size,
        environment_diffusion: diffusion,
        room,
        room_hf,
        room_lf: 0,
        decay_time,
        decay_hf_ratio,
        decay_lf_ratio: 1.0,
        reflections,
        reflections_delay,
        reflections_pan: [0.0, 0.0, 0.0],
        reverb,
        reverb_delay,
        reverb_pan: [0.0, 0.0, 0.0],
        echo_time,
        echo_depth,
        modulation_time,
        modulation_depth,
        air_absorption_hf: -5.0,
        hf_reference: 5000.0,
        lf_reference: 250.0,
        room_rolloff_factor: 0.0,
        flags,
    }
}

/// Indexed exactly as `EAX_ENVIRONMENT_*`: `PRESETS[0]` is `GENERIC`,
/// `PRESETS[25]` is `PSYCHOTIC`.
pub const PRESETS: [Reverb; 26] = [
    preset(0, 7.5, 1.000, -1000, -100, 1.49, 0.83, -2602, 0.007, 200, 0.011, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(1, 1.4, 1.000, -1000, -6000, 0.17, 0.10, -1204, 0.001, 207, 0.002, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(2, 1.9, 1.000, -1000, -454, 0.40, 0.83, -1646, 0.002, 53, 0.003, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(3, 1.4, 1.000, -1000, -1200, 1.49, 0.54, -370, 0.007, 1030, 0.011, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(4, 2.5, 1.000, -1000, -6000, 0.50, 0.10, -1376, 0.003, -1104, 0.004, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(5, 11.6, 1.000, -1000, -300, 2.31, 0.64, -711, 0.012, 83, 0.017, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(6, 21.6, 1.000, -1000, -476, 4.32, 0.59, -789, 0.020, -289, 0.030, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(7, 19.6, 1.000, -1000, -500, 3.92, 0.70, -1230, 0.020, -2, 0.029, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(8, 14.6, 1.000, -1000, 0, 2.91, 1.30, -602, 0.015, -302, 0.022, 0.250, 0.000, 0.250, 0.000, SCALE_NO_HF_LIMIT),
    preset(9, 36.2, 1.000, -1000, -698, 7.24, 0.33, -1166, 0.020, 16, 0.030, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(10, 50.3, 1.000, -1000, -1000, 10.05, 0.23, -602, 0.020, 198, 0.030, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(11, 1.9, 1.000, -1000, -4000, 0.30, 0.10, -1831, 0.002, -1630, 0.030, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(12, 1.8, 1.000, -1000, -300, 1.49, 0.59, -1219, 0.007, 441, 0.011, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(13, 13.5, 1.000, -1000, -237, 2.70, 0.79, -1214, 0.013, 395, 0.020, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(14, 7.5, 0.300, -1000, -270, 1.49, 0.86, -1204, 0.007, -4, 0.011, 0.125, 0.950, 0.250, 0.000, SCALE_ALL),
    preset(15, 38.0, 0.300, -1000, -3300, 1.49, 0.54, -2560, 0.162, -229, 0.088, 0.125, 1.000, 0.250, 0.000, SCALE_ALL),
    preset(16, 7.5, 0.500, -1000, -800, 1.49, 0.67, -2273, 0.007, -1691, 0.011, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(17, 100.0, 0.270, -1000, -2500, 1.49, 0.21, -2780, 0.300, -1434, 0.100, 0.250, 1.000, 0.250, 0.000, SCALE_NO_HF_LIMIT),
    preset(18, 17.5, 1.000, -1000, -1000, 1.49, 0.83, -10000, 0.061, 500, 0.025, 0.125, 0.700, 0.250, 0.000, SCALE_ALL),
    preset(19, 42.5, 0.210, -1000, -2000, 1.49, 0.50, -2466, 0.179, -1926, 0.100, 0.250, 1.000, 0.250, 0.000, SCALE_ALL),
    preset(20, 8.3, 1.000, -1000, 0, 1.65, 1.50, -1363, 0.008, -1153, 0.012, 0.250, 0.000, 0.250, 0.000, SCALE_NO_HF_LIMIT),
    preset(21, 1.7, 0.800, -1000, -1000, 2.81, 0.14, 429, 0.014, 1023, 0.021, 0.250, 0.000, 0.250, 0.000, SCALE_ALL),
    preset(22, 1.8, 1.000, -1000, -4000, 1.49, 0.10, -449, 0.007, 1700, 0.011, 0.250, 0.000, 1.180, 0.348, SCALE_ALL),
    preset(23, 1.9, 0.500, -1000, 0, 8.39, 1.39, -115, 0.002, 985, 0.030, 0.250, 0.000, 0.250, 1.000, SCALE_NO_HF_LIMIT),
    preset(24, 1.8, 0.600, -1000, -400, 17.23, 0.56, -1713, 0.020, -613, 0.030, 0.250, 1.000, 0.810, 0.310, SCALE_NO_HF_LIMIT),
    preset(25, 1.0, 0.500, -1000, -151, 7.56, 0.91, -626, 0.020, 774, 0.030, 0.250, 0.000, 4.000, 1.000, SCALE_NO_HF_LIMIT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_indices_match_environment_numbers() {
        for (i, p) in PRESETS.iter().enumerate() {
            assert_eq!(p.environment, i as u32);
        }
    }

    #[test]
    fn underwater_has_modulation_depth() {
        assert!((PRESETS[22].modulation_depth - 0.348).abs() < 1e-6);
    }
}
