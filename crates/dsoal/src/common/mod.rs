//! Shared value types used across the translation layer: 3D vectors, wave
//! format descriptors, and speaker configuration.

mod format;

pub use format::{validate_wave_format, ChannelMask, SubFormat, WaveFormat};

use smart_default::SmartDefault;

/// A position, velocity, or direction in 3D space.
///
/// DirectSound is left-handed; the OpenAL backend is right-handed. Values
/// stored here are always in DirectSound's coordinate system — the Z-axis
/// flip happens at the backend boundary (see [`crate::backend::listener`]
/// and [`crate::buffer::spatialization`]), never in application-facing
/// getters/setters.
#[derive(Debug, Clone, Copy, PartialEq, SmartDefault)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }

    /// Flip the Z axis, translating between DirectSound's left-handed and
    /// the backend's right-handed coordinate system. Self-inverse.
    pub const fn flip_z(self) -> Self {
        Vector3 { x: self.x, y: self.y, z: -self.z }
    }

    pub(crate) fn as_al(self) -> [f32; 3] {
        let f = self.flip_z();
        [f.x, f.y, f.z]
    }

    pub(crate) fn from_al(v: [f32; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2]).flip_z()
    }
}

/// A `DSSPEAKER`-style speaker configuration: a geometry nibble and a config
/// nibble packed into one `u32`, matching the on-the-wire DirectSound value
/// so it can be persisted verbatim (see [`crate::config`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerConfig {
    pub geometry: u8,
    pub config: SpeakerGeometry,
}

/// The `DSSPEAKER_*` speaker layout enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpeakerGeometry {
    Mono = 1,
    Stereo = 2,
    Quad = 3,
    Surround = 4,
    Direct = 5,
    FivePointOne = 6,
    SevenPointOne = 7,
    FivePointOneSurround = 8,
    SevenPointOneSurround = 9,
}

impl SpeakerConfig {
    pub const DEFAULT_GEOMETRY: u8 = 20;

    pub fn to_dword(self) -> u32 {
        (self.geometry as u32) << 16 | (self.config as u32)
    }

    pub fn from_dword(dword: u32) -> Option<Self> {
        let config = match dword & 0xffff {
            1 => SpeakerGeometry::Mono,
            2 => SpeakerGeometry::Stereo,
            3 => SpeakerGeometry::Quad,
            4 => SpeakerGeometry::Surround,
            5 => SpeakerGeometry::Direct,
            6 => SpeakerGeometry::FivePointOne,
            7 => SpeakerGeometry::SevenPointOne,
            8 => SpeakerGeometry::FivePointOneSurround,
            9 => SpeakerGeometry::SevenPointOneSurround,
            _ => return None,
        };
        Some(SpeakerConfig { geometry: (dword >> 16) as u8, config })
    }
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        SpeakerConfig { geometry: Self::DEFAULT_GEOMETRY, config: SpeakerGeometry::Stereo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_flip_is_self_inverse() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v.flip_z().flip_z(), v);
    }

    #[test]
    fn al_round_trip_flips_z_twice_cancels() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let al = v.as_al();
        assert_eq!(al, [1.0, 2.0, -3.0]);
        assert_eq!(Vector3::from_al(al), v);
    }

    #[test]
    fn speaker_config_dword_round_trip() {
        let cfg = SpeakerConfig { geometry: 20, config: SpeakerGeometry::FivePointOne };
        let dword = cfg.to_dword();
        assert_eq!(SpeakerConfig::from_dword(dword), Some(cfg));
    }

    proptest::proptest! {
        /// Flipping Z twice is the identity for any finite vector.
        #[test]
        fn z_flip_is_self_inverse_prop(x in -1e6f32..1e6, y in -1e6f32..1e6, z in -1e6f32..1e6) {
            let v = Vector3::new(x, y, z);
            proptest::prop_assert_eq!(v.flip_z().flip_z(), v);
        }
    }
}
