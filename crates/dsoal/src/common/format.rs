//! Wave format validation and backend-format selection (§4.3 step 1-3).

use crate::{
    backend::caps::Extensions,
    macros::yeet,
    {Error, Result},
};

/// Minimum legal `DSBUFFERDESC::dwBufferBytes`, per the DirectSound contract.
pub const DSBSIZE_MIN: u32 = 4;
/// Maximum legal `DSBUFFERDESC::dwBufferBytes`.
pub const DSBSIZE_MAX: u32 = 0x0fff_ffff;

/// `WAVE_FORMAT_PCM`/`WAVE_FORMAT_IEEE_FLOAT`/`WAVE_FORMAT_EXTENSIBLE`'s
/// resolved sub-format, after unwrapping `WAVEFORMATEXTENSIBLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubFormat {
    Pcm,
    IeeeFloat,
}

/// The subset of `SPEAKER_*` channel masks dsoal understands, matching the
/// masks the backend has named multi-channel formats for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMask {
    Mono,
    Stereo,
    Rear,
    Quad,
    FiveDotOne,
    SixDotOne,
    SevenDotOne,
}

const SPEAKER_FRONT_LEFT: u32 = 0x1;
const SPEAKER_FRONT_RIGHT: u32 = 0x2;
const SPEAKER_FRONT_CENTER: u32 = 0x4;
const SPEAKER_LOW_FREQUENCY: u32 = 0x8;
const SPEAKER_BACK_LEFT: u32 = 0x10;
const SPEAKER_BACK_RIGHT: u32 = 0x20;
const SPEAKER_BACK_CENTER: u32 = 0x100;
const SPEAKER_SIDE_LEFT: u32 = 0x200;
const SPEAKER_SIDE_RIGHT: u32 = 0x400;

const MONO_MASK: u32 = SPEAKER_FRONT_CENTER;
const STEREO_MASK: u32 = SPEAKER_FRONT_LEFT | SPEAKER_FRONT_RIGHT;
const REAR_MASK: u32 = SPEAKER_BACK_LEFT | SPEAKER_BACK_RIGHT;
const QUAD_MASK: u32 = SPEAKER_FRONT_LEFT | SPEAKER_FRONT_RIGHT | SPEAKER_BACK_LEFT | SPEAKER_BACK_RIGHT;
const X5DOT1_MASK: u32 = SPEAKER_FRONT_LEFT
    | SPEAKER_FRONT_RIGHT
    | SPEAKER_FRONT_CENTER
    | SPEAKER_LOW_FREQUENCY
    | SPEAKER_BACK_LEFT
    | SPEAKER_BACK_RIGHT;
const X6DOT1_MASK: u32 = SPEAKER_FRONT_LEFT
    | SPEAKER_FRONT_RIGHT
    | SPEAKER_FRONT_CENTER
    | SPEAKER_LOW_FREQUENCY
    | SPEAKER_BACK_CENTER
    | SPEAKER_SIDE_LEFT
    | SPEAKER_SIDE_RIGHT;
const X7DOT1_MASK: u32 = SPEAKER_FRONT_LEFT
    | SPEAKER_FRONT_RIGHT
    | SPEAKER_FRONT_CENTER
    | SPEAKER_LOW_FREQUENCY
    | SPEAKER_BACK_LEFT
    | SPEAKER_BACK_RIGHT
    | SPEAKER_SIDE_LEFT
    | SPEAKER_SIDE_RIGHT;

impl ChannelMask {
    pub fn from_dword(mask: u32) -> Option<Self> {
        Some(match mask {
            MONO_MASK => ChannelMask::Mono,
            STEREO_MASK => ChannelMask::Stereo,
            REAR_MASK => ChannelMask::Rear,
            QUAD_MASK => ChannelMask::Quad,
            X5DOT1_MASK => ChannelMask::FiveDotOne,
            X6DOT1_MASK => ChannelMask::SixDotOne,
            X7DOT1_MASK => ChannelMask::SevenDotOne,
            _ => return None,
        })
    }

    pub fn channel_count(self) -> u16 {
        match self {
            ChannelMask::Mono => 1,
            ChannelMask::Stereo | ChannelMask::Rear => 2,
            ChannelMask::Quad => 4,
            ChannelMask::FiveDotOne => 6,
            ChannelMask::SixDotOne => 7,
            ChannelMask::SevenDotOne => 8,
        }
    }

    fn from_channel_count(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(ChannelMask::Mono),
            2 => Some(ChannelMask::Stereo),
            4 => Some(ChannelMask::Quad),
            6 => Some(ChannelMask::FiveDotOne),
            7 => Some(ChannelMask::SixDotOne),
            8 => Some(ChannelMask::SevenDotOne),
            _ => None,
        }
    }
}

/// A validated, resolved wave format descriptor: the DirectSound-visible
/// fields plus the resolved [`SubFormat`]/[`ChannelMask`] needed to pick a
/// backend format enum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveFormat {
    pub channels: u16,
    pub samples_per_sec: u32,
    pub bits_per_sample: u16,
    pub block_align: u16,
    pub avg_bytes_per_sec: u32,
    pub sub_format: SubFormat,
    pub channel_mask: Option<ChannelMask>,
}

impl WaveFormat {
    pub fn new_pcm(channels: u16, samples_per_sec: u32, bits_per_sample: u16) -> Self {
        let block_align = channels * (bits_per_sample / 8);
        WaveFormat {
            channels,
            samples_per_sec,
            bits_per_sample,
            block_align,
            avg_bytes_per_sec: samples_per_sec * u32::from(block_align),
            sub_format: SubFormat::Pcm,
            channel_mask: ChannelMask::from_channel_count(channels),
        }
    }
}

/// Validate a raw wave format descriptor per §4.3 step 1-2, and resolve it
/// to a backend AL format enum per step 3.
///
/// `extensible` carries `(valid_bits_per_sample, channel_mask, is_float)`
/// when the format tag was `WAVE_FORMAT_EXTENSIBLE`; `None` for a plain
/// `WAVE_FORMAT_PCM`/`WAVE_FORMAT_IEEE_FLOAT` format.
pub fn validate_wave_format(
    fmt: &WaveFormat,
    extensible: Option<(u16, u32)>,
    caps: Extensions,
) -> Result<&'static str> {
    if fmt.block_align == 0 {
        yeet!(Error::InvalidParam);
    }
    if fmt.channels == 0 {
        yeet!(Error::InvalidParam);
    }
    if fmt.bits_per_sample == 24 {
        // 24-bit PCM byte offsets cannot be made byte-exact with the backend.
        yeet!(Error::BadFormat);
    }

    let channel_mask = if let Some((valid_bits, mask)) = extensible {
        if valid_bits != fmt.bits_per_sample {
            yeet!(Error::BadFormat);
        }
        match ChannelMask::from_dword(mask) {
            Some(m) if m.channel_count() == fmt.channels => m,
            _ => yeet!(Error::BadFormat),
        }
    } else {
        match fmt.channel_mask {
            Some(m) => m,
            None => yeet!(Error::BadFormat),
        }
    };

    let is_multichannel = !matches!(channel_mask, ChannelMask::Mono | ChannelMask::Stereo);
    if is_multichannel && !caps.contains(Extensions::MULTI_CHANNEL) {
        yeet!(Error::BadFormat);
    }

    match fmt.sub_format {
        SubFormat::Pcm => backend_pcm_format_name(channel_mask, fmt.bits_per_sample),
        SubFormat::IeeeFloat => {
            if !caps.contains(Extensions::FLOAT32) {
                yeet!(Error::BadFormat);
            }
            backend_float_format_name(channel_mask, fmt.bits_per_sample)
        },
    }
}

/// Name of the `AL_FORMAT_*` enum for a PCM buffer, resolved at runtime via
/// `alGetEnumValue` (see [`crate::backend::buffer::resolve_format`]) rather
/// than a compile-time constant: multi-channel formats are defined by the
/// `AL_EXT_MCFORMATS` extension and are not guaranteed to exist in every
/// `al-sys` build, exactly as the original implementation resolves them by
/// name rather than linking against them directly.
fn backend_pcm_format_name(mask: ChannelMask, bits: u16) -> Result<&'static str> {
    Ok(match (mask, bits) {
        (ChannelMask::Mono, 8) => "AL_FORMAT_MONO8",
        (ChannelMask::Mono, 16) => "AL_FORMAT_MONO16",
        (ChannelMask::Stereo, 8) => "AL_FORMAT_STEREO8",
        (ChannelMask::Stereo, 16) => "AL_FORMAT_STEREO16",
        (ChannelMask::Rear, 8) => "AL_FORMAT_REAR8",
        (ChannelMask::Rear, 16) => "AL_FORMAT_REAR16",
        (ChannelMask::Quad, 8) => "AL_FORMAT_QUAD8",
        (ChannelMask::Quad, 16) => "AL_FORMAT_QUAD16",
        (ChannelMask::FiveDotOne, 8) => "AL_FORMAT_51CHN8",
        (ChannelMask::FiveDotOne, 16) => "AL_FORMAT_51CHN16",
        (ChannelMask::SixDotOne, 8) => "AL_FORMAT_61CHN8",
        (ChannelMask::SixDotOne, 16) => "AL_FORMAT_61CHN16",
        (ChannelMask::SevenDotOne, 8) => "AL_FORMAT_71CHN8",
        (ChannelMask::SevenDotOne, 16) => "AL_FORMAT_71CHN16",
        _ => yeet!(Error::BadFormat),
    })
}

fn backend_float_format_name(mask: ChannelMask, bits: u16) -> Result<&'static str> {
    if bits != 32 {
        yeet!(Error::BadFormat);
    }
    Ok(match mask {
        ChannelMask::Mono => "AL_FORMAT_MONO_FLOAT32",
        ChannelMask::Stereo => "AL_FORMAT_STEREO_FLOAT32",
        ChannelMask::Quad => "AL_FORMAT_QUAD32",
        ChannelMask::FiveDotOne => "AL_FORMAT_51CHN32",
        ChannelMask::SixDotOne => "AL_FORMAT_61CHN32",
        ChannelMask::SevenDotOne => "AL_FORMAT_71CHN32",
        ChannelMask::Rear => "AL_FORMAT_REAR32",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_block_align_is_invalid_param() {
        let mut fmt = WaveFormat::new_pcm(2, 44100, 16);
        fmt.block_align = 0;
        let err = validate_wave_format(&fmt, None, Extensions::empty()).unwrap_err();
        assert_eq!(err, Error::InvalidParam);
    }

    #[test]
    fn pcm_24_bit_is_rejected() {
        let fmt = WaveFormat::new_pcm(2, 44100, 24);
        let err = validate_wave_format(&fmt, None, Extensions::empty()).unwrap_err();
        assert_eq!(err, Error::BadFormat);
    }

    #[test]
    fn mono_16_always_available() {
        let fmt = WaveFormat::new_pcm(1, 22050, 16);
        let result = validate_wave_format(&fmt, None, Extensions::empty());
        assert_eq!(result, Ok("AL_FORMAT_MONO16"));
    }

    #[test]
    fn multichannel_requires_extension() {
        let fmt = WaveFormat::new_pcm(6, 48000, 16);
        assert_eq!(
            validate_wave_format(&fmt, None, Extensions::empty()),
            Err(Error::BadFormat)
        );
        assert_eq!(
            validate_wave_format(&fmt, None, Extensions::MULTI_CHANNEL),
            Ok("AL_FORMAT_51CHN16")
        );
    }

    #[test]
    fn float_requires_extension() {
        let mut fmt = WaveFormat::new_pcm(2, 44100, 32);
        fmt.sub_format = SubFormat::IeeeFloat;
        assert_eq!(validate_wave_format(&fmt, None, Extensions::empty()), Err(Error::BadFormat));
        assert_eq!(
            validate_wave_format(&fmt, None, Extensions::FLOAT32),
            Ok("AL_FORMAT_STEREO_FLOAT32")
        );
    }

    #[test]
    fn extensible_padded_samples_rejected() {
        let fmt = WaveFormat::new_pcm(2, 44100, 16);
        let err =
            validate_wave_format(&fmt, Some((8, STEREO_MASK)), Extensions::empty()).unwrap_err();
        assert_eq!(err, Error::BadFormat);
    }

    #[test]
    fn extensible_mask_must_match_channel_count() {
        let fmt = WaveFormat::new_pcm(2, 44100, 16);
        let err =
            validate_wave_format(&fmt, Some((16, MONO_MASK)), Extensions::empty()).unwrap_err();
        assert_eq!(err, Error::BadFormat);
    }
}
