//! Format / cooperative-level group (§4.5 "Format / cooperative",
//! §4.8 "SetCooperativeLevel"): the primary's format descriptor and the
//! write-emulation buffer that backs `Lock`/`Unlock` at `WRITEPRIMARY`.

use std::sync::Arc;

use crate::{
    buffer::{Caps, Secondary},
    common::WaveFormat,
    sampledata::{CreateFlags, SampleData},
    Error, Result,
};

use super::Primary;

/// `DSSCL_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CooperativeLevel {
    #[default]
    Normal,
    Priority,
    Exclusive,
    WritePrimary,
}

/// `DSBFREQUENCY_MIN`/`DSBFREQUENCY_MAX`, reused as the primary's own rate
/// clamp (§4.5 "rate clamped to [DSBFREQUENCY_MIN, DSBFREQUENCY_MAX]").
const RATE_MIN: u32 = 100;
const RATE_MAX: u32 = 200_000;

pub(crate) struct FormatState {
    pub(crate) format: WaveFormat,
    pub(crate) level: CooperativeLevel,
}

impl Default for FormatState {
    fn default() -> Self {
        FormatState { format: WaveFormat::new_pcm(2, 22050, 8), level: CooperativeLevel::Normal }
    }
}

impl Primary {
    pub fn format(&self) -> WaveFormat {
        self.format.lock().format
    }

    pub fn cooperative_level(&self) -> CooperativeLevel {
        self.format.lock().level
    }

    /// `SetFormat(fmt)`: legal only once the caller holds at least
    /// `DSSCL_PRIORITY`; sanitizes the rate and bit depth and reconfigures
    /// the write-emulation buffer, if one is live, to match.
    pub fn set_format(&self, mut fmt: WaveFormat) -> Result {
        if self.format.lock().level < CooperativeLevel::Priority {
            return Err(Error::PrioLevelNeeded);
        }
        if !matches!(fmt.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(Error::BadFormat);
        }
        fmt.samples_per_sec = fmt.samples_per_sec.clamp(RATE_MIN, RATE_MAX);

        self.format.lock().format = fmt;
        if self.write_emu.lock().is_some() {
            self.rebuild_write_emu(fmt)?;
        }
        Ok(())
    }

    /// `SetCooperativeLevel(level)`: on the transition into `WritePrimary`
    /// build the write-emulation buffer (so apps can `Lock`/`Unlock` the
    /// primary) and mark every live secondary lost, matching the original's
    /// behavior of invalidating the mix on the one transition that can
    /// reformat the device; on the transition back out, tear the
    /// write-emulation buffer down. Entering `WritePrimary` while any buffer
    /// is still playing is rejected outright (§8).
    pub(crate) fn set_cooperative_level(&self, level: CooperativeLevel) -> Result {
        let previous = self.format.lock().level;
        if previous == level {
            return Ok(());
        }

        if level == CooperativeLevel::WritePrimary
            && self.share().live_secondaries().iter().any(|secondary| secondary.is_playing())
        {
            return Err(Error::InvalidCall);
        }

        self.format.lock().level = level;

        match (previous == CooperativeLevel::WritePrimary, level == CooperativeLevel::WritePrimary) {
            (false, true) => {
                for secondary in self.share().live_secondaries() {
                    secondary.mark_lost(true);
                }
                let fmt = self.format();
                self.rebuild_write_emu(fmt)?;
            },
            (true, false) => {
                *self.write_emu.lock() = None;
            },
            _ => {},
        }
        Ok(())
    }

    fn rebuild_write_emu(&self, fmt: WaveFormat) -> Result {
        let sample = SampleData::new(
            self.share(),
            fmt.avg_bytes_per_sec.max(fmt.block_align as u32),
            fmt,
            None,
            CreateFlags { static_buffer: true },
        )?;
        let secondary = Secondary::new(self.share(), sample, Caps::STATIC)?;
        *self.write_emu.lock() = Some(secondary);
        Ok(())
    }

    /// The write-emulation buffer's `Lock`/`Unlock` target, when one is
    /// live (i.e. the cooperative level is `WritePrimary`).
    pub fn write_emu_buffer(&self) -> Option<Arc<Secondary>> {
        self.write_emu.lock().clone()
    }
}
