//! Sample data (C3): a format-validated, ref-counted payload shared by a
//! secondary buffer and all of its duplicates.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{
    backend::{self, buffer::BufferId, caps::UploadStrategy, Extensions},
    common::{format, WaveFormat},
    macros::yeet,
    share::{DeviceShare, QBUFFERS},
    Error, Result,
};

/// How a [`SampleData`]'s payload is laid out across backend buffer objects.
enum Layout {
    /// One backend buffer holding the whole payload.
    Static { buffer: BufferId },
    /// `segments.len()` equal-sized chunks (the last may be shorter),
    /// refilled by the worker thread as they drain (§4.3 step 4).
    Streaming { segments: Vec<BufferId>, seg_size: u32, last_seg_size: u32 },
}

pub(crate) struct SampleData {
    share: DeviceShare,
    format: WaveFormat,
    buf_size: u32,
    format_name: &'static str,
    format_enum: al_sys::ALenum,
    layout: Layout,
    strategy: UploadStrategy,
    payload: Mutex<Vec<u8>>,
    locked: AtomicBool,
}

/// Flags relevant to sample-data construction, a narrow slice of
/// `DSBUFFERDESC::dwFlags`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateFlags {
    pub static_buffer: bool,
}

fn silence_byte(format: &WaveFormat) -> u8 {
    match (format.sub_format, format.bits_per_sample) {
        (format::SubFormat::Pcm, 8) => 0x80,
        _ => 0,
    }
}

impl SampleData {
    /// Construct a sample-data object per §4.3.
    pub(crate) fn new(
        share: &DeviceShare,
        requested_bytes: u32,
        format: WaveFormat,
        extensible: Option<(u16, u32)>,
        flags: CreateFlags,
    ) -> Result<Arc<SampleData>> {
        let caps = share.caps();

        if requested_bytes < format::DSBSIZE_MIN || requested_bytes > format::DSBSIZE_MAX {
            yeet!(Error::BufferTooSmall);
        }
        let buf_size = requested_bytes - (requested_bytes % format.block_align.max(1));
        if buf_size < format::DSBSIZE_MIN {
            yeet!(Error::BufferTooSmall);
        }

        let format_name = format::validate_wave_format(&format, extensible, caps)?;

        let _guard = share.lock_context()?;
        let format_enum = backend::buffer::resolve_format(format_name)?;

        let streaming = !flags.static_buffer
            && !caps.contains(Extensions::STATIC_BUFFER)
            && !caps.contains(Extensions::BUFFER_SUB_DATA)
            && !caps.contains(Extensions::BUFFER_SAMPLES);

        let silence = silence_byte(&format);
        let mut payload = vec![silence; buf_size as usize];
        // touch payload so it's not considered "unused" before upload below
        let _ = &mut payload;

        let (layout, strategy) = if streaming {
            let per_tick = format.avg_bytes_per_sec / share.refresh_hz().max(1);
            let mut seg_size = per_tick + format.block_align.saturating_sub(1);
            seg_size -= seg_size % format.block_align.max(1);
            let seg_size = seg_size.max(format.block_align.max(1));
            let fits = (seg_size as u64) * (QBUFFERS as u64 + 2) <= buf_size as u64;
            let (seg_size, num_segs) =
                if fits { (seg_size, buf_size.div_ceil(seg_size)) } else { (buf_size, 1) };
            let last_seg_size = buf_size - seg_size * (num_segs - 1);
            let ids = backend::buffer::gen(num_segs as usize)?;
            (
                Layout::Streaming { segments: ids, seg_size, last_seg_size },
                UploadStrategy::Streaming,
            )
        } else {
            let ids = backend::buffer::gen(1)?;
            let buffer = ids[0];
            backend::buffer::buffer_data(buffer, format_enum, &payload, format.samples_per_sec)?;
            let strategy = if caps.contains(Extensions::STATIC_BUFFER) {
                UploadStrategy::Static
            } else if caps.contains(Extensions::BUFFER_SUB_DATA) {
                UploadStrategy::SubData
            } else if caps.contains(Extensions::BUFFER_SAMPLES) {
                UploadStrategy::SubSamples
            } else {
                UploadStrategy::FullReupload
            };
            (Layout::Static { buffer }, strategy)
        };

        Ok(Arc::new(SampleData {
            share: share.clone(),
            format,
            buf_size,
            format_name,
            format_enum,
            layout,
            strategy,
            payload: Mutex::new(payload),
            locked: AtomicBool::new(false),
        }))
    }

    pub(crate) fn format(&self) -> &WaveFormat {
        &self.format
    }

    pub(crate) fn len(&self) -> u32 {
        self.buf_size
    }

    pub(crate) fn strategy(&self) -> UploadStrategy {
        self.strategy
    }

    pub(crate) fn is_streaming(&self) -> bool {
        matches!(self.layout, Layout::Streaming { .. })
    }

    pub(crate) fn static_buffer(&self) -> Option<BufferId> {
        match self.layout {
            Layout::Static { buffer } => Some(buffer),
            Layout::Streaming { .. } => None,
        }
    }

    pub(crate) fn segment(&self, idx: u32) -> Option<BufferId> {
        match &self.layout {
            Layout::Streaming { segments, .. } => segments.get(idx as usize).copied(),
            Layout::Static { .. } => None,
        }
    }

    pub(crate) fn num_segments(&self) -> u32 {
        match &self.layout {
            Layout::Streaming { segments, .. } => segments.len() as u32,
            Layout::Static { .. } => 1,
        }
    }

    pub(crate) fn segment_bounds(&self, idx: u32) -> (u32, u32) {
        match &self.layout {
            Layout::Streaming { seg_size, last_seg_size, segments } => {
                let start = idx * seg_size;
                let len = if idx as usize == segments.len() - 1 { *last_seg_size } else { *seg_size };
                (start, len)
            },
            Layout::Static { .. } => (0, self.buf_size),
        }
    }

    /// Attempt to begin a lock; fails with `InvalidParam` if one is already
    /// outstanding (§3 "only one Lock may be outstanding").
    pub(crate) fn begin_lock(&self) -> Result {
        if self.locked.swap(true, Ordering::SeqCst) {
            yeet!(Error::InvalidParam);
        }
        Ok(())
    }

    /// Copy bytes out of the host payload for reading during a lock.
    pub(crate) fn read_span(&self, offset: u32, len: u32) -> Vec<u8> {
        let payload = self.payload.lock();
        payload[offset as usize..(offset + len) as usize].to_vec()
    }

    /// Write `data` into the host payload at `offset` and re-upload
    /// according to this sample-data's [`UploadStrategy`] (§4.4 `Unlock`).
    pub(crate) fn write_span(&self, offset: u32, data: &[u8]) -> Result {
        {
            let mut payload = self.payload.lock();
            payload[offset as usize..offset as usize + data.len()].copy_from_slice(data);
        }
        self.upload_span(offset, data.len() as u32)
    }

    fn upload_span(&self, offset: u32, len: u32) -> Result {
        let _guard = self.share.lock_context()?;
        match (&self.layout, self.strategy) {
            (Layout::Static { .. }, UploadStrategy::Static) => Ok(()),
            (Layout::Static { buffer }, UploadStrategy::SubData) => {
                let payload = self.payload.lock();
                backend::buffer::buffer_sub_data(
                    *buffer,
                    self.format_enum,
                    offset as i32,
                    &payload[offset as usize..(offset + len) as usize],
                )
            },
            (Layout::Static { buffer }, _) => {
                let payload = self.payload.lock();
                backend::buffer::buffer_data(
                    *buffer,
                    self.format_enum,
                    &payload,
                    self.format.samples_per_sec,
                )
            },
            (Layout::Streaming { .. }, _) => Ok(()),
        }
    }

    pub(crate) fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    /// Upload segment `idx` fresh from the host payload, for the worker's
    /// streaming refill (§4.7 step 2).
    pub(crate) fn refill_segment(&self, idx: u32) -> Result {
        let buffer = self.segment(idx).ok_or(Error::InvalidParam)?;
        let (start, len) = self.segment_bounds(idx);
        let _guard = self.share.lock_context()?;
        let payload = self.payload.lock();
        backend::buffer::buffer_data(
            buffer,
            self.format_enum,
            &payload[start as usize..(start + len) as usize],
            self.format.samples_per_sec,
        )
    }
}

impl Drop for SampleData {
    fn drop(&mut self) {
        let Ok(_guard) = self.share.lock_context() else { return };
        let ids: Vec<BufferId> = match &self.layout {
            Layout::Static { buffer } => vec![*buffer],
            Layout::Streaming { segments, .. } => segments.clone(),
        };
        let _ = backend::buffer::delete(&ids);
    }
}
