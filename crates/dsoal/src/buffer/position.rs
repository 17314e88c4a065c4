//! `GetCurrentPosition` (§4.4 "Position reporting"): the play cursor and
//! write cursor, computed differently for streaming and static buffers.

use crate::{backend, Result};

use super::{PlayState, Secondary};

impl Secondary {
    /// Returns `(play_position, write_cursor)`, both in bytes.
    pub fn current_position(&self) -> Result<(u32, u32)> {
        if self.sample().is_streaming() {
            return Ok(self.streaming_position());
        }

        let source = self.state.lock().source;
        let Some(source) = source else { return Ok((0, 0)) };

        if self.share().caps().contains(crate::backend::Extensions::BYTE_RW_OFFSETS) {
            let _guard = self.share().lock_context()?;
            let (play, write) = backend::source::byte_rw_offsets(source)?;
            return Ok((play.max(0) as u32, write.max(0) as u32));
        }

        let _guard = self.share().lock_context()?;
        let play = backend::source::byte_offset(source)?.max(0) as u32;
        if self.is_playing() {
            let fmt = self.sample().format();
            let lead = (fmt.samples_per_sec / 100) * u32::from(fmt.block_align);
            let size = self.sample().len().max(1);
            let write = (play + lead) % size;
            Ok((play, write))
        } else {
            Ok((play, play))
        }
    }

    fn streaming_position(&self) -> (u32, u32) {
        let state = self.state.lock();
        let num_segs = self.sample().num_segments().max(1);
        let (_, seg_size) = self.sample().segment_bounds(0);
        let cur_idx = state.cur_segment;
        let queued = if state.play == PlayState::Playing {
            state
                .source
                .and_then(|s| {
                    let _guard = self.share().lock_context().ok()?;
                    backend::source::buffers_queued(s).ok()
                })
                .unwrap_or(0)
                .max(0) as u32
        } else {
            0
        };

        let play_idx = (cur_idx + num_segs - queued.min(num_segs)) % num_segs;
        let play = play_idx * seg_size;
        let write = cur_idx * seg_size;
        (play, write)
    }
}
