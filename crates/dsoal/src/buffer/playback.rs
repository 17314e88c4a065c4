//! Play/Stop/Restore/SetCurrentPosition state transitions (§4.4 transition
//! table).

use crate::{backend, macros::whoops, share::QBUFFERS, Error, Result};

use super::{Caps, PlayState, Secondary};

macro_rules! bitflags_like_local {
    ($(#[$meta:meta])* pub struct $name:ident: $ty:ty { $(const $variant:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($ty);
        impl $name {
            $(pub const $variant: $name = $name($value);)*
            pub const fn empty() -> Self { $name(0) }
            pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }
        }
        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self { $name(self.0 | rhs.0) }
        }
    };
}

bitflags_like_local! {
    /// `DSBPLAY_*`.
    pub struct PlayFlags: u32 {
        const LOOPING = 1 << 0;
        const LOCSOFTWARE = 1 << 1;
        const LOCHARDWARE = 1 << 2;
        const TERMINATEBY_TIME = 1 << 3;
        const TERMINATEBY_DISTANCE = 1 << 4;
        const TERMINATEBY_PRIORITY = 1 << 5;
    }
}

/// Fill a source's buffer queue, static or streaming, immediately before
/// the first `Play` (or after `SetCurrentPosition` cleared it).
fn bind_source(secondary: &Secondary, source: backend::source::SourceId) -> Result {
    let sample = secondary.sample();
    if let Some(buffer) = sample.static_buffer() {
        backend::source::set_buffer(source, buffer.0)?;
        return Ok(());
    }

    let num_segs = sample.num_segments();
    let mut state = secondary.state.lock();
    let start = state.cur_segment.min(num_segs.saturating_sub(1));
    state.cur_segment = start;
    drop(state);

    let n = num_segs.min(QBUFFERS as u32);
    let mut ids = Vec::with_capacity(n as usize);
    for i in 0..n {
        let idx = (start + i) % num_segs;
        sample.refill_segment(idx)?;
        if let Some(buffer) = sample.segment(idx) {
            ids.push(buffer.0);
        }
    }
    backend::source::queue_buffers(source, &ids)?;
    secondary.state.lock().cur_segment = (start + n) % num_segs;
    Ok(())
}

impl Secondary {
    /// `Play(flags)` (§4.4).
    pub fn play(&self, flags: PlayFlags) -> Result {
        self.check_not_lost()?;

        let caps = self.caps();
        if caps.contains(Caps::LOC_DEFER) {
            // A real implementation promotes to LOCHARDWARE/LOCSOFTWARE here
            // based on share capacity; this crate always borrows a hardware
            // source up front in `Secondary::new`, so there is nothing to
            // promote beyond recording the caller's preference.
            let _software = flags.contains(PlayFlags::LOCSOFTWARE);
        }

        let source = {
            let state = self.state.lock();
            state.source.ok_or(Error::Allocated)?
        };

        let already_playing = self.state.lock().play == PlayState::Playing;
        if !already_playing {
            let is_streaming = self.sample().is_streaming();
            self.state.lock().is_looping = flags.contains(PlayFlags::LOOPING);

            {
                let _guard = self.share().lock_context()?;
                if is_streaming {
                    // Looping for a streaming buffer is emulated by the worker
                    // re-queueing segments (§4.7), not by `AL_LOOPING`.
                    backend::source::set_looping(source, false)?;
                } else {
                    backend::source::set_looping(source, flags.contains(PlayFlags::LOOPING))?;
                    if let Some(buffer) = self.sample().static_buffer() {
                        backend::source::set_buffer(source, buffer.0)?;
                    }
                }
            }

            if is_streaming {
                bind_source(self, source)?;
            }

            let _guard = self.share().lock_context()?;
            backend::source::play(source)?;
        }

        self.state.lock().play = PlayState::Playing;
        Ok(())
    }

    /// `Stop` (§4.4): pause the source and spin-wait for the backend state
    /// transition, since some AL implementations lag a tick behind
    /// `alSourcePause` before `alGetSourcei(AL_SOURCE_STATE)` agrees.
    pub fn stop(&self) -> Result {
        let source = {
            let state = self.state.lock();
            let Some(source) = state.source else { return Ok(()) };
            source
        };

        let _guard = self.share().lock_context()?;
        backend::source::pause(source)?;
        for _ in 0..1000 {
            match backend::source::state(source) {
                Ok(s) if s == al_sys::AL_PLAYING as al_sys::ALint => std::hint::spin_loop(),
                Ok(_) => break,
                Err(_) => break,
            }
        }
        drop(_guard);

        let was_playing = self.state.lock().play == PlayState::Playing;
        self.state.lock().play = PlayState::Stopped;
        if was_playing {
            self.fire_stop_notifications();
        }
        Ok(())
    }

    /// `Restore` (§4.4): only legal out of `Lost`, and only when the
    /// caller's cooperative level permits it (checked above this module, per
    /// the primary's write-emulation boundary).
    pub fn restore(&self) -> Result {
        if !self.is_lost() {
            return Ok(());
        }
        self.mark_lost(false);
        self.state.lock().play = PlayState::Stopped;
        Ok(())
    }

    /// `SetCurrentPosition(p)` (§4.4).
    pub fn set_current_position(&self, pos: u32) -> Result {
        if pos >= self.sample().len() && self.sample().len() > 0 {
            return Err(Error::InvalidParam);
        }

        if self.sample().is_streaming() {
            let num_segs = self.sample().num_segments();
            let (_, seg_size) = self.sample().segment_bounds(0);
            let idx = (pos / seg_size.max(1)).min(num_segs.saturating_sub(1));

            let was_playing = self.state.lock().play == PlayState::Playing;
            if was_playing {
                if let Some(source) = self.state.lock().source {
                    let _guard = self.share().lock_context()?;
                    backend::source::stop(source)?;
                    let queued = backend::source::buffers_queued(source).unwrap_or(0);
                    if queued > 0 {
                        let _ = backend::source::unqueue_buffers(source, queued as usize);
                    }
                    backend::source::set_buffer(source, 0)?;
                }
            }
            self.state.lock().cur_segment = idx;
            if was_playing {
                if let Err(e) = self.play(PlayFlags::empty()) {
                    whoops!("failed to resume after SetCurrentPosition: {e}");
                    return Err(e);
                }
            }
        } else {
            let source = self.state.lock().source;
            if let Some(source) = source {
                let _guard = self.share().lock_context()?;
                backend::source::set_byte_offset(source, pos as i32)?;
            }
        }
        Ok(())
    }

    /// Per-tick streaming refill (§4.7 step 2): unqueue drained segments,
    /// requeue up to [`QBUFFERS`] ahead of the play cursor, and either wrap
    /// (looping), stop (drained with nothing left), or kick the source back
    /// into `AL_PLAYING` after an underrun.
    pub(crate) fn worker_refill(&self) -> Result {
        if !self.sample().is_streaming() {
            return Ok(());
        }

        let (source, was_playing) = {
            let state = self.state.lock();
            (state.source, state.play == PlayState::Playing)
        };
        let Some(source) = source else { return Ok(()) };
        if !was_playing {
            return Ok(());
        }

        let _guard = self.share().lock_context()?;
        let processed = backend::source::buffers_processed(source)?.max(0) as usize;
        if processed > 0 {
            backend::source::unqueue_buffers(source, processed)?;
        }

        let num_segs = self.sample().num_segments().max(1);
        let queued = backend::source::buffers_queued(source)?.max(0) as u32;

        let (is_looping, mut cur) = {
            let state = self.state.lock();
            (state.is_looping, state.cur_segment)
        };

        // A non-looping buffer's `cur_segment` reaches `num_segs` once the
        // last segment has been queued; nothing is left to refill, so once
        // the queue drains the source is genuinely finished.
        if cur >= num_segs && !is_looping {
            if queued == 0 {
                backend::source::stop(source)?;
                self.state.lock().play = PlayState::Stopped;
                drop(_guard);
                self.fire_stop_notifications();
            }
            return Ok(());
        }

        let want = (QBUFFERS as u32).saturating_sub(queued);
        let mut ids = Vec::with_capacity(want as usize);
        for _ in 0..want {
            if cur >= num_segs {
                if is_looping {
                    cur = 0;
                } else {
                    break;
                }
            }
            self.sample().refill_segment(cur)?;
            if let Some(buffer) = self.sample().segment(cur) {
                ids.push(buffer.0);
            }
            cur += 1;
        }
        if !ids.is_empty() {
            backend::source::queue_buffers(source, &ids)?;
        }

        self.state.lock().cur_segment = if is_looping { cur % num_segs } else { cur };

        // Some AL implementations drop out of `AL_PLAYING` on underrun
        // instead of idling with zero buffers queued; kick it back once
        // fresh segments have landed.
        if !ids.is_empty() {
            let al_state = backend::source::state(source)?;
            if al_state != al_sys::AL_PLAYING as al_sys::ALint {
                backend::source::play(source)?;
            }
        }

        Ok(())
    }
}
