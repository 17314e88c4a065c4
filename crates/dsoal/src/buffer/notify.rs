//! `SetNotificationPositions` (§4.4 "Notifications"), and the per-crossing
//! firing logic the worker drives (§4.7 step 3).

use crate::{Error, Result};

use super::{PlayState, Secondary};

/// One `DSBPOSITIONNOTIFY` entry: an offset and an opaque event handle.
///
/// Resolving the platform event handle to something signalable is a
/// COM/Win32 concern above this crate; the handle is carried verbatim and
/// handed back to the caller by [`Secondary::take_fired_events`].
#[derive(Debug, Clone, Copy)]
pub struct NotifyPosition {
    pub offset: u32,
    pub event: usize,
}

/// Sentinel offset meaning "fire when playback stops", not a byte position.
pub const DSBPN_OFFSETSTOP: u32 = u32::MAX;

impl Secondary {
    /// `SetNotificationPositions(positions)` (§4.4): rejects while playing,
    /// otherwise replaces the whole list atomically.
    pub fn set_notification_positions(&self, positions: &[NotifyPosition]) -> Result {
        {
            let state = self.state.lock();
            if state.play == PlayState::Playing {
                return Err(Error::InvalidCall);
            }
        }

        let size = self.sample().len();
        for p in positions {
            if p.offset != DSBPN_OFFSETSTOP && p.offset >= size {
                return Err(Error::InvalidParam);
            }
        }

        let mut state = self.state.lock();
        state.notify_positions = positions.to_vec();
        drop(state);

        if positions.is_empty() {
            self.share().unmark_notify(self);
        } else {
            self.share().mark_notify(&self.arc());
        }
        Ok(())
    }

    /// Whether `cur` has crossed any registered notify offset since
    /// `last_pos`, with buffer-wrap handling, and advance `last_pos`. Used
    /// by the worker's per-tick notification pass (§4.7 step 3); returns the
    /// event handles to fire.
    pub(crate) fn crossed_notifications(&self, cur: u32) -> Vec<usize> {
        let mut state = self.state.lock();
        let last = state.last_pos;
        let fired = state
            .notify_positions
            .iter()
            .filter(|p| p.offset != DSBPN_OFFSETSTOP)
            .filter(|p| {
                if cur >= last {
                    p.offset > last && p.offset <= cur
                } else {
                    p.offset > last || p.offset <= cur
                }
            })
            .map(|p| p.event)
            .collect();
        state.last_pos = cur;
        fired
    }

    /// Event handles registered for the "on-stop" sentinel, fired once a
    /// buffer transitions out of `Playing` via `Stop` (§4.7 step 3).
    pub(crate) fn on_stop_events(&self) -> Vec<usize> {
        self.state
            .lock()
            .notify_positions
            .iter()
            .filter(|p| p.offset == DSBPN_OFFSETSTOP)
            .map(|p| p.event)
            .collect()
    }

    /// Push this buffer's on-stop event handles onto the fired queue.
    pub(crate) fn fire_stop_notifications(&self) {
        let events = self.on_stop_events();
        if !events.is_empty() {
            self.queue_fired_events(events);
        }
    }

    /// The worker's per-tick notification pass (§4.7 step 3): detect a
    /// non-streaming buffer that reached `AL_STOPPED` on its own (natural
    /// end of a non-looping static buffer), and otherwise fire any position
    /// notifications the play cursor has crossed since last tick.
    pub(crate) fn tick_notifications(&self) -> Result {
        let (source, was_playing) = {
            let state = self.state.lock();
            (state.source, state.play == PlayState::Playing)
        };
        if !was_playing {
            return Ok(());
        }
        let Some(source) = source else { return Ok(()) };

        if !self.sample().is_streaming() {
            let al_state = {
                let _guard = self.share().lock_context()?;
                crate::backend::source::state(source)?
            };
            if al_state == al_sys::AL_STOPPED as al_sys::ALint {
                self.state.lock().play = PlayState::Stopped;
                self.fire_stop_notifications();
                return Ok(());
            }
        }

        let (pos, _) = self.current_position()?;
        let fired = self.crossed_notifications(pos);
        if !fired.is_empty() {
            self.queue_fired_events(fired);
        }
        Ok(())
    }
}
