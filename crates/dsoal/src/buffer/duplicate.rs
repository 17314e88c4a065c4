//! `DuplicateSoundBuffer` (§4.4 "Duplicate"): a new secondary sharing the
//! same sample-data, with a fresh borrowed source and a copy of the
//! original's pan/frequency/3D state (but not volume).

use std::sync::{
    atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{eax::source_filter::SourceFilter, Error, Result};

use super::{spatialization::Dirty, Caps, PlayState, Secondary, State};

impl Secondary {
    /// `DuplicateSoundBuffer`.
    pub fn duplicate(&self) -> Result<Arc<Secondary>> {
        if self.caps.contains(Caps::CTRL_FX) {
            return Err(Error::InvalidParam);
        }

        let source = self.share.checkout_source();
        let (params, frequency_bits, pan) = {
            let state = self.state.lock();
            (state.params, self.frequency_ratio.load(Ordering::SeqCst), self.pan.load(Ordering::SeqCst))
        };

        let duplicate = Arc::new_cyclic(|weak| Secondary {
            share: self.share.clone(),
            sample: Arc::clone(&self.sample),
            caps: self.caps,
            state: Mutex::new(State {
                source,
                play: PlayState::Stopped,
                is_looping: false,
                cur_segment: 0,
                filter: SourceFilter::default(),
                direct_filter: None,
                send_filter: None,
                params,
                deferred: params,
                dirty: Dirty::empty(),
                notify_positions: Vec::new(),
                last_pos: 0,
            }),
            buffer_lost: AtomicBool::new(false),
            frequency_ratio: AtomicU32::new(frequency_bits),
            pan: AtomicI32::new(pan),
            self_weak: weak.clone(),
            fired_events: Mutex::new(Vec::new()),
        });

        if let Some(src) = source {
            let _guard = self.share.lock_context()?;
            crate::backend::source::set_pitch(src, f32::from_bits(frequency_bits))?;
            if self.caps.contains(Caps::CTRL_PAN) {
                duplicate.apply_pan_to_source(src)?;
            } else {
                crate::backend::source::set_position(src, params.position)?;
                crate::backend::source::set_velocity(src, params.velocity)?;
                crate::backend::source::set_direction(src, params.cone_orientation)?;
                crate::backend::source::set_relative(src, params.mode != super::Ds3dMode::Normal)?;
            }
        }

        self.share.register_secondary(&duplicate);
        Ok(duplicate)
    }
}
