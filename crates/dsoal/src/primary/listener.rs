//! The listener's deferred-commit 3D state, mirroring
//! [`crate::buffer::spatialization`]'s `Dirty`/`Params3d`/`Apply` pattern at
//! the listener's parameter set (§4.5 "Listener").

use crate::{backend, common::Vector3, Result};

use super::Primary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerParams {
    pub position: Vector3,
    pub velocity: Vector3,
    pub orientation_front: Vector3,
    pub orientation_top: Vector3,
    pub distance_factor: f32,
    pub rolloff_factor: f32,
    pub doppler_factor: f32,
    pub gain: f32,
}

impl Default for ListenerParams {
    fn default() -> Self {
        ListenerParams {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            orientation_front: Vector3::new(0.0, 0.0, 1.0),
            orientation_top: Vector3::new(0.0, 1.0, 0.0),
            distance_factor: 1.0,
            rolloff_factor: 1.0,
            doppler_factor: 1.0,
            gain: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Dirty(u8);

impl Dirty {
    pub const POSITION: Dirty = Dirty(1 << 0);
    pub const VELOCITY: Dirty = Dirty(1 << 1);
    pub const ORIENTATION: Dirty = Dirty(1 << 2);
    pub const DISTANCE_FACTOR: Dirty = Dirty(1 << 3);
    pub const ROLLOFF_FACTOR: Dirty = Dirty(1 << 4);
    pub const DOPPLER_FACTOR: Dirty = Dirty(1 << 5);

    pub const fn empty() -> Self {
        Dirty(0)
    }
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apply {
    Immediate,
    Deferred,
}

pub(crate) struct ListenerState {
    pub(crate) params: ListenerParams,
    pub(crate) deferred: ListenerParams,
    pub(crate) dirty: Dirty,
}

impl Default for ListenerState {
    fn default() -> Self {
        ListenerState { params: ListenerParams::default(), deferred: ListenerParams::default(), dirty: Dirty::empty() }
    }
}

impl Primary {
    pub fn get_listener_params(&self) -> ListenerParams {
        let state = self.listener.lock();
        if state.dirty != Dirty::empty() {
            state.deferred
        } else {
            state.params
        }
    }

    pub fn set_position(&self, pos: Vector3, apply: Apply) -> Result {
        self.set_field(apply, Dirty::POSITION, |p| p.position = pos)?;
        if apply == Apply::Immediate {
            let _guard = self.share.lock_context()?;
            backend::listener::set_position(pos)?;
        }
        Ok(())
    }

    pub fn set_velocity(&self, vel: Vector3, apply: Apply) -> Result {
        self.set_field(apply, Dirty::VELOCITY, |p| p.velocity = vel)?;
        if apply == Apply::Immediate {
            let _guard = self.share.lock_context()?;
            backend::listener::set_velocity(vel)?;
        }
        Ok(())
    }

    pub fn set_orientation(&self, front: Vector3, top: Vector3, apply: Apply) -> Result {
        self.set_field(apply, Dirty::ORIENTATION, |p| {
            p.orientation_front = front;
            p.orientation_top = top;
        })?;
        if apply == Apply::Immediate {
            let _guard = self.share.lock_context()?;
            backend::listener::set_orientation(front, top)?;
        }
        Ok(())
    }

    pub fn set_distance_factor(&self, factor: f32, apply: Apply) -> Result {
        self.set_field(apply, Dirty::DISTANCE_FACTOR, |p| p.distance_factor = factor)?;
        if apply == Apply::Immediate {
            self.commit_distance_factor()?;
        }
        Ok(())
    }

    pub fn set_rolloff_factor(&self, factor: f32, apply: Apply) -> Result {
        self.set_field(apply, Dirty::ROLLOFF_FACTOR, |p| p.rolloff_factor = factor)?;
        if apply == Apply::Immediate {
            self.commit_rolloff_factor()?;
        }
        Ok(())
    }

    pub fn set_doppler_factor(&self, factor: f32, apply: Apply) -> Result {
        self.set_field(apply, Dirty::DOPPLER_FACTOR, |p| p.doppler_factor = factor)?;
        if apply == Apply::Immediate {
            let _guard = self.share.lock_context()?;
            backend::listener::set_doppler_factor(factor)?;
        }
        Ok(())
    }

    fn set_field(&self, apply: Apply, bit: Dirty, f: impl FnOnce(&mut ListenerParams)) -> Result {
        let mut state = self.listener.lock();
        match apply {
            Apply::Deferred => {
                f(&mut state.deferred);
                state.dirty.insert(bit);
            },
            Apply::Immediate => {
                f(&mut state.params);
                state.deferred = state.params;
                state.dirty.clear();
            },
        }
        Ok(())
    }

    /// `AL_METERS_PER_UNIT`-scaled speed of sound, the backend's analogue of
    /// DirectSound3D's distance factor (distance units per meter).
    fn commit_distance_factor(&self) -> Result {
        let factor = self.listener.lock().params.distance_factor;
        let _guard = self.share.lock_context()?;
        // AL has no direct "distance factor"; scale the speed of sound
        // inversely so relative attenuation over distance is preserved.
        backend::listener::set_speed_of_sound(343.3 / factor.max(1e-6))
    }

    fn commit_rolloff_factor(&self) -> Result {
        let factor = self.listener.lock().params.rolloff_factor;
        let _guard = self.share.lock_context()?;
        for secondary in self.share.live_secondaries() {
            if let Some(source) = secondary.source() {
                backend::source::set_rolloff(source, factor)?;
            }
        }
        Ok(())
    }

    /// `CommitDeferredSettings`: apply the listener's own dirty bits, then
    /// every live secondary's (§4.5).
    pub fn commit_deferred_settings(&self) -> Result {
        let (dirty, params) = {
            let mut state = self.listener.lock();
            let dirty = state.dirty;
            state.params = state.deferred;
            state.dirty.clear();
            (dirty, state.params)
        };

        if dirty != Dirty::empty() {
            let _guard = self.share.lock_context()?;
            if dirty.contains(Dirty::POSITION) {
                backend::listener::set_position(params.position)?;
            }
            if dirty.contains(Dirty::VELOCITY) {
                backend::listener::set_velocity(params.velocity)?;
            }
            if dirty.contains(Dirty::ORIENTATION) {
                backend::listener::set_orientation(params.orientation_front, params.orientation_top)?;
            }
            if dirty.contains(Dirty::DOPPLER_FACTOR) {
                backend::listener::set_doppler_factor(params.doppler_factor)?;
            }
            drop(_guard);
            if dirty.contains(Dirty::DISTANCE_FACTOR) {
                self.commit_distance_factor()?;
            }
            if dirty.contains(Dirty::ROLLOFF_FACTOR) {
                self.commit_rolloff_factor()?;
            }
        }

        for secondary in self.share.live_secondaries() {
            secondary.commit_deferred(&self.share)?;
        }
        Ok(())
    }
}
