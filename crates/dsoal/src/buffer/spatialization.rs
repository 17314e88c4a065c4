//! 3D parameter state: live/deferred records, the dirty bitmask, and commit
//! to the backend (§4.4 "3D parameters", §9 "Deferred state").

use crate::{backend, common::Vector3, share::DeviceShare, Result};

use super::Secondary;

/// `DS3DMODE_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ds3dMode {
    #[default]
    Normal,
    HeadRelative,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params3d {
    pub position: Vector3,
    pub velocity: Vector3,
    pub cone_orientation: Vector3,
    pub cone_inside_angle: u32,
    pub cone_outside_angle: u32,
    pub cone_outside_volume: i32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub mode: Ds3dMode,
}

impl Default for Params3d {
    fn default() -> Self {
        Params3d {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            cone_orientation: Vector3::new(0.0, 0.0, 1.0),
            cone_inside_angle: 360,
            cone_outside_angle: 360,
            cone_outside_volume: 0,
            min_distance: 1.0,
            max_distance: 1_000_000_000.0,
            mode: Ds3dMode::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Dirty(u16);

impl Dirty {
    pub const POSITION: Dirty = Dirty(1 << 0);
    pub const VELOCITY: Dirty = Dirty(1 << 1);
    pub const CONE_ORIENTATION: Dirty = Dirty(1 << 2);
    pub const CONE_ANGLES: Dirty = Dirty(1 << 3);
    pub const CONE_OUTSIDE_VOLUME: Dirty = Dirty(1 << 4);
    pub const MIN_MAX_DISTANCE: Dirty = Dirty(1 << 5);
    pub const MODE: Dirty = Dirty(1 << 6);

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

/// Which parameter record a 3D setter should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apply {
    Immediate,
    Deferred,
}

impl Secondary {
    /// Read the live position (or the deferred one if a deferred write is
    /// pending — `GetPosition` always reads back what a deferred `Set` just
    /// wrote, per the end-to-end scenario in §8).
    pub fn get_position(&self) -> Vector3 {
        let state = self.state_lock();
        if state.dirty.contains(Dirty::POSITION) {
            state.deferred.position
        } else {
            state.params.position
        }
    }

    pub fn set_position(&self, pos: Vector3, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::POSITION, |p| p.position = pos)?;
        if apply == Apply::Immediate {
            if let Some(source) = self.source_for_commit() {
                let _guard = self.share().lock_context()?;
                backend::source::set_position(source, pos)?;
            }
        }
        Ok(())
    }

    pub fn set_velocity(&self, vel: Vector3, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::VELOCITY, |p| p.velocity = vel)?;
        if apply == Apply::Immediate {
            if let Some(source) = self.source_for_commit() {
                let _guard = self.share().lock_context()?;
                backend::source::set_velocity(source, vel)?;
            }
        }
        Ok(())
    }

    pub fn set_cone_orientation(&self, dir: Vector3, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::CONE_ORIENTATION, |p| p.cone_orientation = dir)?;
        if apply == Apply::Immediate {
            if let Some(source) = self.source_for_commit() {
                let _guard = self.share().lock_context()?;
                backend::source::set_direction(source, dir)?;
            }
        }
        Ok(())
    }

    pub fn set_cone_angles(&self, inside: u32, outside: u32, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::CONE_ANGLES, |p| {
            p.cone_inside_angle = inside;
            p.cone_outside_angle = outside;
        })?;
        if apply == Apply::Immediate {
            self.commit_cone()?;
        }
        Ok(())
    }

    pub fn set_cone_outside_volume(&self, volume_mb: i32, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::CONE_OUTSIDE_VOLUME, |p| p.cone_outside_volume = volume_mb)?;
        if apply == Apply::Immediate {
            self.commit_cone()?;
        }
        Ok(())
    }

    pub fn set_min_max_distance(&self, min: f32, max: f32, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::MIN_MAX_DISTANCE, |p| {
            p.min_distance = min;
            p.max_distance = max;
        })?;
        if apply == Apply::Immediate {
            if let Some(source) = self.source_for_commit() {
                let _guard = self.share().lock_context()?;
                backend::source::set_min_max_distance(source, min, max)?;
            }
        }
        Ok(())
    }

    pub fn set_mode(&self, mode: Ds3dMode, apply: Apply) -> Result {
        self.set_3d(apply, Dirty::MODE, |p| p.mode = mode)?;
        if apply == Apply::Immediate {
            self.commit_mode()?;
        }
        Ok(())
    }

    fn set_3d(&self, apply: Apply, bit: Dirty, f: impl FnOnce(&mut Params3d)) -> Result {
        let mut state = self.state_lock();
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

    fn state_lock(&self) -> parking_lot::MutexGuard<'_, super::State> {
        self.state.lock()
    }

    fn source_for_commit(&self) -> Option<backend::source::SourceId> {
        self.state.lock().source
    }

    fn commit_cone(&self) -> Result {
        let Some(source) = self.source_for_commit() else { return Ok(()) };
        let state = self.state.lock();
        let p = state.params;
        drop(state);
        let outer_gain = crate::utils::mb_to_gain(p.cone_outside_volume as f32);
        let _guard = self.share().lock_context()?;
        backend::source::set_cone(
            source,
            p.cone_inside_angle as f32,
            p.cone_outside_angle as f32,
            outer_gain,
        )
    }

    fn commit_mode(&self) -> Result {
        let Some(source) = self.source_for_commit() else { return Ok(()) };
        let state = self.state.lock();
        let mode = state.params.mode;
        drop(state);
        let _guard = self.share().lock_context()?;
        backend::source::set_relative(source, mode != Ds3dMode::Normal)?;
        let rolloff = if mode == Ds3dMode::Disable { 0.0 } else { self.share().rolloff_factor() };
        backend::source::set_rolloff(source, rolloff)
    }

    /// `CommitDeferredSettings`, for the subset owned by this buffer: apply
    /// every dirty field in one bracketed backend update (§4.5, §5 ordering
    /// guarantees).
    pub(crate) fn commit_deferred(&self, share: &DeviceShare) -> Result {
        let Some(source) = self.source_for_commit() else { return Ok(()) };
        let mut state = self.state.lock();
        if state.dirty == Dirty::empty() {
            return Ok(());
        }
        let dirty = state.dirty;
        state.params = state.deferred;
        let p = state.params;
        state.dirty.clear();
        drop(state);

        let _guard = share.lock_context()?;
        if dirty.contains(Dirty::POSITION) {
            backend::source::set_position(source, p.position)?;
        }
        if dirty.contains(Dirty::VELOCITY) {
            backend::source::set_velocity(source, p.velocity)?;
        }
        if dirty.contains(Dirty::CONE_ORIENTATION) {
            backend::source::set_direction(source, p.cone_orientation)?;
        }
        if dirty.contains(Dirty::CONE_ANGLES) || dirty.contains(Dirty::CONE_OUTSIDE_VOLUME) {
            let outer_gain = crate::utils::mb_to_gain(p.cone_outside_volume as f32);
            backend::source::set_cone(
                source,
                p.cone_inside_angle as f32,
                p.cone_outside_angle as f32,
                outer_gain,
            )?;
        }
        if dirty.contains(Dirty::MIN_MAX_DISTANCE) {
            backend::source::set_min_max_distance(source, p.min_distance, p.max_distance)?;
        }
        if dirty.contains(Dirty::MODE) {
            backend::source::set_relative(source, p.mode != Ds3dMode::Normal)?;
            let rolloff = if p.mode == Ds3dMode::Disable { 0.0 } else { share.rolloff_factor() };
            backend::source::set_rolloff(source, rolloff)?;
        }
        Ok(())
    }
}
