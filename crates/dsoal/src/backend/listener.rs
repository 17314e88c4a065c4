//! Raw `AL` listener and global-property operations backing
//! [`crate::primary`]'s `IDirectSound3DListener` surface.

use crate::{common::Vector3, macros::al, Result};

pub(crate) fn set_position(pos: Vector3) -> Result {
    let [x, y, z] = pos.as_al();
    al!(al_sys::alListener3f(al_sys::AL_POSITION as al_sys::ALenum, x, y, z))
}

pub(crate) fn set_velocity(vel: Vector3) -> Result {
    let [x, y, z] = vel.as_al();
    al!(al_sys::alListener3f(al_sys::AL_VELOCITY as al_sys::ALenum, x, y, z))
}

/// Set listener orientation from a (forward, up) pair, as `AL_ORIENTATION`
/// expects: six floats, forward then up.
pub(crate) fn set_orientation(forward: Vector3, up: Vector3) -> Result {
    let f = forward.as_al();
    let u = up.as_al();
    let orientation = [f[0], f[1], f[2], u[0], u[1], u[2]];
    al!(al_sys::alListenerfv(al_sys::AL_ORIENTATION as al_sys::ALenum, orientation.as_ptr()))
}

pub(crate) fn set_gain(gain: f32) -> Result {
    al!(al_sys::alListenerf(al_sys::AL_GAIN as al_sys::ALenum, gain))
}

pub(crate) fn set_doppler_factor(factor: f32) -> Result {
    al!(al_sys::alDopplerFactor(factor))
}

pub(crate) fn set_speed_of_sound(speed: f32) -> Result {
    al!(al_sys::alSpeedOfSound(speed))
}

/// Select the global distance-attenuation model. DSOAL always runs
/// `AL_INVERSE_DISTANCE_CLAMPED` to match DirectSound3D's rolloff curve
/// (§5.2 "distance model is fixed, not user-selectable").
pub(crate) fn set_distance_model() -> Result {
    al!(al_sys::alDistanceModel(al_sys::AL_INVERSE_DISTANCE_CLAMPED as al_sys::ALenum))
}
