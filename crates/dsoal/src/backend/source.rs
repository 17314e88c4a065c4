//! Raw `AL` source operations: allocation, play state, and per-source
//! parameters. Every function here assumes the owning share's context is
//! current and [`crate::backend::context::BACKEND_LOCK`] is held.

use crate::{
    common::Vector3,
    macros::{al, raw},
    Result,
};

raw! {
    /// An `AL` source name. Sources are not reference counted by the
    /// backend; [`crate::share::DeviceShare`] tracks hardware/software
    /// allocation counts separately (§4.2 "source checkout").
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct SourceId(pub(crate) al_sys::ALuint);
}

/// Allocate one source.
pub(crate) fn gen() -> Result<SourceId> {
    let mut id = 0;
    al!(al_sys::alGenSources(1, &mut id))?;
    Ok(SourceId(id))
}

/// Free a source. The source must not be playing and must have no buffers
/// queued.
pub(crate) fn delete(id: SourceId) -> Result {
    al!(al_sys::alDeleteSources(1, &id.0))
}

pub(crate) fn play(id: SourceId) -> Result {
    al!(al_sys::alSourcePlay(id.0))
}

pub(crate) fn pause(id: SourceId) -> Result {
    al!(al_sys::alSourcePause(id.0))
}

pub(crate) fn stop(id: SourceId) -> Result {
    al!(al_sys::alSourceStop(id.0))
}

pub(crate) fn rewind(id: SourceId) -> Result {
    al!(al_sys::alSourceRewind(id.0))
}

pub(crate) fn set_buffer(id: SourceId, buffer: al_sys::ALuint) -> Result {
    al!(al_sys::alSourcei(id.0, al_sys::AL_BUFFER as al_sys::ALenum, buffer as al_sys::ALint))
}

pub(crate) fn queue_buffers(id: SourceId, buffers: &[al_sys::ALuint]) -> Result {
    al!(al_sys::alSourceQueueBuffers(id.0, buffers.len() as al_sys::ALsizei, buffers.as_ptr()))
}

pub(crate) fn unqueue_buffers(id: SourceId, count: usize) -> Result<Vec<al_sys::ALuint>> {
    let mut out = vec![0; count];
    al!(al_sys::alSourceUnqueueBuffers(id.0, count as al_sys::ALsizei, out.as_mut_ptr()))?;
    Ok(out)
}

pub(crate) fn buffers_processed(id: SourceId) -> Result<i32> {
    let mut n = 0;
    al!(al_sys::alGetSourcei(id.0, al_sys::AL_BUFFERS_PROCESSED as al_sys::ALenum, &mut n))?;
    Ok(n)
}

pub(crate) fn buffers_queued(id: SourceId) -> Result<i32> {
    let mut n = 0;
    al!(al_sys::alGetSourcei(id.0, al_sys::AL_BUFFERS_QUEUED as al_sys::ALenum, &mut n))?;
    Ok(n)
}

pub(crate) fn state(id: SourceId) -> Result<al_sys::ALint> {
    let mut state = al_sys::AL_STOPPED as al_sys::ALint;
    al!(al_sys::alGetSourcei(id.0, al_sys::AL_SOURCE_STATE as al_sys::ALenum, &mut state))?;
    Ok(state)
}

pub(crate) fn set_gain(id: SourceId, gain: f32) -> Result {
    al!(al_sys::alSourcef(id.0, al_sys::AL_GAIN as al_sys::ALenum, gain))
}

pub(crate) fn set_pitch(id: SourceId, pitch: f32) -> Result {
    al!(al_sys::alSourcef(id.0, al_sys::AL_PITCH as al_sys::ALenum, pitch))
}

pub(crate) fn set_looping(id: SourceId, looping: bool) -> Result {
    al!(al_sys::alSourcei(
        id.0,
        al_sys::AL_LOOPING as al_sys::ALenum,
        looping as al_sys::ALint
    ))
}

pub(crate) fn set_position(id: SourceId, pos: Vector3) -> Result {
    let [x, y, z] = pos.as_al();
    al!(al_sys::alSource3f(id.0, al_sys::AL_POSITION as al_sys::ALenum, x, y, z))
}

pub(crate) fn set_velocity(id: SourceId, vel: Vector3) -> Result {
    let [x, y, z] = vel.as_al();
    al!(al_sys::alSource3f(id.0, al_sys::AL_VELOCITY as al_sys::ALenum, x, y, z))
}

pub(crate) fn set_direction(id: SourceId, dir: Vector3) -> Result {
    let [x, y, z] = dir.as_al();
    al!(al_sys::alSource3f(id.0, al_sys::AL_DIRECTION as al_sys::ALenum, x, y, z))
}

pub(crate) fn set_relative(id: SourceId, relative: bool) -> Result {
    al!(al_sys::alSourcei(
        id.0,
        al_sys::AL_SOURCE_RELATIVE as al_sys::ALenum,
        relative as al_sys::ALint
    ))
}

pub(crate) fn set_cone(id: SourceId, inner_deg: f32, outer_deg: f32, outer_gain: f32) -> Result {
    al!(al_sys::alSourcef(id.0, al_sys::AL_CONE_INNER_ANGLE as al_sys::ALenum, inner_deg))?;
    al!(al_sys::alSourcef(id.0, al_sys::AL_CONE_OUTER_ANGLE as al_sys::ALenum, outer_deg))?;
    al!(al_sys::alSourcef(id.0, al_sys::AL_CONE_OUTER_GAIN as al_sys::ALenum, outer_gain))
}

pub(crate) fn set_rolloff(id: SourceId, rolloff: f32) -> Result {
    al!(al_sys::alSourcef(id.0, al_sys::AL_ROLLOFF_FACTOR as al_sys::ALenum, rolloff))
}

pub(crate) fn set_min_max_distance(id: SourceId, min: f32, max: f32) -> Result {
    al!(al_sys::alSourcef(id.0, al_sys::AL_REFERENCE_DISTANCE as al_sys::ALenum, min))?;
    al!(al_sys::alSourcef(id.0, al_sys::AL_MAX_DISTANCE as al_sys::ALenum, max))
}

pub(crate) fn byte_offset(id: SourceId) -> Result<i32> {
    let mut off = 0;
    al!(al_sys::alGetSourcei(id.0, al_sys::AL_BYTE_OFFSET as al_sys::ALenum, &mut off))?;
    Ok(off)
}

pub(crate) fn set_byte_offset(id: SourceId, offset: i32) -> Result {
    al!(al_sys::alSourcei(id.0, al_sys::AL_BYTE_OFFSET as al_sys::ALenum, offset))
}

/// Route a source's wet-path send to the given auxiliary effect slot
/// (`AL_EXT_EFX`'s `alSource3i(AL_AUXILIARY_SEND_FILTER, ...)`), with an
/// optional per-send filter.
pub(crate) fn set_aux_send(
    id: SourceId,
    slot: al_sys::ALuint,
    send: al_sys::ALint,
    filter: al_sys::ALuint,
) -> Result {
    al!(al_sys::alSource3i(
        id.0,
        al_sys::AL_AUXILIARY_SEND_FILTER as al_sys::ALenum,
        slot as al_sys::ALint,
        send,
        filter as al_sys::ALint,
    ))
}

/// `(play_offset, write_offset)` in bytes, via `AL_SOFT_source_latency`'s
/// `AL_BYTE_RW_OFFSETS_SOFT` (§4.4 "Position reporting").
pub(crate) fn byte_rw_offsets(id: SourceId) -> Result<(i32, i32)> {
    let mut offsets = [0; 2];
    al!(al_sys::alGetSourceiv(
        id.0,
        al_sys::AL_BYTE_RW_OFFSETS_SOFT as al_sys::ALenum,
        offsets.as_mut_ptr()
    ))?;
    Ok((offsets[0], offsets[1]))
}

pub(crate) fn set_direct_filter(id: SourceId, filter: al_sys::ALuint) -> Result {
    al!(al_sys::alSourcei(
        id.0,
        al_sys::AL_DIRECT_FILTER as al_sys::ALenum,
        filter as al_sys::ALint
    ))
}
