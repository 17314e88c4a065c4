//! Translation from `al_sys`/`alc_sys`-style raw error codes into
//! [`crate::Error`] (§6 "The binding reports errors by kind ... never by
//! numeric code leakage").

use crate::Error;

/// Translate an `alGetError()` result (already known to be non-`AL_NO_ERROR`)
/// into our closed error enum.
pub(crate) fn from_al_error(code: al_sys::ALenum) -> Error {
    match code {
        al_sys::AL_OUT_OF_MEMORY => Error::OutOfMemory,
        al_sys::AL_INVALID_VALUE | al_sys::AL_INVALID_ENUM | al_sys::AL_INVALID_OPERATION => {
            Error::InvalidParam
        },
        al_sys::AL_INVALID_NAME => Error::InvalidParam,
        _ => {
            crate::macros::whoops!("unexpected AL error {code:#x}");
            Error::Generic
        },
    }
}

/// Translate an `alcGetError(device)` result into our closed error enum.
pub(crate) fn from_alc_error(code: al_sys::ALCenum) -> Error {
    match code {
        al_sys::ALC_OUT_OF_MEMORY => Error::OutOfMemory,
        al_sys::ALC_INVALID_DEVICE => Error::NoDriver,
        al_sys::ALC_INVALID_VALUE | al_sys::ALC_INVALID_ENUM | al_sys::ALC_INVALID_CONTEXT => {
            Error::InvalidParam
        },
        _ => {
            crate::macros::whoops!("unexpected ALC error {code:#x}");
            Error::Generic
        },
    }
}
