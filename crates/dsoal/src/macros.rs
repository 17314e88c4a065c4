#[cfg(feature = "raw")]
macro_rules! raw {
    ($(#[$meta:meta])* pub $($tt:tt)*) => {
        $(#[$meta])* pub $($tt)*
    };
}

#[cfg(not(feature = "raw"))]
macro_rules! raw {
    ($(#[$meta:meta])* pub $($tt:tt)*) => {
        #[allow(dead_code)]
        $(#[$meta])* pub(crate) $($tt)*
    };
}

/// Call a raw `al*` function and translate `alGetError()` into our `Error`.
///
/// Must be called with the owning share's context current and the backend
/// lock held (see `backend::context`); this macro does not itself acquire
/// either.
macro_rules! al {
    ($e:expr) => {{
        #[allow(unused_unsafe)]
        let result = unsafe { $e };
        match unsafe { al_sys::alGetError() } {
            al_sys::AL_NO_ERROR => Ok(result),
            code => Err(crate::backend::error::from_al_error(code)),
        }
    }};
}

/// Call a raw `alc*` function against `device` and translate
/// `alcGetError(device)` into our `Error`.
macro_rules! alc {
    ($device:expr, $e:expr) => {{
        #[allow(unused_unsafe)]
        let result = unsafe { $e };
        match unsafe { al_sys::alcGetError($device) } {
            al_sys::ALC_NO_ERROR => Ok(result),
            code => Err(crate::backend::error::from_alc_error(code)),
        }
    }};
}

/// Log at `warn` level. Used for conditions that are recoverable but
/// indicate a caller or environment bug.
macro_rules! whoops {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Early-return an `Err`, for use inside combinator chains where `return` is
/// awkward to write directly.
macro_rules! yeet {
    ($e:expr) => {
        return Err($e.into())
    };
}

pub(crate) use al;
pub(crate) use alc;
pub(crate) use raw;
pub(crate) use whoops;
pub(crate) use yeet;
