//! Raw `AL` buffer operations, including the runtime format-enum resolution
//! promised by [`crate::common::format`].

use std::ffi::CString;

use crate::{
    macros::{al, raw},
    Error, Result,
};

raw! {
    /// An `AL` buffer name.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct BufferId(pub(crate) al_sys::ALuint);
}

/// Resolve a format name such as `"AL_FORMAT_51CHN16"` to its `ALenum`.
///
/// Multi-channel and float formats are defined by `AL_EXT_MCFORMATS` and
/// `AL_EXT_FLOAT32` respectively, so unlike `AL_FORMAT_MONO8`/
/// `AL_FORMAT_STEREO16` they are not guaranteed to be linkable constants —
/// the original implementation resolves every format name through
/// `alGetEnumValue` at the point of use, and we do the same.
pub(crate) fn resolve_format(name: &'static str) -> Result<al_sys::ALenum> {
    let cname = CString::new(name).expect("format names are static and ASCII");
    let value = unsafe { al_sys::alGetEnumValue(cname.as_ptr()) };
    if value == 0 {
        crate::macros::whoops!("backend does not define format enum {name}");
        return Err(Error::BadFormat);
    }
    Ok(value)
}

/// Allocate `count` buffers.
pub(crate) fn gen(count: usize) -> Result<Vec<BufferId>> {
    let mut ids = vec![0; count];
    al!(al_sys::alGenBuffers(count as al_sys::ALsizei, ids.as_mut_ptr()))?;
    Ok(ids.into_iter().map(BufferId).collect())
}

pub(crate) fn delete(ids: &[BufferId]) -> Result {
    let raw: Vec<al_sys::ALuint> = ids.iter().map(|b| b.0).collect();
    al!(al_sys::alDeleteBuffers(raw.len() as al_sys::ALsizei, raw.as_ptr()))
}

/// Full upload via `alBufferData`: used for [`crate::backend::UploadStrategy::FullReupload`]
/// and as the initial upload for [`crate::backend::UploadStrategy::Static`]/
/// [`crate::backend::UploadStrategy::SubData`].
pub(crate) fn buffer_data(
    id: BufferId,
    format: al_sys::ALenum,
    data: &[u8],
    freq: u32,
) -> Result {
    al!(al_sys::alBufferData(
        id.0,
        format,
        data.as_ptr().cast(),
        data.len() as al_sys::ALsizei,
        freq as al_sys::ALsizei,
    ))
}

/// Partial re-upload of `data` at byte `offset`
/// (`AL_SOFT_buffer_sub_data`'s `alBufferSubDataSOFT`).
pub(crate) fn buffer_sub_data(
    id: BufferId,
    format: al_sys::ALenum,
    offset: i32,
    data: &[u8],
) -> Result {
    al!(al_sys::alBufferSubDataSOFT(
        id.0,
        format,
        data.as_ptr().cast(),
        offset,
        data.len() as al_sys::ALsizei,
    ))
}

pub(crate) fn byte_length(id: BufferId) -> Result<i32> {
    let mut size = 0;
    al!(al_sys::alGetBufferi(id.0, al_sys::AL_SIZE as al_sys::ALenum, &mut size))?;
    Ok(size)
}
