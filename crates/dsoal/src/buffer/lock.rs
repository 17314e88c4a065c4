//! `Lock`/`Unlock` (§4.4): exclusive read/write access to a sample-data
//! payload, returned as up to two contiguous spans when the requested range
//! wraps the end of the buffer.

use crate::{Error, Result};

use super::Secondary;

bitflags_like_lock! {
    /// `DSBLOCK_*`.
    pub struct LockFlags: u32 {
        const FROMWRITECURSOR = 1 << 0;
        const ENTIREBUFFER = 1 << 1;
    }
}

macro_rules! bitflags_like_lock {
    ($(#[$meta:meta])* pub struct $name:ident: $ty:ty { $(const $variant:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($ty);
        impl $name {
            $(pub const $variant: $name = $name($value);)*
            pub const fn empty() -> Self { $name(0) }
            pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }
        }
    };
}
use bitflags_like_lock;

/// Two (offset, data) spans covering a locked region; the second is empty
/// unless the lock wrapped past the end of the buffer.
pub struct LockedSpans {
    pub span1: Vec<u8>,
    pub span2: Vec<u8>,
}

impl Secondary {
    /// `Lock(ofs, len, flags)` (§4.4).
    pub fn lock(&self, offset: u32, len: u32, flags: LockFlags) -> Result<LockedSpans> {
        self.sample().begin_lock()?;

        let size = self.sample().len();
        let offset = if flags.contains(LockFlags::FROMWRITECURSOR) {
            self.current_write_cursor()?
        } else {
            offset
        };
        let len = if flags.contains(LockFlags::ENTIREBUFFER) { size } else { len };

        if offset >= size && size > 0 {
            self.sample().unlock();
            return Err(Error::InvalidParam);
        }

        let end = offset as u64 + len as u64;
        let (len1, len2) =
            if end > size as u64 { (size - offset, (end - size as u64) as u32) } else { (len, 0) };

        let span1 = self.sample().read_span(offset, len1);
        let span2 = if len2 > 0 { self.sample().read_span(0, len2) } else { Vec::new() };

        Ok(LockedSpans { span1, span2 })
    }

    /// `Unlock(p1, l1, p2, l2)` (§4.4): validate the caller's lengths match
    /// what `lock` handed out (enforced by the caller passing back exactly
    /// the host-payload slices it received) and upload.
    pub fn unlock(&self, offset1: u32, data1: &[u8], data2: &[u8]) -> Result {
        let size = self.sample().len();
        let in_bounds = offset1 as u64 + data1.len() as u64 <= size as u64 && data2.len() as u64 <= size as u64;
        if !in_bounds {
            self.sample().unlock();
            return Err(Error::InvalidParam);
        }

        let result = (|| {
            if !data1.is_empty() {
                self.sample().write_span(offset1, data1)?;
            }
            if !data2.is_empty() {
                self.sample().write_span(0, data2)?;
            }
            Ok(())
        })();

        self.sample().unlock();
        result
    }

    fn current_write_cursor(&self) -> Result<u32> {
        let (_play, write) = self.current_position()?;
        Ok(write)
    }
}
