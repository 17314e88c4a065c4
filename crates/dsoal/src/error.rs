use std::fmt;

macro_rules! error_enum {
    {$(
        $(#[$meta:meta])*
        $Variant:ident => $msg:literal,
    )*} => {
        /// An error returned by a dsoal operation.
        ///
        /// This mirrors the public DirectSound error taxonomy (`DSERR_*`); no
        /// numeric HRESULT ever leaks across the crate boundary.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum Error {
            $(
                $(#[$meta])*
                $Variant,
            )*
        }

        impl Error {
            /// The human-readable description of this error, matching the
            /// intent (not necessarily the wording) of the DirectSound
            /// documentation for the corresponding `DSERR_*` code.
            pub const fn description(&self) -> &'static str {
                match self {
                    $(Error::$Variant => $msg,)*
                }
            }
        }
    };
}

error_enum! {
    /// A parameter was out of range, null, or otherwise malformed.
    InvalidParam => "an invalid parameter was passed",
    /// The operation is not legal in the object's current state.
    InvalidCall => "this function is not valid for the current state of this object",
    /// The object must be initialized before this call.
    Uninitialized => "this object has not been initialized",
    /// The object has already been initialized.
    AlreadyInitialized => "this object is already initialized",
    /// This object is already in use elsewhere and cannot be reused.
    Allocated => "this object is already in use elsewhere",
    /// COM aggregation is not supported.
    NoAggregation => "the object does not support aggregation",
    /// No backend driver is available.
    NoDriver => "no audio driver is available",
    /// The buffer's memory has been lost and must be restored.
    BufferLost => "the buffer memory has been lost and must be restored",
    /// The buffer is too small for the requested operation.
    BufferTooSmall => "the buffer size is not big enough for the requested operation",
    /// The wave format is not supported.
    BadFormat => "the specified wave format is not supported",
    /// The requested control (3D/pan/volume/frequency/fx) is not available on this buffer.
    ControlUnavail => "the buffer control requested is not available",
    /// This call requires a higher cooperative level.
    PrioLevelNeeded => "a cooperative level of `Priority` or higher is required",
    /// Out of memory.
    OutOfMemory => "out of memory",
    /// An unspecified internal error occurred; see the log for details.
    Generic => "an undetermined error occurred",
    /// The requested interface is not supported by this object.
    NoInterface => "the requested COM interface is not supported",
    /// The property or property set is not supported.
    PropIdUnsupported => "the specified property set ID or property ID is not supported",
}

/// Type alias for dsoal function results.
pub type Result<T = (), E = Error> = std::result::Result<T, E>;

impl std::error::Error for Error {
    fn description(&self) -> &str {
        Error::description(self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
