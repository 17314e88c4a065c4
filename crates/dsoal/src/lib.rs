#![allow(clippy::unit_arg)]

//! # dsoal
//!
//! `dsoal` is a drop-in translation core for the Microsoft DirectSound (DS)
//! and DirectSound Capture (DSC) runtime: it models the DirectSound object
//! graph (devices, secondary/primary buffers, 3D listener, EAX reverb and
//! per-source filters) and dispatches all actual mixing, 3D panning,
//! resampling, reverb, and filtering to an OpenAL 1.1 + EFX backend.
//!
//! This crate is the *core* of such a runtime: the device-sharing and
//! lifecycle layer, the secondary-buffer engine, the EAX property-set
//! bridge, and the mixer/notifier worker thread. It does not implement a COM
//! class factory, a DLL entry point, or device enumeration — those are
//! thin, platform-specific shims meant to sit on top of this crate (see the
//! module docs on [`device`] for the shape of that boundary).
//!
//! Start with [`device::Device`] — `Device::initialize` is the analogue of
//! `IDirectSound::Initialize`, and everything else hangs off the object
//! graph it returns.
#![doc = ::document_features::document_features!()]

mod macros;

pub mod backend;
pub mod buffer;
pub mod capture;
pub mod common;
pub mod config;
pub mod device;
pub mod duplex;
pub mod eax;
pub mod primary;
pub mod sampledata;
pub mod share;
pub mod worker;

mod error;
mod handle;
mod log_init;
pub(crate) mod utils;

pub use self::{
    common::{SpeakerConfig, Vector3, WaveFormat},
    error::{Error, Result},
};
pub use log_init::init_logging;
