//! The per-share mixer/notifier thread (C7): refills streaming queues and
//! fires position notifications on a fixed tick, so callers never have to
//! poll a buffer themselves to keep it fed (§4.7).

use std::{thread, time::Duration};

use log::{debug, error};

use crate::share::DeviceShare;

/// Spawn the tick thread for `share`. One thread per [`DeviceShare`],
/// started by [`crate::share::acquire`] and joined by `Inner::release` when
/// the last reference drops.
pub(crate) fn spawn(share: DeviceShare) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("dsoal-worker".into())
        .spawn(move || run(share))
        .expect("failed to spawn dsoal worker thread")
}

fn run(share: DeviceShare) {
    let period = Duration::from_secs_f64(1.0 / f64::from(share.refresh_hz().max(1)));
    debug!("worker thread started, tick period {period:?}");

    while !share.should_quit() {
        thread::sleep(period);
        if share.should_quit() {
            break;
        }
        tick(&share);
    }

    debug!("worker thread exiting");
}

/// One tick body: hold the share's backend lock for the whole pass so the
/// context stays current across every buffer it touches (§4.7 "Acquire
/// share lock ... Release share lock"). Safe to nest inside because
/// [`crate::backend::context::BACKEND_LOCK`] is reentrant.
fn tick(share: &DeviceShare) {
    let _guard = match share.lock_context() {
        Ok(guard) => guard,
        Err(e) => {
            error!("worker tick failed to make context current: {e}");
            return;
        },
    };

    for secondary in share.live_secondaries() {
        if let Err(e) = secondary.worker_refill() {
            error!("worker streaming refill failed: {e}");
        }
    }

    for secondary in share.notify_targets() {
        if let Err(e) = secondary.tick_notifications() {
            error!("worker notification pass failed: {e}");
        }
    }
}
