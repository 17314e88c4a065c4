//! Small free functions shared across the translation layer.

/// Convert a DirectSound millibel value to a linear gain factor.
///
/// `gain = 10^(mB / 2000)`, except that DirectSound treats anything at or
/// below `DSBVOLUME_MIN` (-10000 mB) as true silence rather than the very
/// small but nonzero value the formula would otherwise produce.
pub(crate) fn mb_to_gain(mb: f32) -> f32 {
    if mb <= -10000.0 {
        0.0
    } else {
        10f32.powf(mb / 2000.0)
    }
}

/// Convert a linear gain factor to a DirectSound millibel value.
///
/// Inverse of [`mb_to_gain`]; `gain <= 0.0` maps to `-10000` mB (true
/// silence) rather than `-inf`.
pub(crate) fn gain_to_mb(gain: f32) -> f32 {
    if gain <= 0.0 {
        -10000.0
    } else {
        2000.0 * gain.log10()
    }
}

/// Clamp `value` into `[lo, hi]`. A thin wrapper over [`f32::clamp`] kept as
/// a free function so call sites documenting the clamp range (see the EAX
/// rescale table) read as a single expression rather than a method chain.
pub(crate) fn clampf(value: f32, lo: f32, hi: f32) -> f32 {
    value.clamp(lo, hi)
}

/// Catch a panic unwinding out of user code invoked from a context where
/// unwinding across an FFI boundary would be undefined behavior (worker
/// thread callbacks, notification event firing). Returns `Err(Error::Generic)`
/// and logs the panic payload instead of propagating it.
pub(crate) fn catch_unwind_generic<F: FnOnce() -> crate::Result<T> + std::panic::UnwindSafe, T>(
    f: F,
) -> crate::Result<T> {
    match std::panic::catch_unwind(f) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown panic payload");
            crate::macros::whoops!("panic caught at FFI boundary: {msg}");
            Err(crate::Error::Generic)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mb_gain_round_trip() {
        for mb in [-10000.0, -6000.0, -2000.0, -100.0, 0.0] {
            let gain = mb_to_gain(mb);
            let back = gain_to_mb(gain);
            assert!((mb - back).abs() < 0.01, "mb={mb} gain={gain} back={back}");
        }
    }

    #[test]
    fn mb_floor_is_true_silence() {
        assert_eq!(mb_to_gain(-10000.0), 0.0);
        assert_eq!(mb_to_gain(-50000.0), 0.0);
    }

    #[test]
    fn gain_zero_is_floor_mb() {
        assert_eq!(gain_to_mb(0.0), -10000.0);
        assert_eq!(gain_to_mb(-1.0), -10000.0);
    }

    #[test]
    fn zero_mb_is_unity_gain() {
        assert!((mb_to_gain(0.0) - 1.0).abs() < 1e-6);
    }

    proptest::proptest! {
        /// For any mB value in DirectSound's legal volume range, converting
        /// to gain and back recovers the original value.
        #[test]
        fn mb_gain_round_trip_prop(mb in -10000.0f32..=0.0f32) {
            let gain = mb_to_gain(mb);
            let back = gain_to_mb(gain);
            proptest::prop_assert!((mb - back).abs() < 0.05, "mb={mb} gain={gain} back={back}");
        }

        /// `mb_to_gain` never produces a negative or non-finite gain for any
        /// finite input.
        #[test]
        fn mb_to_gain_is_finite_and_nonnegative(mb in -100000.0f32..1000.0f32) {
            let gain = mb_to_gain(mb);
            proptest::prop_assert!(gain.is_finite() && gain >= 0.0);
        }
    }
}
