//! Time base conversion for packet timestamps and durations.

use ffmpeg_next::Rational;

use crate::media::MediaPacket;

/// libav's `AV_NOPTS_VALUE`, the "no timestamp" marker.
pub const NOPTS_VALUE: i64 = i64::MIN;

/// Rescales `value` ticks of `from` into ticks of `to`, rounding to the
/// nearest tick with halves away from zero.
///
/// `i64::MIN` and `i64::MAX` pass through untouched, as libav's
/// `AV_ROUND_PASS_MINMAX` does, so an undefined timestamp is never turned
/// into a real one. Results outside the `i64` range are clamped. A time base
/// with a zero numerator or denominator has no defined conversion and yields
/// [`NOPTS_VALUE`].
pub fn rescale(value: i64, from: Rational, to: Rational) -> i64 {
    if value == i64::MIN || value == i64::MAX {
        return value;
    }

    // value * from / to == value * (from.num * to.den) / (to.num * from.den)
    let mut b = i128::from(from.numerator()) * i128::from(to.denominator());
    let mut c = i128::from(to.numerator()) * i128::from(from.denominator());
    if c == 0 {
        return NOPTS_VALUE;
    }
    if c < 0 {
        b = -b;
        c = -c;
    }

    let product = i128::from(value) * b;
    let half = c / 2;
    let rounded = if product >= 0 {
        (product + half) / c
    } else {
        -((-product + half) / c)
    };
    rounded.clamp(-i128::from(i64::MAX), i128::from(i64::MAX)) as i64
}

/// Rebases an optional timestamp; a missing timestamp stays missing.
pub fn rebase(ts: Option<i64>, from: Rational, to: Rational) -> Option<i64> {
    ts.map(|value| rescale(value, from, to))
}

/// Moves a packet's pts, dts and duration from `from` to `to` and drops its
/// source byte offset.
pub fn rebase_packet<P: MediaPacket>(packet: &mut P, from: Rational, to: Rational) {
    packet.set_pts(rebase(packet.pts(), from, to));
    packet.set_dts(rebase(packet.dts(), from, to));
    packet.set_duration(rescale(packet.duration(), from, to));
    packet.clear_position();
}
