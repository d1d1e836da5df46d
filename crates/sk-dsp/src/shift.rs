//! Sample shifting for time alignment
//!
//! A stem that lags its reference by `shift` samples is aligned by advancing
//! it the same amount. Two policies:
//!
//! - [`circular_shift`]: rotation, exactly invertible; material rotated off
//!   one end reappears at the other. Appropriate while |shift| is small
//!   relative to the buffer.
//! - [`zero_padded_shift`]: shifted-out material is dropped and the vacated
//!   region zero-filled; never reintroduces tail audio at the head.

/// Advance a channel by `shift` samples with wrap-around.
///
/// Positive `shift` rotates toward the start (the buffer plays earlier),
/// negative delays it.
pub fn circular_shift(channel: &mut [f64], shift: i64) {
    let n = channel.len();
    if n == 0 {
        return;
    }
    let k = shift.rem_euclid(n as i64) as usize;
    channel.rotate_left(k);
}

/// Advance a channel by `shift` samples, zero-filling the vacated region.
pub fn zero_padded_shift(channel: &mut [f64], shift: i64) {
    let n = channel.len();
    if n == 0 {
        return;
    }
    if shift.unsigned_abs() as usize >= n {
        channel.fill(0.0);
        return;
    }

    if shift > 0 {
        let k = shift as usize;
        channel.copy_within(k.., 0);
        channel[n - k..].fill(0.0);
    } else if shift < 0 {
        let k = (-shift) as usize;
        channel.copy_within(..n - k, k);
        channel[..k].fill(0.0);
    }
}
