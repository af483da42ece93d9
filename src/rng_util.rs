use crate::distribution::Distribution;
use crate::error::Result;

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw a standard normal variate (Box-Muller).
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // 1 - U keeps the logarithm's argument in (0, 1].
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (core::f64::consts::TAU * u2).cos()
}

/// Number of whole steps between `low` and `high`, tolerating rounding noise.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn n_float_steps(low: f64, high: f64, step: f64) -> i64 {
    ((high - low) / step + 1e-9).floor() as i64
}

/// Snap a continuous value onto the `low + k * step` grid inside `[low, high]`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn snap_float(value: f64, low: f64, high: f64, step: f64) -> f64 {
    let k = ((value - low) / step).round().clamp(0.0, n_float_steps(low, high, step) as f64);
    (low + k * step).clamp(low, high)
}

/// Snap an integer-valued float onto the `low + k * step` grid inside `[low, high]`.
///
/// The grid arithmetic runs in `i128` so spans wider than `i64::MAX` stay exact.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub(crate) fn snap_int(value: f64, low: i64, high: i64, step: i64) -> i64 {
    let (low, high, step) = (i128::from(low), i128::from(high), i128::from(step));
    let k = ((value - low as f64) / step as f64).round() as i128;
    let k = k.clamp(0, (high - low) / step);
    // low + k * step never leaves [low, high]
    (low + k * step) as i64
}

/// Sample an internal value uniformly from `distribution`.
///
/// # Errors
///
/// Returns the distribution's validation error if its domain is empty.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub(crate) fn sample_uniform(rng: &mut fastrand::Rng, distribution: &Distribution) -> Result<f64> {
    distribution.validate()?;
    let value = match distribution {
        Distribution::Continuous(d) => f64_range(rng, d.low, d.high),
        Distribution::SteppedContinuous(d) => {
            let step = d.step.unwrap_or(d.high - d.low);
            let k = rng.i64(0..=n_float_steps(d.low, d.high, step));
            (d.low + (k as f64) * step).min(d.high)
        }
        Distribution::Int(d) => rng.i64(d.low..=d.high) as f64,
        Distribution::SteppedInt(d) => {
            let step = i128::from(d.step.unwrap_or(1));
            let low = i128::from(d.low);
            let n_steps = (i128::from(d.high) - low) / step;
            let k = rng.u64(0..=u64::try_from(n_steps).unwrap_or(u64::MAX));
            (low + i128::from(k) * step) as i64 as f64
        }
        Distribution::Categorical(d) => rng.usize(0..d.choices.len()) as f64,
    };
    Ok(value)
}
