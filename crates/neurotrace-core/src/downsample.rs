//! Min/max interleaved downsampling.
//!
//! Long traces are reduced for display by splitting them into equal buckets
//! and keeping each bucket's minimum and maximum, in that order, so spike
//! peaks survive the reduction.
//!
//! For `n` samples and a budget of `max_points`:
//!
//! - `n <= max_points`: the trace is returned unchanged
//! - otherwise `k = ceil(n / max_points)`, `m = floor(n / k)`, the trailing
//!   `n - m * k` samples are dropped and the output has exactly `2 * m` points
//!
//! Timestamps follow the buckets: each bucket contributes its first timestamp
//! twice, so time never decreases across the output.

use std::num::NonZeroUsize;

use neurotrace_types::Trace;

/// Default point budget for previews.
pub const DEFAULT_MAX_POINTS: NonZeroUsize = match NonZeroUsize::new(2000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Bucket size `ceil(n / max_points)`.
#[must_use]
pub fn bucket_size(n: usize, max_points: NonZeroUsize) -> usize {
    n.div_ceil(max_points.get())
}

/// Number of output points the downsampler produces for `n` input samples.
///
/// ```
/// use std::num::NonZeroUsize;
/// use neurotrace_core::downsample::output_len;
///
/// let max = NonZeroUsize::new(2000).unwrap();
/// assert_eq!(output_len(1500, max), 1500);
/// assert_eq!(output_len(10_001, max), 2 * 1666);
/// ```
#[must_use]
pub fn output_len(n: usize, max_points: NonZeroUsize) -> usize {
    if n <= max_points.get() {
        n
    } else {
        2 * (n / bucket_size(n, max_points))
    }
}

fn bucket_extrema(bucket: &[f64]) -> (f64, f64) {
    let first = bucket[0];
    bucket[1..]
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Downsample raw values, interleaving each bucket's `(min, max)`.
#[must_use]
pub fn minmax_downsample(values: &[f64], max_points: NonZeroUsize) -> Vec<f64> {
    let n = values.len();
    if n <= max_points.get() {
        return values.to_vec();
    }

    let k = bucket_size(n, max_points);
    let mut out = Vec::with_capacity(output_len(n, max_points));
    for bucket in values.chunks_exact(k) {
        let (lo, hi) = bucket_extrema(bucket);
        out.push(lo);
        out.push(hi);
    }
    out
}

/// Downsample a trace, keeping timestamps aligned with the emitted extrema.
#[must_use]
pub fn downsample_trace(trace: &Trace, max_points: NonZeroUsize) -> Trace {
    let n = trace.len();
    if n <= max_points.get() {
        return trace.clone();
    }

    let values = minmax_downsample(trace.values(), max_points);
    match trace.times() {
        Some(times) => {
            let k = bucket_size(n, max_points);
            let times: Vec<f64> = times
                .chunks_exact(k)
                .flat_map(|bucket| [bucket[0], bucket[0]])
                .collect();
            Trace::with_times(times, values).expect("one timestamp per emitted sample")
        }
        None => Trace::from_values(values),
    }
}

/// Keep every `k`-th sample where `k = max(1, n / max_points)`.
///
/// This is the plain decimation used for synthetic sample previews, where the
/// waveform is known to be smooth enough that extrema need no special care.
#[must_use]
pub fn stride_decimate(trace: &Trace, max_points: NonZeroUsize) -> Trace {
    let k = (trace.len() / max_points.get()).max(1);
    let values: Vec<f64> = trace.values().iter().step_by(k).copied().collect();
    match trace.times() {
        Some(times) => {
            let times = times.iter().step_by(k).copied().collect();
            Trace::with_times(times, values).expect("same stride over equal lengths")
        }
        None => Trace::from_values(values),
    }
}
